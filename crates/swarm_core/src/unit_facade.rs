//! Intention-level operations on a single unit.
//!
//! Every primitive action in the arena requires the actor to be in range
//! of its target. [`UnitFacade`] hides that: each operation makes one
//! attempt and, if the host answers [`ActionError::NotInRange`], issues a
//! single move towards the target in the same tick. Nothing is retried
//! beyond that; the next tick re-evaluates from a fresh snapshot.
//!
//! The façade borrows a snapshot [`Unit`], so it cannot outlive the tick
//! whose snapshot it was built from.

use tracing::{debug, trace};

use crate::components::{BodyPart, ResourceKind, Structure, StructureKind, Targetable, Unit};
use crate::error::{ActionError, ActionResult, ControlError, Result};
use crate::math::{find_closest_by_range, find_in_range, Position};
use crate::world::{World, WorldActions, WorldQuery};

/// Radius of the coarse pre-filter used before path-based target selection.
pub const DEFAULT_TARGET_PREFILTER_RANGE: u32 = 30;

/// What an attacking unit should hit.
#[derive(Debug, Clone, Copy)]
pub enum AttackTarget<'a> {
    /// Choose among these units.
    Units(&'a [&'a Unit]),
    /// Hit this structure directly.
    Structure(&'a Structure),
}

/// A snapshot unit plus the behaviours built on top of its primitives.
#[derive(Debug, Clone, Copy)]
pub struct UnitFacade<'u> {
    unit: &'u Unit,
    prefilter_range: u32,
}

impl<'u> UnitFacade<'u> {
    /// Wrap a unit snapshot.
    #[must_use]
    pub fn new(unit: &'u Unit) -> Self {
        Self {
            unit,
            prefilter_range: DEFAULT_TARGET_PREFILTER_RANGE,
        }
    }

    /// Override the target selection pre-filter radius.
    #[must_use]
    pub fn with_prefilter_range(mut self, range: u32) -> Self {
        self.prefilter_range = range;
        self
    }

    /// The wrapped snapshot.
    #[must_use]
    pub fn unit(&self) -> &'u Unit {
        self.unit
    }

    /// Move towards `target` if `result` says it was out of range.
    fn compensate<W: WorldActions>(&self, world: &mut W, result: ActionResult, target: Position) -> ActionResult {
        if result == Err(ActionError::NotInRange) {
            self.close_in(world, target);
        }
        result
    }

    fn close_in<W: WorldActions>(&self, world: &mut W, target: Position) {
        trace!(unit = self.unit.id, %target, "closing in on target");
        if let Err(err) = world.move_to(self.unit.id, target) {
            trace!(unit = self.unit.id, %err, "compensating move refused");
        }
    }

    /// Melee attack, moving closer if the target is out of reach.
    pub fn attack<W: WorldActions, T: Targetable>(&self, world: &mut W, target: &T) -> ActionResult {
        let result = world.attack(self.unit.id, target.id());
        self.compensate(world, result, target.position())
    }

    /// Ranged attack, moving closer if the target is out of reach.
    pub fn ranged_attack<W: WorldActions, T: Targetable>(&self, world: &mut W, target: &T) -> ActionResult {
        let result = world.ranged_attack(self.unit.id, target.id());
        self.compensate(world, result, target.position())
    }

    /// Heal `target`, moving closer if needed.
    ///
    /// Does nothing and succeeds when the target is already at full health.
    pub fn heal<W: WorldActions>(&self, world: &mut W, target: &Unit) -> ActionResult {
        if target.is_healthy() {
            return Ok(());
        }
        let result = world.heal(self.unit.id, target.id);
        self.compensate(world, result, target.position)
    }

    /// Heal the path-closest damaged unit among `candidates`.
    ///
    /// Returns `Ok(())` without acting when nobody needs healing or no
    /// damaged candidate is reachable.
    pub fn auto_heal<W: World>(&self, world: &mut W, candidates: &[&Unit]) -> ActionResult {
        let wounded: Vec<&Unit> = candidates.iter().copied().filter(|c| !c.is_healthy()).collect();
        let Some(target) = world.find_closest_by_path(self.unit.position, wounded.iter().copied()) else {
            return Ok(());
        };
        self.heal(world, target)
    }

    /// Choose a unit to attack.
    ///
    /// Candidates inside the pre-filter radius are ranked by path cost,
    /// which is only worth computing for that bounded set. When nobody is
    /// that close the first candidate is taken as-is.
    pub fn select_target<'t, W: WorldQuery>(&self, world: &W, candidates: &[&'t Unit]) -> Option<&'t Unit> {
        let first = *candidates.first()?;
        let nearby = find_in_range(
            self.unit.position,
            candidates.iter().copied(),
            self.prefilter_range,
        );
        if nearby.is_empty() {
            return Some(first);
        }
        world
            .find_closest_by_path(self.unit.position, nearby.iter().copied())
            .or_else(|| nearby.first().copied())
    }

    /// Attack with every weapon the body carries.
    ///
    /// Melee and ranged parts both fire when present. At most one
    /// compensating move is issued, even for hybrid bodies.
    pub fn auto_attack<W: World>(&self, world: &mut W, target: AttackTarget<'_>) -> ActionResult {
        let caps = self.unit.capabilities;
        if !caps.can_fight() {
            return Err(ActionError::NoBodyPart);
        }

        let (target_id, target_pos) = match target {
            AttackTarget::Units(candidates) => match self.select_target(world, candidates) {
                Some(unit) => (unit.id, unit.position),
                None => return Ok(()),
            },
            AttackTarget::Structure(structure) => (structure.id, structure.position),
        };

        let melee = caps
            .contains(BodyPart::Attack)
            .then(|| world.attack(self.unit.id, target_id));
        let ranged = caps
            .contains(BodyPart::RangedAttack)
            .then(|| world.ranged_attack(self.unit.id, target_id));

        let attempts = [melee, ranged];
        let out_of_range = attempts
            .iter()
            .flatten()
            .any(|r| *r == Err(ActionError::NotInRange));
        if out_of_range {
            self.close_in(world, target_pos);
        }

        attempts
            .iter()
            .flatten()
            .copied()
            .find(|r| r.is_ok())
            .or_else(|| attempts.iter().flatten().copied().next())
            .unwrap_or(Ok(()))
    }

    /// Engage only threats within `range` of this unit.
    pub fn auto_defense<W: World>(&self, world: &mut W, threats: &[&Unit], range: u32) -> ActionResult {
        let close = find_in_range(self.unit.position, threats.iter().copied(), range);
        if close.is_empty() {
            return Ok(());
        }
        self.auto_attack(world, AttackTarget::Units(&close))
    }

    /// Gather from `source`, or deliver to `dest` once full.
    ///
    /// The outer error is a configuration fault: `source` is neither a
    /// source nor a container, or `dest` cannot accept deliveries. The
    /// inner result is the host's answer to the primitive action.
    pub fn harvest_and_deliver<W: WorldActions>(
        &self,
        world: &mut W,
        source: &Structure,
        dest: &Structure,
        resource: ResourceKind,
    ) -> Result<ActionResult> {
        if self.unit.store.free_capacity(resource) > 0 {
            self.gather(world, source, resource)
        } else {
            self.deliver(world, dest, resource)
        }
    }

    /// Keep the economy running for a carrier.
    ///
    /// With free capacity the unit gathers from the nearest non-empty
    /// container (or source, if it has Work parts); otherwise it delivers to
    /// the nearest own spawn. The gathering/delivering state is derived from
    /// the carried amount every call. A partly loaded unit with nothing left
    /// to gather delivers what it has.
    pub fn auto_harvest_and_deliver<W: World>(&self, world: &mut W, resource: ResourceKind) -> Result<ActionResult> {
        let structures = world.structures();
        let here = self.unit.position;

        if self.unit.store.free_capacity(resource) > 0 {
            let can_harvest = self.unit.has_part(BodyPart::Work);
            let sources = structures.iter().filter(|s| {
                s.store.used(resource) > 0
                    && match s.kind {
                        StructureKind::Container => true,
                        StructureKind::Source => can_harvest,
                        _ => false,
                    }
            });
            if let Some(source) = find_closest_by_range(here, sources) {
                return self.gather(world, source, resource);
            }
            if self.unit.store.used(resource) == 0 {
                return Ok(Ok(()));
            }
        }

        let spawns = structures
            .iter()
            .filter(|s| s.kind == StructureKind::Spawn && s.is_mine());
        let Some(dest) = find_closest_by_range(here, spawns) else {
            debug!(unit = self.unit.id, "no spawn to deliver to");
            return Ok(Ok(()));
        };
        self.deliver(world, dest, resource)
    }

    fn gather<W: WorldActions>(&self, world: &mut W, source: &Structure, resource: ResourceKind) -> Result<ActionResult> {
        let result = match source.kind {
            StructureKind::Source => world.harvest(self.unit.id, source.id),
            StructureKind::Container => world.withdraw(self.unit.id, source.id, resource, None),
            kind => return Err(ControlError::UnsupportedSource { kind }),
        };
        Ok(self.compensate(world, result, source.position))
    }

    fn deliver<W: WorldActions>(&self, world: &mut W, dest: &Structure, resource: ResourceKind) -> Result<ActionResult> {
        match dest.kind {
            StructureKind::Spawn | StructureKind::Container => {}
            kind => return Err(ControlError::UnsupportedTarget { kind }),
        }
        let result = world.transfer(self.unit.id, dest.id, resource, None);
        Ok(self.compensate(world, result, dest.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::BodyBuilder;
    use crate::testing::{structure, ScriptedWorld};
    use crate::world::Action;

    fn unit(id: u64, my: bool, body: Vec<BodyPart>, x: i32, y: i32) -> Unit {
        Unit::new(id, my, body, Position::new(x, y))
    }

    fn melee() -> Vec<BodyPart> {
        BodyBuilder::new().attack(1).moves(1).build()
    }

    fn ranged() -> Vec<BodyPart> {
        BodyBuilder::new().ranged_attack(1).moves(1).build()
    }

    fn healer() -> Vec<BodyPart> {
        BodyBuilder::new().heal(1).moves(1).build()
    }

    fn carrier() -> Vec<BodyPart> {
        BodyBuilder::new().carry(2).moves(1).build()
    }

    #[test]
    fn test_attack_in_range_does_not_move() {
        let me = unit(1, true, melee(), 10, 10);
        let foe = unit(2, false, melee(), 11, 10);
        let mut world = ScriptedWorld::new().with_units(vec![me.clone(), foe.clone()]);

        let result = UnitFacade::new(&me).attack(&mut world, &foe);

        assert_eq!(result, Ok(()));
        assert_eq!(world.actions_of(1), vec![Action::Attack(2)]);
    }

    #[test]
    fn test_attack_out_of_range_issues_one_move() {
        let me = unit(1, true, melee(), 10, 10);
        let foe = unit(2, false, melee(), 20, 10);
        let mut world = ScriptedWorld::new().with_units(vec![me.clone(), foe.clone()]);

        let result = UnitFacade::new(&me).attack(&mut world, &foe);

        assert_eq!(result, Err(ActionError::NotInRange));
        assert_eq!(
            world.actions_of(1),
            vec![Action::Attack(2), Action::MoveTo(Position::new(20, 10))]
        );
    }

    #[test]
    fn test_heal_skips_healthy_target() {
        let me = unit(1, true, healer(), 10, 10);
        let friend = unit(2, true, melee(), 10, 11);
        let mut world = ScriptedWorld::new().with_units(vec![me.clone(), friend.clone()]);

        assert_eq!(UnitFacade::new(&me).heal(&mut world, &friend), Ok(()));
        assert!(world.log.is_empty());
    }

    #[test]
    fn test_auto_heal_is_idle_when_everyone_is_healthy() {
        let me = unit(1, true, healer(), 10, 10);
        let a = unit(2, true, melee(), 12, 10);
        let b = unit(3, true, ranged(), 30, 30);
        let mut world = ScriptedWorld::new().with_units(vec![me.clone(), a.clone(), b.clone()]);

        assert_eq!(UnitFacade::new(&me).auto_heal(&mut world, &[&a, &b]), Ok(()));
        assert!(world.log.is_empty());
    }

    #[test]
    fn test_auto_heal_picks_path_closest_wounded() {
        let me = unit(1, true, healer(), 10, 10);
        let mut near_but_walled = unit(2, true, melee(), 11, 10);
        near_but_walled.hits -= 50;
        let mut far_open = unit(3, true, melee(), 15, 10);
        far_open.hits -= 50;
        let mut world = ScriptedWorld::new().with_units(vec![
            me.clone(),
            near_but_walled.clone(),
            far_open.clone(),
        ]);
        world.path_overrides.insert(Position::new(11, 10), Some(40));

        let result = UnitFacade::new(&me).auto_heal(&mut world, &[&near_but_walled, &far_open]);

        assert_eq!(result, Err(ActionError::NotInRange));
        assert_eq!(
            world.actions_of(1),
            vec![Action::Heal(3), Action::MoveTo(Position::new(15, 10))]
        );
    }

    #[test]
    fn test_select_target_uses_path_cost_within_prefilter() {
        let me = unit(1, true, melee(), 0, 0);
        let a = unit(2, false, melee(), 5, 0);
        let b = unit(3, false, melee(), 8, 0);
        let far = unit(4, false, melee(), 90, 90);
        let mut world = ScriptedWorld::new();
        world.path_overrides.insert(Position::new(5, 0), None);

        let chosen = UnitFacade::new(&me).select_target(&world, &[&far, &a, &b]);

        assert_eq!(chosen.map(|u| u.id), Some(3));
    }

    #[test]
    fn test_select_target_falls_back_to_first_when_nobody_is_close() {
        let me = unit(1, true, melee(), 0, 0);
        let a = unit(2, false, melee(), 60, 60);
        let b = unit(3, false, melee(), 40, 40);
        let world = ScriptedWorld::new();

        let chosen = UnitFacade::new(&me).select_target(&world, &[&a, &b]);

        assert_eq!(chosen.map(|u| u.id), Some(2));
        assert!(UnitFacade::new(&me).select_target(&world, &[]).is_none());
    }

    #[test]
    fn test_auto_attack_without_candidates_is_noop() {
        let me = unit(1, true, melee(), 0, 0);
        let mut world = ScriptedWorld::new().with_units(vec![me.clone()]);

        assert_eq!(UnitFacade::new(&me).auto_attack(&mut world, AttackTarget::Units(&[])), Ok(()));
        assert!(world.log.is_empty());
    }

    #[test]
    fn test_hybrid_attacks_with_both_weapons_and_moves_once() {
        let body = BodyBuilder::new().attack(1).ranged_attack(1).moves(1).build();
        let me = unit(1, true, body, 10, 10);
        let foe = unit(2, false, melee(), 12, 10);
        let mut world = ScriptedWorld::new().with_units(vec![me.clone(), foe.clone()]);

        let result = UnitFacade::new(&me).auto_attack(&mut world, AttackTarget::Units(&[&foe]));

        assert_eq!(result, Ok(()));
        assert_eq!(
            world.actions_of(1),
            vec![
                Action::Attack(2),
                Action::RangedAttack(2),
                Action::MoveTo(Position::new(12, 10)),
            ]
        );
    }

    #[test]
    fn test_auto_attack_structure_directly() {
        let me = unit(1, true, ranged(), 50, 50);
        let spawn = structure(9, StructureKind::Spawn, Some(false), Position::new(52, 52));
        let mut world = ScriptedWorld::new()
            .with_units(vec![me.clone()])
            .with_structures(vec![spawn.clone()]);

        let result = UnitFacade::new(&me).auto_attack(&mut world, AttackTarget::Structure(&spawn));

        assert_eq!(result, Ok(()));
        assert_eq!(world.actions_of(1), vec![Action::RangedAttack(9)]);
    }

    #[test]
    fn test_non_combatant_cannot_auto_attack() {
        let me = unit(1, true, healer(), 0, 0);
        let foe = unit(2, false, melee(), 1, 0);
        let mut world = ScriptedWorld::new().with_units(vec![me.clone(), foe.clone()]);

        let result = UnitFacade::new(&me).auto_attack(&mut world, AttackTarget::Units(&[&foe]));

        assert_eq!(result, Err(ActionError::NoBodyPart));
        assert!(world.log.is_empty());
    }

    #[test]
    fn test_auto_defense_ignores_distant_threats() {
        let me = unit(1, true, melee(), 10, 10);
        let distant = unit(2, false, melee(), 30, 10);
        let close = unit(3, false, melee(), 14, 10);
        let mut world = ScriptedWorld::new().with_units(vec![me.clone(), distant.clone(), close.clone()]);
        let facade = UnitFacade::new(&me);

        assert_eq!(facade.auto_defense(&mut world, &[&distant], 10), Ok(()));
        assert!(world.log.is_empty());

        let _ = facade.auto_defense(&mut world, &[&distant, &close], 10);
        assert_eq!(world.actions_of(1)[0], Action::Attack(3));
    }

    #[test]
    fn test_harvest_withdraws_from_nearest_container() {
        let me = unit(1, true, carrier(), 10, 10);
        let mut near = structure(5, StructureKind::Container, None, Position::new(12, 10));
        near.store.energy = 200;
        let mut far = structure(6, StructureKind::Container, None, Position::new(40, 40));
        far.store.energy = 200;
        let empty = structure(7, StructureKind::Container, None, Position::new(11, 10));
        let mut world = ScriptedWorld::new()
            .with_units(vec![me.clone()])
            .with_structures(vec![far, empty, near]);

        let result = UnitFacade::new(&me)
            .auto_harvest_and_deliver(&mut world, ResourceKind::Energy)
            .expect("containers are supported sources");

        assert_eq!(result, Err(ActionError::NotInRange));
        assert_eq!(
            world.actions_of(1),
            vec![
                Action::Withdraw {
                    target: 5,
                    resource: ResourceKind::Energy,
                    amount: None
                },
                Action::MoveTo(Position::new(12, 10)),
            ]
        );
    }

    #[test]
    fn test_full_carrier_delivers_to_own_spawn() {
        let mut me = unit(1, true, carrier(), 10, 10);
        me.store.energy = me.store.capacity;
        let mut container = structure(5, StructureKind::Container, None, Position::new(11, 10));
        container.store.energy = 500;
        let enemy_spawn = structure(8, StructureKind::Spawn, Some(false), Position::new(10, 11));
        let my_spawn = structure(9, StructureKind::Spawn, Some(true), Position::new(9, 9));
        let mut world = ScriptedWorld::new()
            .with_units(vec![me.clone()])
            .with_structures(vec![container, enemy_spawn, my_spawn]);

        let result = UnitFacade::new(&me)
            .auto_harvest_and_deliver(&mut world, ResourceKind::Energy)
            .expect("spawns accept deliveries");

        assert_eq!(result, Ok(()));
        assert_eq!(
            world.actions_of(1),
            vec![Action::Transfer {
                target: 9,
                resource: ResourceKind::Energy,
                amount: None
            }]
        );
    }

    #[test]
    fn test_unsupported_source_kind_is_an_error() {
        let me = unit(1, true, carrier(), 10, 10);
        let tower = structure(5, StructureKind::Tower, Some(true), Position::new(11, 10));
        let spawn = structure(9, StructureKind::Spawn, Some(true), Position::new(9, 9));
        let mut world = ScriptedWorld::new();

        let err = UnitFacade::new(&me)
            .harvest_and_deliver(&mut world, &tower, &spawn, ResourceKind::Energy)
            .unwrap_err();

        assert!(matches!(
            err,
            ControlError::UnsupportedSource {
                kind: StructureKind::Tower
            }
        ));
        assert!(world.log.is_empty());
    }

    #[test]
    fn test_source_requires_work_parts() {
        let me = unit(1, true, carrier(), 10, 10);
        let mut source = structure(5, StructureKind::Source, None, Position::new(11, 10));
        source.store.energy = 1000;
        let mut world = ScriptedWorld::new()
            .with_units(vec![me.clone()])
            .with_structures(vec![source]);

        let result = UnitFacade::new(&me).auto_harvest_and_deliver(&mut world, ResourceKind::Energy);

        assert!(matches!(result, Ok(Ok(()))));
        assert!(world.log.is_empty());
    }
}
