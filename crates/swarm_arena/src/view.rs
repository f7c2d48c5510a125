//! One side's window onto the arena.
//!
//! [`SideView`] is what a controller is handed each tick. Snapshots are
//! reported relative to the viewing side and orders are issued on its
//! behalf, so a controller can never command the opponent's units.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use swarm_core::components::{BodyPart, EntityId, ResourceKind, Structure, Unit};
use swarm_core::error::ActionResult;
use swarm_core::math::Position;
use swarm_core::world::{WorldActions, WorldQuery};
use tracing::trace;

use crate::arena::Arena;
use crate::entity::Side;
use crate::nav::CostField;

/// World interface for one side, valid for one tick.
///
/// Path costs are cached per origin for the lifetime of the view. Orders
/// only queue intents, so terrain and obstacles cannot change underneath
/// the cache.
pub struct SideView<'a> {
    arena: &'a mut Arena,
    side: Side,
    obstacles: HashSet<Position>,
    costs: RefCell<HashMap<Position, CostField>>,
}

impl<'a> SideView<'a> {
    /// Wrap `arena` for `side`.
    pub fn new(arena: &'a mut Arena, side: Side) -> Self {
        let obstacles = arena.obstacles();
        Self {
            arena,
            side,
            obstacles,
            costs: RefCell::new(HashMap::new()),
        }
    }

    /// The side this view acts for.
    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// Read access to the underlying arena.
    #[must_use]
    pub fn arena(&self) -> &Arena {
        &*self.arena
    }

    fn log(&self, unit: EntityId, what: &str, result: ActionResult) -> ActionResult {
        if let Err(err) = result {
            trace!(side = ?self.side, unit, what, %err, "order rejected");
        }
        result
    }
}

impl WorldQuery for SideView<'_> {
    fn tick(&self) -> u64 {
        self.arena.tick()
    }

    fn units(&self) -> Vec<Unit> {
        self.arena.units().map(|u| u.snapshot(self.side)).collect()
    }

    fn structures(&self) -> Vec<Structure> {
        self.arena.structures().map(|s| s.snapshot(self.side)).collect()
    }

    fn path_cost(&self, from: Position, to: Position) -> Option<u32> {
        let mut costs = self.costs.borrow_mut();
        let field = costs
            .entry(from)
            .or_insert_with(|| CostField::compute(self.arena.grid(), from, |p| self.obstacles.contains(&p)));
        field.get(to)
    }
}

impl WorldActions for SideView<'_> {
    fn move_to(&mut self, unit: EntityId, target: Position) -> ActionResult {
        let result = self.arena.order_move(self.side, unit, target);
        self.log(unit, "move", result)
    }

    fn attack(&mut self, unit: EntityId, target: EntityId) -> ActionResult {
        let result = self.arena.order_melee(self.side, unit, target);
        self.log(unit, "attack", result)
    }

    fn ranged_attack(&mut self, unit: EntityId, target: EntityId) -> ActionResult {
        let result = self.arena.order_ranged(self.side, unit, target);
        self.log(unit, "ranged_attack", result)
    }

    fn heal(&mut self, unit: EntityId, target: EntityId) -> ActionResult {
        let result = self.arena.order_heal(self.side, unit, target);
        self.log(unit, "heal", result)
    }

    fn harvest(&mut self, unit: EntityId, source: EntityId) -> ActionResult {
        let result = self.arena.order_harvest(self.side, unit, source);
        self.log(unit, "harvest", result)
    }

    fn withdraw(&mut self, unit: EntityId, target: EntityId, _resource: ResourceKind, amount: Option<u32>) -> ActionResult {
        let result = self.arena.order_withdraw(self.side, unit, target, amount);
        self.log(unit, "withdraw", result)
    }

    fn transfer(&mut self, unit: EntityId, target: EntityId, _resource: ResourceKind, amount: Option<u32>) -> ActionResult {
        let result = self.arena.order_transfer(self.side, unit, target, amount);
        self.log(unit, "transfer", result)
    }

    fn spawn_unit(&mut self, spawn: EntityId, body: &[BodyPart]) -> ActionResult {
        let result = self.arena.order_spawn(self.side, spawn, body);
        self.log(spawn, "spawn", result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::{NavGrid, Terrain};
    use swarm_core::components::StructureKind;
    use swarm_core::error::ActionError;

    #[test]
    fn test_view_is_relative_to_side() {
        let mut arena = Arena::new(NavGrid::new(10, 10));
        arena.add_structure(StructureKind::Spawn, Some(Side::Player), Position::new(1, 1), 3000, 0, 1000);
        let theirs = arena.add_unit(Side::Opponent, vec![BodyPart::Move], Position::new(8, 8));

        {
            let mut view = arena.view(Side::Player);
            assert!(view.structures()[0].is_mine());
            assert!(!view.units()[0].my);
            assert_eq!(view.move_to(theirs, Position::new(0, 0)), Err(ActionError::NotOwner));
        }

        let view = arena.view(Side::Opponent);
        assert!(view.structures()[0].is_enemy());
        assert!(view.units()[0].my);
    }

    #[test]
    fn test_path_cost_respects_terrain() {
        let mut grid = NavGrid::new(10, 1);
        grid.set_terrain(Position::new(3, 0), Terrain::Swamp);
        let mut arena = Arena::new(grid);
        let view = arena.view(Side::Player);

        assert_eq!(view.path_cost(Position::new(0, 0), Position::new(5, 0)), Some(9));
        assert_eq!(view.path_cost(Position::new(0, 0), Position::new(2, 0)), Some(2));
    }
}
