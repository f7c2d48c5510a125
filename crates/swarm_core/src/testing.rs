//! In-crate world double for unit tests.
//!
//! Validates ranges the same way a real host does and records every
//! accepted or rejected action, but never changes any state.

use std::collections::{HashMap, VecDeque};

use crate::components::{BodyPart, EntityId, ResourceKind, Structure, StructureKind, Unit};
use crate::error::{ActionError, ActionResult};
use crate::math::Position;
use crate::world::{Action, WorldActions, WorldQuery};

#[derive(Debug, Default)]
pub(crate) struct ScriptedWorld {
    pub tick: u64,
    pub units: Vec<Unit>,
    pub structures: Vec<Structure>,
    /// Path costs for specific destination tiles; `None` marks unreachable.
    pub path_overrides: HashMap<Position, Option<u32>>,
    /// Results handed out to successive spawn calls; empty means `Ok`.
    pub spawn_results: VecDeque<ActionResult>,
    /// Every action call in order, with its result.
    pub log: Vec<(EntityId, Action, ActionResult)>,
}

impl ScriptedWorld {
    pub fn new() -> Self {
        Self {
            tick: 1,
            ..Self::default()
        }
    }

    pub fn with_units(mut self, units: Vec<Unit>) -> Self {
        self.units = units;
        self
    }

    pub fn with_structures(mut self, structures: Vec<Structure>) -> Self {
        self.structures = structures;
        self
    }

    pub fn actions(&self) -> Vec<(EntityId, Action)> {
        self.log.iter().map(|(id, a, _)| (*id, a.clone())).collect()
    }

    pub fn actions_of(&self, unit: EntityId) -> Vec<Action> {
        self.log
            .iter()
            .filter(|(id, _, _)| *id == unit)
            .map(|(_, a, _)| a.clone())
            .collect()
    }

    fn position_of(&self, id: EntityId) -> Option<Position> {
        self.units
            .iter()
            .find(|u| u.id == id)
            .map(|u| u.position)
            .or_else(|| self.structures.iter().find(|s| s.id == id).map(|s| s.position))
    }

    fn ranged(&mut self, unit: EntityId, target: EntityId, range: u32, action: Action) -> ActionResult {
        let result = match (self.position_of(unit), self.position_of(target)) {
            (Some(from), Some(to)) if from.in_range_of(to, range) => Ok(()),
            (Some(_), Some(_)) => Err(ActionError::NotInRange),
            _ => Err(ActionError::InvalidTarget),
        };
        self.log.push((unit, action, result));
        result
    }
}

pub(crate) fn structure(id: EntityId, kind: StructureKind, my: Option<bool>, position: Position) -> Structure {
    Structure {
        id,
        kind,
        my,
        position,
        hits: 1000,
        store: crate::components::Store::new(0, 1000),
    }
}

impl WorldQuery for ScriptedWorld {
    fn tick(&self) -> u64 {
        self.tick
    }

    fn units(&self) -> Vec<Unit> {
        self.units.clone()
    }

    fn structures(&self) -> Vec<Structure> {
        self.structures.clone()
    }

    fn path_cost(&self, from: Position, to: Position) -> Option<u32> {
        match self.path_overrides.get(&to) {
            Some(cost) => *cost,
            None => Some(from.range_to(to)),
        }
    }
}

impl WorldActions for ScriptedWorld {
    fn move_to(&mut self, unit: EntityId, target: Position) -> ActionResult {
        self.log.push((unit, Action::MoveTo(target), Ok(())));
        Ok(())
    }

    fn attack(&mut self, unit: EntityId, target: EntityId) -> ActionResult {
        self.ranged(unit, target, 1, Action::Attack(target))
    }

    fn ranged_attack(&mut self, unit: EntityId, target: EntityId) -> ActionResult {
        self.ranged(unit, target, 3, Action::RangedAttack(target))
    }

    fn heal(&mut self, unit: EntityId, target: EntityId) -> ActionResult {
        self.ranged(unit, target, 1, Action::Heal(target))
    }

    fn harvest(&mut self, unit: EntityId, source: EntityId) -> ActionResult {
        self.ranged(unit, source, 1, Action::Harvest(source))
    }

    fn withdraw(
        &mut self,
        unit: EntityId,
        target: EntityId,
        resource: ResourceKind,
        amount: Option<u32>,
    ) -> ActionResult {
        self.ranged(unit, target, 1, Action::Withdraw { target, resource, amount })
    }

    fn transfer(
        &mut self,
        unit: EntityId,
        target: EntityId,
        resource: ResourceKind,
        amount: Option<u32>,
    ) -> ActionResult {
        self.ranged(unit, target, 1, Action::Transfer { target, resource, amount })
    }

    fn spawn_unit(&mut self, spawn: EntityId, body: &[BodyPart]) -> ActionResult {
        let result = self.spawn_results.pop_front().unwrap_or(Ok(()));
        self.log.push((spawn, Action::Spawn(body.to_vec()), result));
        result
    }
}
