//! The seam between the controller and its host.
//!
//! The controller never simulates anything itself. It reads a fresh
//! snapshot through [`WorldQuery`] and issues primitive actions through
//! [`WorldActions`]. Both the arena simulation and any live game binding
//! implement these traits for exactly one controlling side.
//!
//! # Action budget
//!
//! Hosts accept at most one action of each kind per unit per tick. The
//! controller respects this by construction, so hosts may treat a second
//! action of the same kind as overriding the first.

use serde::{Deserialize, Serialize};

use crate::components::{BodyPart, EntityId, ResourceKind, Structure, Unit};
use crate::error::ActionResult;
use crate::math::{Located, Position};

/// Description of one primitive action, as recorded by hosts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Step towards a tile.
    MoveTo(Position),
    /// Melee attack on an entity.
    Attack(EntityId),
    /// Ranged attack on an entity.
    RangedAttack(EntityId),
    /// Heal a unit.
    Heal(EntityId),
    /// Harvest a source.
    Harvest(EntityId),
    /// Withdraw from a structure.
    Withdraw {
        /// Structure withdrawn from.
        target: EntityId,
        /// Resource withdrawn.
        resource: ResourceKind,
        /// Requested amount, `None` for as much as fits.
        amount: Option<u32>,
    },
    /// Transfer into a structure.
    Transfer {
        /// Structure delivered to.
        target: EntityId,
        /// Resource delivered.
        resource: ResourceKind,
        /// Requested amount, `None` for everything carried.
        amount: Option<u32>,
    },
    /// Spawn a unit with the given body.
    Spawn(Vec<BodyPart>),
}

impl Action {
    /// Check whether this is a combat action.
    #[must_use]
    pub const fn is_combat(&self) -> bool {
        matches!(self, Self::Attack(_) | Self::RangedAttack(_))
    }
}

/// Read-only queries against the current tick's world state.
pub trait WorldQuery {
    /// Current tick number. The first tick a host runs is tick 1.
    fn tick(&self) -> u64;

    /// All live units, own and enemy, including ones still spawning.
    fn units(&self) -> Vec<Unit>;

    /// All structures and resource sources.
    fn structures(&self) -> Vec<Structure>;

    /// Movement cost of the best path between two tiles.
    ///
    /// Returns `None` when no path exists.
    fn path_cost(&self, from: Position, to: Position) -> Option<u32>;

    /// Pick the item with the cheapest path from `origin`.
    ///
    /// Unreachable items are skipped. Ties go to the earliest item.
    fn find_closest_by_path<'a, T: Located + 'a>(
        &self,
        origin: Position,
        items: impl IntoIterator<Item = &'a T>,
    ) -> Option<&'a T>
    where
        Self: Sized,
    {
        let mut best: Option<(&'a T, u32)> = None;
        for item in items {
            let Some(cost) = self.path_cost(origin, item.position()) else {
                continue;
            };
            match best {
                Some((_, best_cost)) if best_cost <= cost => {}
                _ => best = Some((item, cost)),
            }
        }
        best.map(|(item, _)| item)
    }
}

/// Primitive world-mutating actions.
///
/// Every method validates immediately and reports failure through
/// [`ActionResult`]; effects are applied by the host when the tick ends.
pub trait WorldActions {
    /// Move one step along the path towards `target`.
    fn move_to(&mut self, unit: EntityId, target: Position) -> ActionResult;

    /// Melee attack.
    fn attack(&mut self, unit: EntityId, target: EntityId) -> ActionResult;

    /// Ranged attack.
    fn ranged_attack(&mut self, unit: EntityId, target: EntityId) -> ActionResult;

    /// Heal an adjacent unit.
    fn heal(&mut self, unit: EntityId, target: EntityId) -> ActionResult;

    /// Harvest energy from a source.
    fn harvest(&mut self, unit: EntityId, source: EntityId) -> ActionResult;

    /// Withdraw a resource from a structure store.
    ///
    /// `amount = None` withdraws as much as fits.
    fn withdraw(
        &mut self,
        unit: EntityId,
        target: EntityId,
        resource: ResourceKind,
        amount: Option<u32>,
    ) -> ActionResult;

    /// Transfer a carried resource into a structure store.
    ///
    /// `amount = None` transfers everything carried.
    fn transfer(
        &mut self,
        unit: EntityId,
        target: EntityId,
        resource: ResourceKind,
        amount: Option<u32>,
    ) -> ActionResult;

    /// Start spawning a unit with the given body.
    fn spawn_unit(&mut self, spawn: EntityId, body: &[BodyPart]) -> ActionResult;
}

/// A full host binding for one controlling side.
pub trait World: WorldQuery + WorldActions {}

impl<T: WorldQuery + WorldActions> World for T {}
