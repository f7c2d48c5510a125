//! Test fixtures and helpers.
//!
//! Pre-built arenas, matches and bodies for consistent testing.

use swarm_arena::arena::Arena;
use swarm_arena::entity::Side;
use swarm_arena::nav::NavGrid;
use swarm_arena::scenario::Scenario;
use swarm_core::body::BodyBuilder;
use swarm_core::components::{BodyPart, EntityId, StructureKind};
use swarm_core::controller::{Controller, TickReport};
use swarm_core::data::ControllerConfig;
use swarm_core::error::Result;
use swarm_core::math::Position;
use tracing::trace;

/// Spawn energy used by the fixture arenas.
pub const FIXTURE_SPAWN_ENERGY: u32 = 1000;

/// Melee unit: one Attack, one Move.
#[must_use]
pub fn melee_body() -> Vec<BodyPart> {
    BodyBuilder::new().attack(1).moves(1).build()
}

/// Ranged unit: one RangedAttack, one Move.
#[must_use]
pub fn ranged_body() -> Vec<BodyPart> {
    BodyBuilder::new().ranged_attack(1).moves(1).build()
}

/// Healer: one Heal, one Move.
#[must_use]
pub fn healer_body() -> Vec<BodyPart> {
    BodyBuilder::new().heal(1).moves(1).build()
}

/// Carrier: one Carry, one Move.
#[must_use]
pub fn carrier_body() -> Vec<BodyPart> {
    BodyBuilder::new().carry(1).moves(1).build()
}

/// An open arena with both spawns in opposite corners.
///
/// Returns the arena and the player and opponent spawn ids.
#[must_use]
pub fn arena_with_spawns(width: u32, height: u32) -> (Arena, EntityId, EntityId) {
    let mut arena = Arena::new(NavGrid::new(width, height));
    let last = Position::new(width as i32 - 2, height as i32 - 2);
    let player = arena.add_structure(
        StructureKind::Spawn,
        Some(Side::Player),
        Position::new(1, 1),
        3000,
        FIXTURE_SPAWN_ENERGY,
        FIXTURE_SPAWN_ENERGY,
    );
    let opponent = arena.add_structure(
        StructureKind::Spawn,
        Some(Side::Opponent),
        last,
        3000,
        FIXTURE_SPAWN_ENERGY,
        FIXTURE_SPAWN_ENERGY,
    );
    (arena, player, opponent)
}

/// An arena with two controllers, one per side.
#[derive(Debug, Clone)]
pub struct MatchFixture {
    /// The arena both controllers play in.
    pub arena: Arena,
    /// Controller for [`Side::Player`].
    pub player: Controller,
    /// Controller for [`Side::Opponent`].
    pub opponent: Controller,
}

impl MatchFixture {
    /// Both sides use `config` on `arena`.
    #[must_use]
    pub fn new(arena: Arena, config: &ControllerConfig) -> Self {
        Self {
            arena,
            player: Controller::new(config.clone()),
            opponent: Controller::new(config.clone()),
        }
    }

    /// The built-in spawn and swamp map with default controllers.
    ///
    /// # Panics
    ///
    /// Panics if the built-in scenario no longer builds.
    #[must_use]
    pub fn spawn_and_swamp() -> Self {
        let arena = Scenario::spawn_and_swamp()
            .build()
            .expect("built-in scenario must build");
        Self::new(arena, &ControllerConfig::default())
    }

    /// Run both controllers, then resolve the tick.
    ///
    /// # Errors
    ///
    /// Returns the first controller error.
    pub fn tick(&mut self) -> Result<(TickReport, TickReport)> {
        let player = self.player.tick(&mut self.arena.view(Side::Player))?;
        let opponent = self.opponent.tick(&mut self.arena.view(Side::Opponent))?;
        let events = self.arena.step();
        trace!(tick = player.tick, spawned = events.spawned.len(), deaths = events.deaths.len(), "fixture tick");
        Ok((player, opponent))
    }

    /// Run `ticks` ticks, stopping early on errors.
    ///
    /// # Errors
    ///
    /// Returns the first controller error.
    pub fn run(&mut self, ticks: u64) -> Result<()> {
        for _ in 0..ticks {
            self.tick()?;
        }
        Ok(())
    }
}
