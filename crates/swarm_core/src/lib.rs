//! # Swarm Core
//!
//! Tick-driven battle controller for a unit swarm.
//!
//! This crate contains **only** decision logic:
//! - No IO
//! - No system randomness
//! - No floating-point math in decisions
//! - No simulation; the host is reached through [`world`] traits
//!
//! Every tick the [`controller::Controller`] reads a fresh snapshot,
//! classifies units into roles, plans spawns, steps the battle stage machine
//! and issues per-unit orders through the host's action interface.
//!
//! ## Crate Structure
//!
//! - [`components`] - Unit and structure snapshots
//! - [`world`] - Host query and action traits
//! - [`unit_facade`] - Per-unit compound behaviours
//! - [`roles`] - Role classification
//! - [`spawn`] - Spawn planning
//! - [`squad`] - Army-wide orders
//! - [`stage`] - Battle stages and transitions
//! - [`controller`] - Tick entry point
//! - [`data`] - RON configuration types

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod body;
pub mod components;
pub mod controller;
pub mod data;
pub mod error;
pub mod math;
pub mod roles;
pub mod spawn;
pub mod squad;
pub mod stage;
pub mod unit_facade;
pub mod world;

#[cfg(test)]
mod testing;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::body::{body_cost, BodyBuilder};
    pub use crate::components::*;
    pub use crate::controller::{BattleContext, Controller, TickReport};
    pub use crate::data::{ControllerConfig, RallyPointSpec, RoleTemplate, StageThresholds};
    pub use crate::error::{ActionError, ActionResult, ControlError, Result};
    pub use crate::math::{find_closest_by_range, find_in_range, Located, Position};
    pub use crate::roles::{classify, Role, RoleBuckets, Roster};
    pub use crate::spawn::{run_spawn_requests, SpawnRequest};
    pub use crate::stage::{next_stage, Stage, StageMachine, StageSignals};
    pub use crate::unit_facade::{AttackTarget, UnitFacade};
    pub use crate::world::{Action, World, WorldActions, WorldQuery};
}
