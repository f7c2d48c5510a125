//! # Swarm Arena
//!
//! Deterministic in-memory arena that hosts two swarm controllers.
//!
//! The arena implements the controller's world traits through
//! [`view::SideView`], one per side per tick. It exists so controllers can
//! be exercised end to end without a live game:
//! - Integer grid with plain, swamp and wall terrain
//! - Orders validated on issue, resolved together by [`arena::Arena::step`]
//! - Every accepted order journalled for replay
//! - Fixed iteration order, so identical inputs give identical states
//!
//! ## Crate Structure
//!
//! - [`arena`] - Simulation state and tick resolution
//! - [`entity`] - Arena-side unit and structure state
//! - [`nav`] - Terrain grid and pathfinding
//! - [`scenario`] - RON scenario definitions
//! - [`view`] - Per-side world interface

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod arena;
pub mod entity;
pub mod error;
pub mod nav;
pub mod scenario;
pub mod view;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::arena::{ActionRecord, Arena, Outcome, StepEvents};
    pub use crate::entity::{ArenaStructure, ArenaUnit, Side};
    pub use crate::error::{ArenaError, Result};
    pub use crate::nav::{find_path, CostField, NavGrid, Path, Terrain};
    pub use crate::scenario::{Rect, ResourcePlacement, Scenario, SideSetup, UnitPlacement};
    pub use crate::view::SideView;
}
