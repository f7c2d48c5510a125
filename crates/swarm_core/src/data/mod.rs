//! Data structures for controller configuration.
//!
//! Pure serde types deserialized from RON. The composition tables and
//! stage thresholds are read-only input; nothing here changes at runtime.
//!
//! **Note:** This module contains no IO. File loading is handled by
//! `swarm_headless`.

mod composition;
mod controller_config;
mod thresholds;

pub use composition::RoleTemplate;
pub use controller_config::ControllerConfig;
pub use thresholds::{RallyPointSpec, StageThresholds};
