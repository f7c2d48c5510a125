//! Error types for the arena.

use thiserror::Error;

/// Result type alias using [`ArenaError`].
pub type Result<T> = std::result::Result<T, ArenaError>;

/// Top-level error type for arena setup and persistence.
///
/// Rejected unit actions are not errors here; they are reported to the
/// controller as [`swarm_core::error::ActionError`] codes.
#[derive(Debug, Error)]
pub enum ArenaError {
    /// Scenario describes an impossible arena.
    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    /// Scenario RON failed to parse.
    #[error("Failed to parse scenario: {0}")]
    ScenarioParse(#[from] ron::error::SpannedError),

    /// State could not be encoded or decoded.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// A journal entry could not be re-applied.
    #[error("Replay diverged at tick {tick}: {message}")]
    ReplayDiverged {
        /// Tick of the failing entry.
        tick: u64,
        /// What went wrong.
        message: String,
    },
}
