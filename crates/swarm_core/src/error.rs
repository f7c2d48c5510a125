//! Error types for the battle controller.

use thiserror::Error;

use crate::components::StructureKind;

/// Result type alias using [`ControlError`].
pub type Result<T> = std::result::Result<T, ControlError>;

/// Result of a single primitive world action.
pub type ActionResult = std::result::Result<(), ActionError>;

/// Failure codes reported by the host for a primitive action.
///
/// These are ordinary world conditions. The controller either recovers
/// from them locally (range) or retries on the next tick (everything else).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ActionError {
    /// The acting object is not owned by the caller.
    #[error("not owner")]
    NotOwner,
    /// The object is busy (still spawning, or already spawning this tick).
    #[error("busy")]
    Busy,
    /// Not enough stored resource for the action.
    #[error("not enough resources")]
    NotEnoughResources,
    /// The target does not exist or cannot receive this action.
    #[error("invalid target")]
    InvalidTarget,
    /// The target store is full.
    #[error("target is full")]
    Full,
    /// The target is too far away.
    #[error("not in range")]
    NotInRange,
    /// Malformed arguments (e.g. an empty body).
    #[error("invalid arguments")]
    InvalidArgs,
    /// The acting unit lacks the body part required for the action.
    #[error("missing body part")]
    NoBodyPart,
}

/// Top-level error type for the controller.
#[derive(Debug, Error)]
pub enum ControlError {
    /// Harvest-and-deliver was pointed at something that is neither a
    /// source nor a container.
    #[error("unsupported harvest source kind: {kind:?}")]
    UnsupportedSource {
        /// Kind of the offending structure.
        kind: StructureKind,
    },

    /// A delivery or attack target of an unsupported kind.
    #[error("unsupported target kind: {kind:?}")]
    UnsupportedTarget {
        /// Kind of the offending structure.
        kind: StructureKind,
    },

    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration text failed to parse.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(String),
}
