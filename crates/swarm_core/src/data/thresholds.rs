//! Stage radii and the rally point rule.

use serde::{Deserialize, Serialize};

use crate::error::{ControlError, Result};
use crate::math::Position;

/// Radii used by transition checks and per-unit behaviours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageThresholds {
    /// Threat radius around our spawn that triggers Defense.
    pub defense_range: u32,
    /// Objective radius around the enemy spawn; empty means AttackBase.
    pub attack_base_range: u32,
    /// Convergence radius around the rally point.
    pub rally_radius: u32,
    /// Per-unit engagement radius while defending.
    pub local_defense_range: u32,
    /// Pre-filter radius for path-based target selection.
    pub target_prefilter_range: u32,
}

impl Default for StageThresholds {
    fn default() -> Self {
        Self {
            defense_range: 80,
            attack_base_range: 28,
            rally_radius: 5,
            local_defense_range: 10,
            target_prefilter_range: 30,
        }
    }
}

impl StageThresholds {
    /// Reject zero radii.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("defense_range", self.defense_range),
            ("attack_base_range", self.attack_base_range),
            ("rally_radius", self.rally_radius),
            ("local_defense_range", self.local_defense_range),
            ("target_prefilter_range", self.target_prefilter_range),
        ];
        match fields.iter().find(|(_, value)| *value == 0) {
            Some((name, _)) => Err(ControlError::InvalidConfig(format!("{name} must be positive"))),
            None => Ok(()),
        }
    }
}

/// Where the army gathers while it is being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RallyPointSpec {
    /// Our spawn's column at a fixed row.
    SpawnColumn {
        /// Row of the rally point.
        y: i32,
    },
    /// A fixed offset from our spawn.
    SpawnOffset {
        /// Column offset.
        dx: i32,
        /// Row offset.
        dy: i32,
    },
    /// An absolute tile.
    Fixed {
        /// Column.
        x: i32,
        /// Row.
        y: i32,
    },
}

impl Default for RallyPointSpec {
    fn default() -> Self {
        Self::SpawnColumn { y: 10 }
    }
}

impl RallyPointSpec {
    /// Resolve against our spawn position.
    #[must_use]
    pub const fn resolve(self, my_spawn: Position) -> Position {
        match self {
            Self::SpawnColumn { y } => Position::new(my_spawn.x, y),
            Self::SpawnOffset { dx, dy } => my_spawn.offset(dx, dy),
            Self::Fixed { x, y } => Position::new(x, y),
        }
    }
}
