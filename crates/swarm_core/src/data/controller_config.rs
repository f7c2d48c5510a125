//! Top-level controller configuration.

use serde::{Deserialize, Serialize};

use crate::components::ResourceKind;
use crate::error::{ControlError, Result};

use super::{RallyPointSpec, RoleTemplate, StageThresholds};

/// Everything a controller reads at startup.
///
/// # Example RON
///
/// ```ron
/// ControllerConfig(
///     economy: [RoleTemplate(role: Carrier, body: [Move, Move, Move, Move, Carry, Carry], target: 3)],
///     army: [RoleTemplate(role: Healer, body: [Move, Move, Heal], target: 2)],
///     thresholds: StageThresholds(defense_range: 60),
///     rally: SpawnOffset(dx: 0, dy: -12),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Requests issued during SpawnWorkers, in order.
    #[serde(default = "RoleTemplate::default_economy")]
    pub economy: Vec<RoleTemplate>,
    /// Requests issued during SpawnArmy, in order.
    #[serde(default = "RoleTemplate::default_army")]
    pub army: Vec<RoleTemplate>,
    /// Stage radii.
    #[serde(default)]
    pub thresholds: StageThresholds,
    /// Rally point rule.
    #[serde(default)]
    pub rally: RallyPointSpec,
    /// Resource hauled by carriers.
    #[serde(default)]
    pub resource: ResourceKind,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            economy: RoleTemplate::default_economy(),
            army: RoleTemplate::default_army(),
            thresholds: StageThresholds::default(),
            rally: RallyPointSpec::default(),
            resource: ResourceKind::Energy,
        }
    }
}

impl ControllerConfig {
    /// Parse and validate a RON document.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::ConfigParse`] for malformed RON and
    /// [`ControlError::InvalidConfig`] when validation fails.
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        let config: Self = ron::from_str(ron).map_err(|e| ControlError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty RON.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::ConfigParse`] if serialization fails.
    pub fn to_ron_string(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ControlError::ConfigParse(e.to_string()))
    }

    /// Check every template and threshold.
    ///
    /// # Errors
    ///
    /// Returns the first [`ControlError::InvalidConfig`] found.
    pub fn validate(&self) -> Result<()> {
        self.economy
            .iter()
            .chain(&self.army)
            .try_for_each(RoleTemplate::validate)?;
        self.thresholds.validate()
    }
}
