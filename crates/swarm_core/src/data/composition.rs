//! Role composition tables.

use serde::{Deserialize, Serialize};

use crate::body::BodyBuilder;
use crate::components::{BodyPart, MAX_BODY_PARTS};
use crate::error::{ControlError, Result};
use crate::roles::{Role, RoleBuckets};
use crate::spawn::SpawnRequest;

/// Desired body and headcount for one role.
///
/// # Example RON
///
/// ```ron
/// RoleTemplate(
///     role: Healer,
///     body: [Move, Move, Heal],
///     target: 3,
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleTemplate {
    /// Role counted against `target`.
    pub role: Role,
    /// Body layout to spawn, front to back.
    pub body: Vec<BodyPart>,
    /// Desired live headcount.
    pub target: u32,
}

impl RoleTemplate {
    /// Create a template.
    #[must_use]
    pub fn new(role: Role, body: Vec<BodyPart>, target: u32) -> Self {
        Self { role, body, target }
    }

    /// Turn the template into a request counted against `buckets`.
    #[must_use]
    pub fn request(&self, buckets: &RoleBuckets<'_>) -> SpawnRequest {
        SpawnRequest::from_buckets(self.role, self.body.clone(), self.target, buckets)
    }

    /// Check the body is spawnable and actually fills the role.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::InvalidConfig`] describing the first problem.
    pub fn validate(&self) -> Result<()> {
        if self.body.is_empty() {
            return Err(ControlError::InvalidConfig(format!("{:?} template has an empty body", self.role)));
        }
        if self.body.len() > MAX_BODY_PARTS {
            return Err(ControlError::InvalidConfig(format!(
                "{:?} template has {} parts, at most {MAX_BODY_PARTS} allowed",
                self.role,
                self.body.len()
            )));
        }
        if !self.body.contains(&self.role.required_part()) {
            return Err(ControlError::InvalidConfig(format!(
                "{:?} template lacks a {:?} part",
                self.role,
                self.role.required_part()
            )));
        }
        Ok(())
    }

    pub(super) fn default_economy() -> Vec<Self> {
        vec![Self::new(Role::Carrier, BodyBuilder::new().carry(2).moves(2).build(), 3)]
    }

    pub(super) fn default_army() -> Vec<Self> {
        vec![
            Self::new(Role::Attacker, BodyBuilder::new().attack(3).moves(3).build(), 6),
            Self::new(Role::RangedAttacker, BodyBuilder::new().ranged_attack(3).moves(2).build(), 8),
            Self::new(Role::Healer, BodyBuilder::new().heal(1).moves(2).build(), 3),
        ]
    }
}
