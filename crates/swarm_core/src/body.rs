//! Body layout builder.
//!
//! Bodies are assembled payload-first and then reversed, so the Move parts
//! end up at the front. Damage is applied front to back, which keeps the
//! payload parts alive for as long as possible.

use crate::components::{BodyPart, MAX_BODY_PARTS};

/// Fluent builder for body layouts.
///
/// ```
/// use swarm_core::body::BodyBuilder;
/// use swarm_core::components::BodyPart;
///
/// let body = BodyBuilder::new().carry(2).moves(2).build();
/// assert_eq!(body.len(), 6);
/// assert_eq!(body[0], BodyPart::Move);
/// assert_eq!(body[5], BodyPart::Carry);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodyBuilder {
    parts: Vec<BodyPart>,
}

impl BodyBuilder {
    /// Start an empty body.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `count` parts of `kind`.
    #[must_use]
    pub fn put(mut self, kind: BodyPart, count: u32) -> Self {
        self.parts
            .extend(std::iter::repeat(kind).take(count as usize));
        self
    }

    /// Append melee parts.
    #[must_use]
    pub fn attack(self, count: u32) -> Self {
        self.put(BodyPart::Attack, count)
    }

    /// Append ranged attack parts.
    #[must_use]
    pub fn ranged_attack(self, count: u32) -> Self {
        self.put(BodyPart::RangedAttack, count)
    }

    /// Append heal parts.
    #[must_use]
    pub fn heal(self, count: u32) -> Self {
        self.put(BodyPart::Heal, count)
    }

    /// Append work parts.
    #[must_use]
    pub fn work(self, count: u32) -> Self {
        self.put(BodyPart::Work, count)
    }

    /// Append carry parts.
    #[must_use]
    pub fn carry(self, count: u32) -> Self {
        self.put(BodyPart::Carry, count)
    }

    /// Append tough parts.
    #[must_use]
    pub fn tough(self, count: u32) -> Self {
        self.put(BodyPart::Tough, count)
    }

    /// Append Move parts in proportion to the parts added so far.
    ///
    /// Adds `len * ratio` parts, where `ratio` is a whole multiple
    /// (`moves(2)` doubles the body with movement). The total never grows
    /// past [`MAX_BODY_PARTS`].
    #[must_use]
    pub fn moves(self, ratio: u32) -> Self {
        let len = self.parts.len();
        let room = MAX_BODY_PARTS.saturating_sub(len) as u32;
        let count = (len as u32).saturating_mul(ratio).min(room);
        self.put(BodyPart::Move, count)
    }

    /// Finish the body with Move parts first.
    #[must_use]
    pub fn build(self) -> Vec<BodyPart> {
        let mut parts = self.parts;
        parts.reverse();
        parts
    }
}

/// Total spawn cost of a body.
#[must_use]
pub fn body_cost(body: &[BodyPart]) -> u32 {
    body.iter().map(|p| p.cost()).sum()
}
