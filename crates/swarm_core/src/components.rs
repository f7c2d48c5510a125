//! Snapshot types for units and structures.
//!
//! These are plain data copied out of the host every tick. The controller
//! never holds on to them past the tick they were read in.

use serde::{Deserialize, Serialize};

use crate::math::{Located, Position};

/// Unique identifier for units and structures.
pub type EntityId = u64;

/// Maximum number of parts in one body.
pub const MAX_BODY_PARTS: usize = 50;

/// Hit points contributed by every body part.
pub const HITS_PER_PART: u32 = 100;

/// Resource capacity contributed by every Carry part.
pub const CARRY_CAPACITY_PER_PART: u32 = 50;

// ============================================================================
// Body composition
// ============================================================================

/// A body part kind. Each kind grants one capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BodyPart {
    /// Movement.
    Move,
    /// Harvesting from sources.
    Work,
    /// Carrying resources.
    Carry,
    /// Melee attack at range 1.
    Attack,
    /// Ranged attack at range 3.
    RangedAttack,
    /// Healing adjacent allies.
    Heal,
    /// Extra hit points only.
    Tough,
}

impl BodyPart {
    /// Every part kind, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Move,
        Self::Work,
        Self::Carry,
        Self::Attack,
        Self::RangedAttack,
        Self::Heal,
        Self::Tough,
    ];

    /// Energy cost to spawn one part of this kind.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::Move => 50,
            Self::Work => 100,
            Self::Carry => 50,
            Self::Attack => 80,
            Self::RangedAttack => 150,
            Self::Heal => 250,
            Self::Tough => 10,
        }
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Set of part kinds present in a body.
///
/// Computed once per snapshot so role checks are plain bit tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Capabilities(u8);

impl Capabilities {
    /// No capabilities.
    pub const EMPTY: Self = Self(0);

    /// Build the capability set of a body.
    #[must_use]
    pub fn from_body(body: &[BodyPart]) -> Self {
        Self(body.iter().fold(0, |bits, part| bits | part.bit()))
    }

    /// Check whether the body has at least one part of `part`.
    #[must_use]
    pub const fn contains(self, part: BodyPart) -> bool {
        self.0 & part.bit() != 0
    }

    /// Check whether the body can deal damage at all.
    #[must_use]
    pub const fn can_fight(self) -> bool {
        self.contains(BodyPart::Attack) || self.contains(BodyPart::RangedAttack)
    }
}

// ============================================================================
// Resources
// ============================================================================

/// Resource kinds that can be stored and carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Energy, spent on spawning.
    #[default]
    Energy,
}

/// Resource storage of a unit or structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Store {
    /// Stored energy.
    pub energy: u32,
    /// Total capacity across all resources.
    pub capacity: u32,
}

impl Store {
    /// Create a store with the given capacity and contents.
    #[must_use]
    pub const fn new(energy: u32, capacity: u32) -> Self {
        Self { energy, capacity }
    }

    /// Amount of `kind` currently stored.
    #[must_use]
    pub const fn used(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Energy => self.energy,
        }
    }

    /// Space left for `kind`.
    #[must_use]
    pub const fn free_capacity(&self, kind: ResourceKind) -> u32 {
        self.capacity.saturating_sub(self.used(kind))
    }

    /// Add up to `amount`, returning what was actually stored.
    pub fn deposit(&mut self, kind: ResourceKind, amount: u32) -> u32 {
        let stored = amount.min(self.free_capacity(kind));
        match kind {
            ResourceKind::Energy => self.energy += stored,
        }
        stored
    }

    /// Remove up to `amount`, returning what was actually removed.
    pub fn take(&mut self, kind: ResourceKind, amount: u32) -> u32 {
        let taken = amount.min(self.used(kind));
        match kind {
            ResourceKind::Energy => self.energy -= taken,
        }
        taken
    }
}

// ============================================================================
// Snapshots
// ============================================================================

/// Something that can be the target of a unit action.
pub trait Targetable: Located {
    /// Id of the target.
    fn id(&self) -> EntityId;
}

/// Snapshot of one unit as seen this tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Unit id.
    pub id: EntityId,
    /// Whether the controlling side owns this unit.
    pub my: bool,
    /// Body parts, front to back.
    pub body: Vec<BodyPart>,
    /// Capability set derived from `body`.
    pub capabilities: Capabilities,
    /// Current hit points.
    pub hits: u32,
    /// Maximum hit points.
    pub hits_max: u32,
    /// Current tile.
    pub position: Position,
    /// Carried resources.
    pub store: Store,
    /// Whether the unit is still being spawned.
    pub spawning: bool,
}

impl Unit {
    /// Create a full-health, idle unit snapshot from a body.
    #[must_use]
    pub fn new(id: EntityId, my: bool, body: Vec<BodyPart>, position: Position) -> Self {
        let capabilities = Capabilities::from_body(&body);
        let hits_max = HITS_PER_PART * body.len() as u32;
        let carry_parts = body.iter().filter(|p| **p == BodyPart::Carry).count() as u32;
        Self {
            id,
            my,
            body,
            capabilities,
            hits: hits_max,
            hits_max,
            position,
            store: Store::new(0, carry_parts * CARRY_CAPACITY_PER_PART),
            spawning: false,
        }
    }

    /// Check whether the body contains `part`.
    #[must_use]
    pub const fn has_part(&self, part: BodyPart) -> bool {
        self.capabilities.contains(part)
    }

    /// Check whether the unit is at full health.
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        self.hits >= self.hits_max
    }
}

impl Located for Unit {
    fn position(&self) -> Position {
        self.position
    }
}

impl Targetable for Unit {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// Kind of a static world object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StructureKind {
    /// Produces units and collects delivered energy.
    Spawn,
    /// Passive energy storage that can be withdrawn from.
    Container,
    /// Depletable energy deposit that Work parts harvest.
    Source,
    /// Defensive tower.
    Tower,
    /// Constructed wall.
    Wall,
}

/// Snapshot of one structure or resource source as seen this tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    /// Structure id.
    pub id: EntityId,
    /// Structure kind.
    pub kind: StructureKind,
    /// `Some(true)` if owned by the controlling side, `Some(false)` if owned
    /// by the opponent, `None` if neutral.
    pub my: Option<bool>,
    /// Tile of the structure.
    pub position: Position,
    /// Current hit points (0 for indestructible objects).
    pub hits: u32,
    /// Stored resources.
    pub store: Store,
}

impl Structure {
    /// Check whether the controlling side owns this structure.
    #[must_use]
    pub fn is_mine(&self) -> bool {
        self.my == Some(true)
    }

    /// Check whether the opponent owns this structure.
    #[must_use]
    pub fn is_enemy(&self) -> bool {
        self.my == Some(false)
    }
}

impl Located for Structure {
    fn position(&self) -> Position {
        self.position
    }
}

impl Targetable for Structure {
    fn id(&self) -> EntityId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_from_body() {
        let caps = Capabilities::from_body(&[BodyPart::Move, BodyPart::Attack, BodyPart::Heal]);
        assert!(caps.contains(BodyPart::Attack));
        assert!(caps.contains(BodyPart::Heal));
        assert!(caps.contains(BodyPart::Move));
        assert!(!caps.contains(BodyPart::RangedAttack));
        assert!(caps.can_fight());
    }

    #[test]
    fn test_empty_body_has_no_capabilities() {
        let caps = Capabilities::from_body(&[]);
        assert_eq!(caps, Capabilities::EMPTY);
        for part in BodyPart::ALL {
            assert!(!caps.contains(part));
        }
    }

    #[test]
    fn test_unit_new_derives_stats() {
        let unit = Unit::new(
            7,
            true,
            vec![BodyPart::Move, BodyPart::Carry, BodyPart::Carry],
            Position::new(1, 2),
        );
        assert_eq!(unit.hits_max, 300);
        assert!(unit.is_healthy());
        assert_eq!(unit.store.capacity, 100);
        assert!(unit.has_part(BodyPart::Carry));
    }

    #[test]
    fn test_store_deposit_and_take_are_clamped() {
        let mut store = Store::new(40, 100);
        assert_eq!(store.deposit(ResourceKind::Energy, 80), 60);
        assert_eq!(store.free_capacity(ResourceKind::Energy), 0);
        assert_eq!(store.take(ResourceKind::Energy, 150), 100);
        assert_eq!(store.used(ResourceKind::Energy), 0);
    }
}
