//! Arena-side entity state.
//!
//! These carry simulation-only fields (fatigue, spawn timers) that the
//! controller never sees. [`ArenaUnit::snapshot`] and
//! [`ArenaStructure::snapshot`] project them into the core's snapshot types
//! from the point of view of one side.

use serde::{Deserialize, Serialize};
use swarm_core::components::{
    BodyPart, Capabilities, EntityId, Store, Structure, StructureKind, Unit, CARRY_CAPACITY_PER_PART,
    HITS_PER_PART,
};
use swarm_core::math::Position;

/// One of the two controlling sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    /// First side.
    Player,
    /// Second side.
    Opponent,
}

impl Side {
    /// Both sides, in the order they act each tick.
    pub const BOTH: [Self; 2] = [Self::Player, Self::Opponent];

    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Player => Self::Opponent,
            Self::Opponent => Self::Player,
        }
    }
}

/// A unit as the arena tracks it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArenaUnit {
    /// Unit id.
    pub id: EntityId,
    /// Owning side.
    pub side: Side,
    /// Body parts, front to back.
    pub body: Vec<BodyPart>,
    /// Current hit points.
    pub hits: u32,
    /// Current tile.
    pub position: Position,
    /// Carried energy.
    pub energy: u32,
    /// Ticks until spawning finishes, 0 once active.
    pub spawn_remaining: u32,
    /// Movement fatigue; the unit cannot move while non-zero.
    pub fatigue: u32,
}

impl ArenaUnit {
    /// Maximum hit points.
    #[must_use]
    pub fn hits_max(&self) -> u32 {
        HITS_PER_PART * self.body.len() as u32
    }

    /// Number of undamaged parts of `kind`.
    ///
    /// Damage destroys parts front to back, so only the last
    /// `ceil(hits / 100)` parts still function.
    #[must_use]
    pub fn active_parts(&self, kind: BodyPart) -> u32 {
        let alive = self.hits.div_ceil(HITS_PER_PART) as usize;
        let first_alive = self.body.len().saturating_sub(alive);
        self.body[first_alive..].iter().filter(|p| **p == kind).count() as u32
    }

    /// Parts that generate fatigue when moving.
    #[must_use]
    pub fn heavy_parts(&self) -> u32 {
        self.body.iter().filter(|p| **p != BodyPart::Move).count() as u32
    }

    /// Carry capacity.
    #[must_use]
    pub fn capacity(&self) -> u32 {
        self.body.iter().filter(|p| **p == BodyPart::Carry).count() as u32 * CARRY_CAPACITY_PER_PART
    }

    /// Space left for energy.
    #[must_use]
    pub fn free_capacity(&self) -> u32 {
        self.capacity().saturating_sub(self.energy)
    }

    /// Check whether the unit is still spawning.
    #[must_use]
    pub const fn is_spawning(&self) -> bool {
        self.spawn_remaining > 0
    }

    /// Project into a controller snapshot as seen by `viewer`.
    #[must_use]
    pub fn snapshot(&self, viewer: Side) -> Unit {
        Unit {
            id: self.id,
            my: self.side == viewer,
            body: self.body.clone(),
            capabilities: Capabilities::from_body(&self.body),
            hits: self.hits,
            hits_max: self.hits_max(),
            position: self.position,
            store: Store::new(self.energy, self.capacity()),
            spawning: self.is_spawning(),
        }
    }
}

/// A structure or resource source as the arena tracks it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArenaStructure {
    /// Structure id.
    pub id: EntityId,
    /// Structure kind.
    pub kind: StructureKind,
    /// Owning side, `None` for neutral objects.
    pub owner: Option<Side>,
    /// Tile.
    pub position: Position,
    /// Current hit points.
    pub hits: u32,
    /// Stored energy.
    pub energy: u32,
    /// Energy capacity.
    pub capacity: u32,
    /// Unit currently being produced, for spawns.
    pub producing: Option<EntityId>,
}

impl ArenaStructure {
    /// Check whether units can stand on this structure's tile.
    #[must_use]
    pub const fn blocks_movement(&self) -> bool {
        !matches!(self.kind, StructureKind::Container)
    }

    /// Check whether attacks can destroy this structure.
    #[must_use]
    pub const fn is_destructible(&self) -> bool {
        !matches!(self.kind, StructureKind::Source)
    }

    /// Space left for energy.
    #[must_use]
    pub const fn free_capacity(&self) -> u32 {
        self.capacity.saturating_sub(self.energy)
    }

    /// Project into a controller snapshot as seen by `viewer`.
    #[must_use]
    pub fn snapshot(&self, viewer: Side) -> Structure {
        Structure {
            id: self.id,
            kind: self.kind,
            my: self.owner.map(|owner| owner == viewer),
            position: self.position,
            hits: self.hits,
            store: Store::new(self.energy, self.capacity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(body: Vec<BodyPart>) -> ArenaUnit {
        let hits = HITS_PER_PART * body.len() as u32;
        ArenaUnit {
            id: 1,
            side: Side::Player,
            body,
            hits,
            position: Position::ORIGIN,
            energy: 0,
            spawn_remaining: 0,
            fatigue: 0,
        }
    }

    #[test]
    fn test_damage_disables_front_parts_first() {
        let mut u = unit(vec![BodyPart::Move, BodyPart::Move, BodyPart::Attack]);
        assert_eq!(u.active_parts(BodyPart::Move), 2);

        u.hits = 150;
        assert_eq!(u.active_parts(BodyPart::Move), 1);
        assert_eq!(u.active_parts(BodyPart::Attack), 1);

        u.hits = 100;
        assert_eq!(u.active_parts(BodyPart::Move), 0);
        assert_eq!(u.active_parts(BodyPart::Attack), 1);
    }

    #[test]
    fn test_snapshot_is_relative_to_viewer() {
        let mut u = unit(vec![BodyPart::Move, BodyPart::Carry]);
        u.energy = 20;
        u.spawn_remaining = 2;

        let mine = u.snapshot(Side::Player);
        assert!(mine.my);
        assert!(mine.spawning);
        assert_eq!(mine.store.capacity, 50);
        assert_eq!(mine.store.energy, 20);
        assert!(!u.snapshot(Side::Opponent).my);
    }
}
