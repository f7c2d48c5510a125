//! Per-tick role classification.
//!
//! Roles are independent filters over the body capability set, not a
//! partition. A unit carrying both Attack and Heal parts sits in both the
//! attacker and the healer bucket.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::components::{BodyPart, EntityId, Unit};

/// Behavioural category derived from body composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    /// Melee attacker.
    Attacker,
    /// Ranged attacker.
    RangedAttacker,
    /// Healer.
    Healer,
    /// Harvester with Work parts.
    Worker,
    /// Resource carrier.
    Carrier,
}

impl Role {
    /// Every role, in bucket order.
    pub const ALL: [Self; 5] = [
        Self::Attacker,
        Self::RangedAttacker,
        Self::Healer,
        Self::Worker,
        Self::Carrier,
    ];

    /// The body part whose presence defines this role.
    #[must_use]
    pub const fn required_part(self) -> BodyPart {
        match self {
            Self::Attacker => BodyPart::Attack,
            Self::RangedAttacker => BodyPart::RangedAttack,
            Self::Healer => BodyPart::Heal,
            Self::Worker => BodyPart::Work,
            Self::Carrier => BodyPart::Carry,
        }
    }

    /// Check whether `unit` fills this role.
    #[must_use]
    pub const fn matches(self, unit: &Unit) -> bool {
        unit.capabilities.contains(self.required_part())
    }
}

/// Units of one owner grouped by role.
#[derive(Debug, Clone, Default)]
pub struct RoleBuckets<'a> {
    /// Units with Attack parts.
    pub attackers: Vec<&'a Unit>,
    /// Units with RangedAttack parts.
    pub ranged_attackers: Vec<&'a Unit>,
    /// Units with Heal parts.
    pub healers: Vec<&'a Unit>,
    /// Units with Work parts.
    pub workers: Vec<&'a Unit>,
    /// Units with Carry parts.
    pub carriers: Vec<&'a Unit>,
    /// Every unit of this owner, classified or not.
    pub all: Vec<&'a Unit>,
}

impl<'a> RoleBuckets<'a> {
    /// Sort `units` into role buckets.
    pub fn from_units(units: impl IntoIterator<Item = &'a Unit>) -> Self {
        let mut buckets = Self::default();
        for unit in units {
            for role in Role::ALL {
                if role.matches(unit) {
                    buckets.bucket_mut(role).push(unit);
                }
            }
            buckets.all.push(unit);
        }
        buckets
    }

    /// Units in the given role.
    #[must_use]
    pub fn bucket(&self, role: Role) -> &[&'a Unit] {
        match role {
            Role::Attacker => &self.attackers,
            Role::RangedAttacker => &self.ranged_attackers,
            Role::Healer => &self.healers,
            Role::Worker => &self.workers,
            Role::Carrier => &self.carriers,
        }
    }

    fn bucket_mut(&mut self, role: Role) -> &mut Vec<&'a Unit> {
        match role {
            Role::Attacker => &mut self.attackers,
            Role::RangedAttacker => &mut self.ranged_attackers,
            Role::Healer => &mut self.healers,
            Role::Worker => &mut self.workers,
            Role::Carrier => &mut self.carriers,
        }
    }

    /// Live count of a role.
    #[must_use]
    pub fn count(&self, role: Role) -> usize {
        self.bucket(role).len()
    }

    /// Units that can deal damage, each listed once.
    #[must_use]
    pub fn fighters(&self) -> Vec<&'a Unit> {
        dedup_by_id([&self.attackers, &self.ranged_attackers])
    }

    /// Combat units including healers, each listed once.
    #[must_use]
    pub fn army(&self) -> Vec<&'a Unit> {
        dedup_by_id([&self.attackers, &self.ranged_attackers, &self.healers])
    }
}

fn dedup_by_id<'a, const N: usize>(lists: [&Vec<&'a Unit>; N]) -> Vec<&'a Unit> {
    let mut seen: HashSet<EntityId> = HashSet::new();
    lists
        .into_iter()
        .flatten()
        .copied()
        .filter(|u| seen.insert(u.id))
        .collect()
}

/// Both sides of the population, classified.
#[derive(Debug, Clone, Default)]
pub struct Roster<'a> {
    /// Units owned by the controlling side.
    pub my: RoleBuckets<'a>,
    /// Units owned by the opponent.
    pub enemy: RoleBuckets<'a>,
}

impl<'a> Roster<'a> {
    /// Enemy units that count as threats: fighters and healers.
    ///
    /// Enemy workers and carriers never trigger defence.
    #[must_use]
    pub fn enemies(&self) -> Vec<&'a Unit> {
        self.enemy.army()
    }

    /// Emit a one-line summary of both sides at debug level.
    pub fn log_summary(&self, tick: u64) {
        debug!(
            tick,
            my_total = self.my.all.len(),
            my_attackers = self.my.attackers.len(),
            my_ranged = self.my.ranged_attackers.len(),
            my_healers = self.my.healers.len(),
            my_carriers = self.my.carriers.len(),
            enemy_total = self.enemy.all.len(),
            enemy_army = self.enemies().len(),
            "roster"
        );
    }
}

/// Partition a snapshot by ownership, then by role.
pub fn classify(units: &[Unit]) -> Roster<'_> {
    Roster {
        my: RoleBuckets::from_units(units.iter().filter(|u| u.my)),
        enemy: RoleBuckets::from_units(units.iter().filter(|u| !u.my)),
    }
}
