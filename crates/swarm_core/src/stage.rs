//! Battle stages and their transition rules.
//!
//! The transition is a pure function of the current stage and the
//! [`StageSignals`] measured this tick. There is no hysteresis: a threat
//! flickering at the edge of the defence radius moves the army back and
//! forth between Defense and Attack.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::components::Unit;
use crate::math::{find_in_range, Position};

/// Strategic posture of the army.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Stage {
    /// Build the economy.
    #[default]
    SpawnWorkers,
    /// Build and rally the army.
    SpawnArmy,
    /// Hold the base against nearby threats.
    Defense,
    /// Attack visible enemy units.
    Attack,
    /// Attack the enemy spawn.
    AttackBase,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SpawnWorkers => "spawn-workers",
            Self::SpawnArmy => "spawn-army",
            Self::Defense => "defense",
            Self::Attack => "attack",
            Self::AttackBase => "attack-base",
        };
        f.write_str(name)
    }
}

/// Conditions measured during one tick that drive transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StageSignals {
    /// Every economy request reached its target.
    pub economy_ready: bool,
    /// Every army request reached its target and the army has rallied.
    pub army_ready: bool,
    /// An enemy combat unit is inside the defence radius of our spawn.
    pub threat_near_base: bool,
    /// The enemy spawn exists and no enemy combat unit guards it.
    pub objective_undefended: bool,
}

/// Compute the stage for the next tick.
///
/// Later checks override earlier ones: in SpawnArmy a threat beats army
/// readiness, in Attack an undefended objective beats a threat.
#[must_use]
pub fn next_stage(stage: Stage, signals: &StageSignals) -> Stage {
    let mut next = stage;
    match stage {
        Stage::SpawnWorkers => {
            if signals.economy_ready {
                next = Stage::SpawnArmy;
            }
        }
        Stage::SpawnArmy => {
            if signals.army_ready {
                next = Stage::Attack;
            }
            if signals.threat_near_base {
                next = Stage::Defense;
            }
        }
        Stage::Defense => {
            if !signals.threat_near_base {
                next = Stage::Attack;
            }
        }
        Stage::Attack => {
            if signals.threat_near_base {
                next = Stage::Defense;
            }
            if signals.objective_undefended {
                next = Stage::AttackBase;
            }
        }
        Stage::AttackBase => {
            if signals.threat_near_base {
                next = Stage::Defense;
            }
        }
    }
    next
}

/// Check whether any threat stands within `range` of the rally point.
#[must_use]
pub fn need_defense(threats: &[&Unit], rally_point: Position, range: u32) -> bool {
    !find_in_range(rally_point, threats.iter().copied(), range).is_empty()
}

/// Check whether no threat stands within `range` of the enemy spawn.
#[must_use]
pub fn need_attack_base(threats: &[&Unit], enemy_spawn: Position, range: u32) -> bool {
    find_in_range(enemy_spawn, threats.iter().copied(), range).is_empty()
}

/// Holds the persistent stage across ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageMachine {
    stage: Stage,
}

impl StageMachine {
    /// Start in [`Stage::SpawnWorkers`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume in a given stage.
    #[must_use]
    pub const fn starting_in(stage: Stage) -> Self {
        Self { stage }
    }

    /// Current stage.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Apply this tick's signals and return the new stage.
    pub fn advance(&mut self, tick: u64, signals: &StageSignals) -> Stage {
        let next = next_stage(self.stage, signals);
        if next != self.stage {
            info!(tick, from = %self.stage, to = %next, "stage transition");
            self.stage = next;
        }
        next
    }
}
