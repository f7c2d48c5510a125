//! Proptest strategies.
//!
//! These generate random but reproducible snapshots for property-based
//! testing of classification, spawn planning and stage transitions.

use proptest::prelude::*;
use swarm_core::components::{BodyPart, EntityId, Unit, MAX_BODY_PARTS};
use swarm_core::math::Position;
use swarm_core::stage::{Stage, StageSignals};

/// Generate any body part kind.
pub fn arb_body_part() -> impl Strategy<Value = BodyPart> {
    proptest::sample::select(BodyPart::ALL.to_vec())
}

/// Generate a valid body of 1 to `max_len` parts.
pub fn arb_body(max_len: usize) -> impl Strategy<Value = Vec<BodyPart>> {
    proptest::collection::vec(arb_body_part(), 1..=max_len.clamp(1, MAX_BODY_PARTS))
}

/// Generate a tile on a `width` x `height` grid.
pub fn arb_position(width: i32, height: i32) -> impl Strategy<Value = Position> {
    (0..width, 0..height).prop_map(|(x, y)| Position::new(x, y))
}

/// Generate a list of units with unique ids, owned by either side.
pub fn arb_units(max_len: usize) -> impl Strategy<Value = Vec<Unit>> {
    proptest::collection::vec((any::<bool>(), arb_body(8), arb_position(100, 100)), 0..max_len).prop_map(
        |specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (my, body, position))| Unit::new(i as EntityId + 1, my, body, position))
                .collect()
        },
    )
}

/// Generate any battle stage.
pub fn arb_stage() -> impl Strategy<Value = Stage> {
    prop_oneof![
        Just(Stage::SpawnWorkers),
        Just(Stage::SpawnArmy),
        Just(Stage::Defense),
        Just(Stage::Attack),
        Just(Stage::AttackBase),
    ]
}

/// Generate any combination of stage signals.
pub fn arb_signals() -> impl Strategy<Value = StageSignals> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(economy_ready, army_ready, threat_near_base, objective_undefended)| StageSignals {
            economy_ready,
            army_ready,
            threat_near_base,
            objective_undefended,
        },
    )
}
