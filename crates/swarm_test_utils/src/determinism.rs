//! Determinism testing utilities.
//!
//! Provides a harness for verifying that a match produces identical results
//! given identical inputs.
//!
//! # Testing Strategy
//!
//! Replays and side-by-side controller comparisons only work if the arena
//! and both controllers are fully deterministic. Sources of
//! non-determinism include:
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   The arena iterates in sorted entity ID order and the controller works
//!   on snapshots that arrive in that order.
//!
//! - **Floating-point math**: Positions and costs are integers throughout.
//!
//! - **System randomness**: Neither crate draws random numbers.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use swarm_arena::arena::Arena;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of ticks simulated.
    pub ticks: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic match).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the match was deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Match is non-deterministic!\n\
                 Runs: {}\n\
                 Ticks: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.ticks,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a match multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run the match
/// * `ticks` - Number of ticks to simulate per run
/// * `setup` - Function to create the initial state
/// * `step` - Function to advance the state by one tick
/// * `hash` - Function to compute the state hash
///
/// # Example
///
/// ```ignore
/// use swarm_test_utils::determinism::verify_determinism;
/// use swarm_test_utils::fixtures::MatchFixture;
///
/// let result = verify_determinism(
///     3,
///     200,
///     MatchFixture::spawn_and_swamp,
///     |m| { let _ = m.tick(); },
///     |m| m.arena.state_hash(),
/// );
/// result.assert_deterministic();
/// ```
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    ticks: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for _ in 0..ticks {
            step(&mut state);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        ticks,
    }
}

/// Compare two runs tick-by-tick, finding the first divergence.
///
/// # Returns
///
/// `None` if the runs match throughout, `Some(tick)` for the first tick
/// after which their hashes differ. Tick 0 means the initial states differ.
pub fn find_first_divergence<S, Setup, Step, HashFn>(
    setup: Setup,
    ticks: u64,
    step: Step,
    hash: HashFn,
) -> Option<u64>
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut first = setup();
    let mut second = setup();

    if hash(&first) != hash(&second) {
        return Some(0);
    }

    for tick in 1..=ticks {
        step(&mut first);
        step(&mut second);

        if hash(&first) != hash(&second) {
            return Some(tick);
        }
    }

    None
}

/// Verify that an encode and decode of `arena` preserves its state exactly.
pub fn verify_serialization_determinism(arena: &Arena) -> bool {
    let hash_before = arena.state_hash();

    let Ok(bytes) = arena.serialize() else {
        return false;
    };
    let Ok(restored) = Arena::deserialize(&bytes) else {
        return false;
    };

    hash_before == restored.state_hash()
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}
