//! Controller-vs-controller match runner.
//!
//! Each tick both controllers read their own [`SideView`] of the arena and
//! queue orders, player first, then the arena resolves the tick. A match
//! ends when a spawn falls or the tick limit is reached.
//!
//! [`SideView`]: swarm_arena::view::SideView

use std::path::Path;

use serde::{Deserialize, Serialize};
use swarm_arena::arena::{ActionRecord, Arena, Outcome};
use swarm_arena::entity::Side;
use swarm_arena::error::ArenaError;
use swarm_arena::scenario::Scenario;
use swarm_core::controller::Controller;
use swarm_core::data::ControllerConfig;
use swarm_core::error::ControlError;
use swarm_core::stage::Stage;
use thiserror::Error;
use tracing::{debug, error, info};

/// Error type for running and verifying matches.
#[derive(Error, Debug)]
pub enum RunError {
    /// The scenario could not be turned into an arena.
    #[error("arena error: {0}")]
    Arena(#[from] ArenaError),
    /// A controller hit a configuration fault.
    #[error("{side:?} controller failed at tick {tick}: {source}")]
    Controller {
        /// Side whose controller failed.
        side: Side,
        /// Tick of the failure.
        tick: u64,
        /// The controller error.
        #[source]
        source: ControlError,
    },
    /// Journal file could not be read or written.
    #[error("journal IO failed: {0}")]
    Io(#[from] std::io::Error),
    /// Journal file could not be encoded or decoded.
    #[error("journal encoding failed: {0}")]
    Encoding(String),
}

/// Everything needed to play a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSetup {
    /// Starting arena.
    pub scenario: Scenario,
    /// Player controller config.
    pub player: ControllerConfig,
    /// Opponent controller config.
    pub opponent: ControllerConfig,
    /// Ticks after which the match is a draw.
    pub tick_limit: u64,
}

impl MatchSetup {
    /// Both sides on `scenario` with the same config, using the scenario's
    /// own tick limit.
    #[must_use]
    pub fn mirrored(scenario: Scenario, config: ControllerConfig) -> Self {
        let tick_limit = scenario.tick_limit;
        Self {
            scenario,
            player: config.clone(),
            opponent: config,
            tick_limit,
        }
    }
}

/// A stage change of one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageChange {
    /// Tick the change was decided in.
    pub tick: u64,
    /// Side that changed.
    pub side: Side,
    /// Stage before.
    pub from: Stage,
    /// Stage after.
    pub to: Stage,
}

/// Final state of one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideSummary {
    /// Stage at the end of the match.
    pub stage: Stage,
    /// Live units.
    pub units: usize,
    /// Spawn hit points, `None` once destroyed.
    pub spawn_hits: Option<u32>,
}

/// Result of one match, printed as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    /// Scenario name.
    pub scenario: String,
    /// Ticks played.
    pub ticks: u64,
    /// How the match ended.
    pub outcome: Outcome,
    /// Winning side, `None` for a draw or an unfinished match.
    pub winner: Option<Side>,
    /// Player summary.
    pub player: SideSummary,
    /// Opponent summary.
    pub opponent: SideSummary,
    /// Every stage change, in order.
    pub stage_changes: Vec<StageChange>,
    /// Total damage dealt by both sides.
    pub damage_dealt: u64,
    /// Total energy moved by harvest, withdraw and transfer.
    pub energy_moved: u64,
    /// Final arena state hash.
    pub final_state_hash: u64,
}

impl MatchReport {
    /// Pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, RunError> {
        serde_json::to_string_pretty(self).map_err(|e| RunError::Encoding(e.to_string()))
    }
}

/// Everything needed to re-run a match and check its result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchJournal {
    /// Match inputs.
    pub setup: MatchSetup,
    /// Tick the match stopped at.
    pub final_tick: u64,
    /// Arena hash at `final_tick`.
    pub final_state_hash: u64,
    /// Every accepted order.
    pub records: Vec<ActionRecord>,
}

impl MatchJournal {
    /// Write to a bincode file.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    pub fn save(&self, path: &Path) -> Result<(), RunError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = bincode::serialize(self).map_err(|e| RunError::Encoding(e.to_string()))?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Read a bincode file.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or decoding fails.
    pub fn load(path: &Path) -> Result<Self, RunError> {
        let bytes = std::fs::read(path)?;
        bincode::deserialize(&bytes).map_err(|e| RunError::Encoding(e.to_string()))
    }
}

/// Result of re-running a journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verification {
    /// Hash stored in the journal.
    pub expected: u64,
    /// Hash the replay produced.
    pub actual: u64,
}

impl Verification {
    /// Check whether the replay reproduced the recorded state.
    #[must_use]
    pub const fn is_match(&self) -> bool {
        self.expected == self.actual
    }
}

/// A match in progress.
#[derive(Debug)]
pub struct MatchRunner {
    setup: MatchSetup,
    arena: Arena,
    player: Controller,
    opponent: Controller,
    stage_changes: Vec<StageChange>,
    damage_dealt: u64,
    energy_moved: u64,
}

impl MatchRunner {
    /// Build the arena and both controllers.
    ///
    /// # Errors
    ///
    /// Returns an error if the scenario does not build.
    pub fn new(setup: MatchSetup) -> Result<Self, RunError> {
        let arena = setup.scenario.build()?;
        Ok(Self {
            player: Controller::new(setup.player.clone()),
            opponent: Controller::new(setup.opponent.clone()),
            setup,
            arena,
            stage_changes: Vec::new(),
            damage_dealt: 0,
            energy_moved: 0,
        })
    }

    /// The arena.
    #[must_use]
    pub const fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Play one tick.
    ///
    /// # Errors
    ///
    /// Returns the first controller fault.
    pub fn tick(&mut self) -> Result<(), RunError> {
        let tick = self.arena.tick();
        for side in Side::BOTH {
            let controller = match side {
                Side::Player => &mut self.player,
                Side::Opponent => &mut self.opponent,
            };
            let report = controller
                .tick(&mut self.arena.view(side))
                .map_err(|source| RunError::Controller { side, tick, source })?;
            if report.previous_stage != report.stage {
                self.stage_changes.push(StageChange {
                    tick,
                    side,
                    from: report.previous_stage,
                    to: report.stage,
                });
            }
        }
        let events = self.arena.step();
        self.damage_dealt += u64::from(events.damage_dealt);
        self.energy_moved += u64::from(events.energy_moved);
        if !events.deaths.is_empty() {
            debug!(tick, deaths = events.deaths.len(), "tick resolved");
        }
        Ok(())
    }

    /// Play until a spawn falls or the tick limit is reached.
    ///
    /// # Errors
    ///
    /// Returns the first controller fault, which aborts the match.
    pub fn run(&mut self) -> Result<MatchReport, RunError> {
        info!(
            scenario = %self.setup.scenario.name,
            tick_limit = self.setup.tick_limit,
            "match started"
        );
        while self.arena.tick() <= self.setup.tick_limit && self.arena.outcome() == Outcome::Ongoing {
            if let Err(err) = self.tick() {
                error!(%err, "match aborted");
                return Err(err);
            }
        }
        let report = self.report();
        info!(ticks = report.ticks, outcome = ?report.outcome, hash = report.final_state_hash, "match finished");
        Ok(report)
    }

    fn summary(&self, side: Side) -> SideSummary {
        let controller = match side {
            Side::Player => &self.player,
            Side::Opponent => &self.opponent,
        };
        SideSummary {
            stage: controller.stage(),
            units: self.arena.unit_count(side),
            spawn_hits: self.arena.spawn_of(side).map(|s| s.hits),
        }
    }

    /// Report on the match so far.
    #[must_use]
    pub fn report(&self) -> MatchReport {
        let outcome = self.arena.outcome();
        MatchReport {
            scenario: self.setup.scenario.name.clone(),
            ticks: self.arena.tick() - 1,
            outcome,
            winner: match outcome {
                Outcome::Winner(side) => Some(side),
                Outcome::Ongoing | Outcome::Draw => None,
            },
            player: self.summary(Side::Player),
            opponent: self.summary(Side::Opponent),
            stage_changes: self.stage_changes.clone(),
            damage_dealt: self.damage_dealt,
            energy_moved: self.energy_moved,
            final_state_hash: self.arena.state_hash(),
        }
    }

    /// Package the inputs and orders so the match can be verified later.
    #[must_use]
    pub fn journal(&self) -> MatchJournal {
        MatchJournal {
            setup: self.setup.clone(),
            final_tick: self.arena.tick(),
            final_state_hash: self.arena.state_hash(),
            records: self.arena.journal().to_vec(),
        }
    }
}

/// Re-apply a journal's orders to a fresh arena and compare hashes.
///
/// Controllers are not involved; only the recorded orders are replayed.
///
/// # Errors
///
/// Returns an error if the scenario does not build or an order is rejected.
pub fn verify_journal(journal: &MatchJournal) -> Result<Verification, RunError> {
    let mut arena = journal.setup.scenario.build()?;
    arena.replay(&journal.records, journal.final_tick)?;
    Ok(Verification {
        expected: journal.final_state_hash,
        actual: arena.state_hash(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use swarm_core::data::RoleTemplate;
    use swarm_core::roles::Role;
    use swarm_test_utils::fixtures::carrier_body;

    fn quick_setup(tick_limit: u64) -> MatchSetup {
        let mut setup = MatchSetup::mirrored(Scenario::spawn_and_swamp(), ControllerConfig::default());
        setup.tick_limit = tick_limit;
        setup
    }

    #[test]
    fn test_match_stops_at_tick_limit() {
        let mut runner = MatchRunner::new(quick_setup(30)).unwrap();
        let report = runner.run().unwrap();

        assert_eq!(report.ticks, 30);
        assert_eq!(report.outcome, Outcome::Ongoing);
        assert!(report.winner.is_none());
        assert!(report.player.units > 0);
        assert!(report
            .stage_changes
            .iter()
            .all(|c| c.from == Stage::SpawnWorkers && c.to == Stage::SpawnArmy));
    }

    #[test]
    fn test_mirrored_match_is_symmetric() {
        let mut runner = MatchRunner::new(quick_setup(60)).unwrap();
        let report = runner.run().unwrap();

        assert_eq!(report.player.units, report.opponent.units);
        assert_eq!(report.player.stage, report.opponent.stage);
    }

    #[test]
    fn test_journal_verifies() {
        let mut runner = MatchRunner::new(quick_setup(50)).unwrap();
        runner.run().unwrap();

        let journal = runner.journal();
        let verification = verify_journal(&journal).unwrap();
        assert!(verification.is_match());
    }

    #[test]
    fn test_tampered_journal_fails_verification() {
        let mut runner = MatchRunner::new(quick_setup(20)).unwrap();
        runner.run().unwrap();

        let mut journal = runner.journal();
        journal.final_state_hash ^= 1;
        assert!(!verify_journal(&journal).unwrap().is_match());
    }

    #[test]
    fn test_small_economy_moves_on_to_the_army() {
        let mut config = ControllerConfig::default();
        config.economy = vec![RoleTemplate::new(Role::Carrier, carrier_body(), 1)];
        let mut setup = MatchSetup::mirrored(Scenario::spawn_and_swamp(), config);
        setup.tick_limit = 10;

        let mut runner = MatchRunner::new(setup).unwrap();
        let report = runner.run().unwrap();

        let first = report.stage_changes.first().copied().unwrap();
        assert_eq!((first.tick, first.side, first.to), (1, Side::Player, Stage::SpawnArmy));
        assert_eq!(report.stage_changes.len(), 2);
        assert_eq!(report.opponent.stage, Stage::SpawnArmy);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let runner = MatchRunner::new(quick_setup(5)).unwrap();
        let json = runner.report().to_json().unwrap();

        assert!(json.contains("\"scenario\": \"Spawn and Swamp\""));
        assert!(json.contains("\"outcome\": \"Ongoing\""));
    }
}
