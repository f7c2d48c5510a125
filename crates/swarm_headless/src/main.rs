//! Headless swarm match runner.
//!
//! # Usage
//!
//! ```bash
//! # Mirror match with default controllers on the built-in map
//! cargo run -p swarm_headless -- run
//!
//! # Custom scenario and configs, journal written for later verification
//! cargo run -p swarm_headless -- run --scenario scenarios/corridor.ron \
//!     --player-config configs/rush.ron --journal out/match.bin
//!
//! # Validate config and scenario files
//! cargo run -p swarm_headless -- validate --config configs/default.ron
//!
//! # Re-run a journal and compare the final state hash
//! cargo run -p swarm_headless -- verify --journal out/match.bin
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use swarm_arena::scenario::Scenario;
use swarm_core::data::ControllerConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use swarm_headless::{
    load_config, load_config_or_default, load_scenario, verify_journal, ConfigError, MatchJournal, MatchRunner,
    MatchSetup,
};

#[derive(Parser)]
#[command(name = "swarm_headless")]
#[command(about = "Headless swarm controller match runner")]
#[command(version)]
struct Cli {
    /// Enable debug logging to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one match and print a JSON report
    Run {
        /// Scenario file (default: built-in spawn and swamp map)
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Controller config for the player side
        #[arg(long)]
        player_config: Option<PathBuf>,

        /// Controller config for the opponent side
        #[arg(long)]
        opponent_config: Option<PathBuf>,

        /// Tick limit (default: the scenario's own)
        #[arg(short, long)]
        ticks: Option<u64>,

        /// Write a journal for `verify`
        #[arg(short, long)]
        journal: Option<PathBuf>,
    },

    /// Check config and scenario files
    Validate {
        /// Controller config files
        #[arg(short, long)]
        config: Vec<PathBuf>,

        /// Scenario files
        #[arg(short, long)]
        scenario: Vec<PathBuf>,
    },

    /// Replay a journal and compare the final state hash
    Verify {
        /// Journal file written by `run`
        #[arg(short, long)]
        journal: PathBuf,
    },

    /// Print the default controller config as RON
    DefaultConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries JSON
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Run {
            scenario,
            player_config,
            opponent_config,
            ticks,
            journal,
        } => cmd_run(scenario, player_config, opponent_config, ticks, journal),
        Commands::Validate { config, scenario } => cmd_validate(&config, &scenario),
        Commands::Verify { journal } => cmd_verify(&journal),
        Commands::DefaultConfig => cmd_default_config(),
    }
}

fn load_setup(
    scenario: Option<&Path>,
    player_config: Option<&Path>,
    opponent_config: Option<&Path>,
    ticks: Option<u64>,
) -> Result<MatchSetup, ConfigError> {
    let scenario = match scenario {
        Some(path) => load_scenario(path)?,
        None => Scenario::spawn_and_swamp(),
    };
    let tick_limit = ticks.unwrap_or(scenario.tick_limit);
    Ok(MatchSetup {
        scenario,
        player: load_config_or_default(player_config)?,
        opponent: load_config_or_default(opponent_config)?,
        tick_limit,
    })
}

/// Play a single match.
fn cmd_run(
    scenario: Option<PathBuf>,
    player_config: Option<PathBuf>,
    opponent_config: Option<PathBuf>,
    ticks: Option<u64>,
    journal: Option<PathBuf>,
) -> ExitCode {
    let setup = match load_setup(scenario.as_deref(), player_config.as_deref(), opponent_config.as_deref(), ticks)
    {
        Ok(setup) => setup,
        Err(e) => {
            tracing::error!(error = %e, "failed to load match inputs");
            return ExitCode::FAILURE;
        }
    };

    let mut runner = match MatchRunner::new(setup) {
        Ok(runner) => runner,
        Err(e) => {
            tracing::error!(error = %e, "failed to build arena");
            return ExitCode::FAILURE;
        }
    };

    let result = runner.run();

    if let Some(path) = journal {
        match runner.journal().save(&path) {
            Ok(()) => tracing::info!(path = %path.display(), "journal written"),
            Err(e) => {
                tracing::error!(error = %e, path = %path.display(), "failed to write journal");
                return ExitCode::FAILURE;
            }
        }
    }

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(error = %e, "match failed");
            return ExitCode::FAILURE;
        }
    };
    match report.to_json() {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to encode report");
            ExitCode::FAILURE
        }
    }
}

/// Validate every given file, reporting all failures.
fn cmd_validate(configs: &[PathBuf], scenarios: &[PathBuf]) -> ExitCode {
    if configs.is_empty() && scenarios.is_empty() {
        tracing::warn!("nothing to validate");
        return ExitCode::SUCCESS;
    }

    let mut failures = 0;
    for path in configs {
        match load_config(path) {
            Ok(_) => tracing::info!(path = %path.display(), "config ok"),
            Err(e) => {
                tracing::error!(error = %e, "config invalid");
                failures += 1;
            }
        }
    }
    for path in scenarios {
        match load_scenario(path) {
            Ok(_) => tracing::info!(path = %path.display(), "scenario ok"),
            Err(e) => {
                tracing::error!(error = %e, "scenario invalid");
                failures += 1;
            }
        }
    }

    if failures == 0 {
        ExitCode::SUCCESS
    } else {
        tracing::error!(failures, "validation failed");
        ExitCode::FAILURE
    }
}

/// Replay a journal.
fn cmd_verify(path: &Path) -> ExitCode {
    let result = MatchJournal::load(path).and_then(|journal| verify_journal(&journal));
    let verification = match result {
        Ok(verification) => verification,
        Err(e) => {
            tracing::error!(error = %e, path = %path.display(), "verification failed");
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&verification) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!(error = %e, "failed to encode verification"),
    }
    if verification.is_match() {
        tracing::info!(hash = verification.actual, "journal verified");
        ExitCode::SUCCESS
    } else {
        tracing::error!(
            expected = verification.expected,
            actual = verification.actual,
            "final state hash mismatch"
        );
        ExitCode::FAILURE
    }
}

/// Print the built-in controller config.
fn cmd_default_config() -> ExitCode {
    match ControllerConfig::default().to_ron_string() {
        Ok(ron) => {
            println!("{ron}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to encode default config");
            ExitCode::FAILURE
        }
    }
}
