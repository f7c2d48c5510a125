//! Headless match runner for swarm controllers.
//!
//! Plays controller-vs-controller matches on the reference arena with no
//! graphics. This enables:
//!
//! - **Tuning**: compare controller configs against each other
//! - **CI verification**: validate config and scenario files
//! - **Replay verification**: check that a journal reproduces its match
//!
//! # Output
//!
//! - **stdout**: JSON match reports and verification results
//! - **stderr**: logs, filtered through `RUST_LOG`
//!
//! # Example
//!
//! ```bash
//! # Mirror match on the built-in map
//! cargo run -p swarm_headless -- run --journal match.bin
//!
//! # Check the journal reproduces the same final state
//! cargo run -p swarm_headless -- verify --journal match.bin
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod config_loader;
pub mod runner;

pub use config_loader::{load_config, load_config_or_default, load_scenario, ConfigError};
pub use runner::{verify_journal, MatchJournal, MatchReport, MatchRunner, MatchSetup, RunError, Verification};
