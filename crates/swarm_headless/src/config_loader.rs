//! Loading controller configs and scenarios from disk.
//!
//! The core crate parses RON but never touches the filesystem; this module
//! is the edge where files are read.

use std::path::{Path, PathBuf};

use swarm_arena::error::ArenaError;
use swarm_arena::scenario::Scenario;
use swarm_core::data::ControllerConfig;
use swarm_core::error::ControlError;
use thiserror::Error;
use tracing::debug;

/// Error type for loading configuration files.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File not found.
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),
    /// Failed to read file.
    #[error("failed to read {path}: {source}")]
    ReadError {
        /// File that failed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// Controller config failed to parse or validate.
    #[error("{path}: {source}")]
    Controller {
        /// File that failed.
        path: PathBuf,
        /// Parse or validation error.
        #[source]
        source: ControlError,
    },
    /// Scenario failed to parse or validate.
    #[error("{path}: {source}")]
    Scenario {
        /// File that failed.
        path: PathBuf,
        /// Parse or validation error.
        #[source]
        source: ArenaError,
    },
}

fn read(path: &Path) -> Result<String, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }
    std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and validate a controller config from a RON file.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable, malformed or fails
/// validation.
pub fn load_config(path: impl AsRef<Path>) -> Result<ControllerConfig, ConfigError> {
    let path = path.as_ref();
    let text = read(path)?;
    let config = ControllerConfig::from_ron_str(&text).map_err(|source| ConfigError::Controller {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), economy = config.economy.len(), army = config.army.len(), "loaded controller config");
    Ok(config)
}

/// Load a controller config, or the default one when no path is given.
///
/// # Errors
///
/// See [`load_config`].
pub fn load_config_or_default(path: Option<&Path>) -> Result<ControllerConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(ControllerConfig::default()),
    }
}

/// Load and validate a scenario from a RON file.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable, malformed or
/// describes an impossible arena.
pub fn load_scenario(path: impl AsRef<Path>) -> Result<Scenario, ConfigError> {
    let path = path.as_ref();
    let text = read(path)?;
    let wrap = |source| ConfigError::Scenario {
        path: path.to_path_buf(),
        source,
    };
    let scenario = Scenario::from_ron_str(&text).map_err(wrap)?;
    scenario.validate().map_err(wrap)?;
    debug!(path = %path.display(), name = %scenario.name, "loaded scenario");
    Ok(scenario)
}
