//! Parsing and validation of `recomp.toml` session configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Session configuration from the `[tracker]` table of `recomp.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Directory holding the persisted snapshot.
    pub snapshot_dir: PathBuf,

    /// Whether independent units are diffed in parallel.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_parallel() -> bool {
    true
}

impl SessionConfig {
    /// Creates a configuration with defaults for everything but the
    /// snapshot directory.
    pub fn new(snapshot_dir: impl Into<PathBuf>) -> Self {
        Self {
            snapshot_dir: snapshot_dir.into(),
            parallel: default_parallel(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    tracker: SessionConfig,
}

/// Loads and validates `recomp.toml` from a project directory.
pub fn load_config(project_dir: &Path) -> Result<SessionConfig, ConfigError> {
    let config_path = project_dir.join("recomp.toml");
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<SessionConfig, ConfigError> {
    let file: ConfigFile =
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate_config(&file.tracker)?;
    Ok(file.tracker)
}

fn validate_config(config: &SessionConfig) -> Result<(), ConfigError> {
    if config.snapshot_dir.as_os_str().is_empty() {
        return Err(ConfigError::MissingField("tracker.snapshot_dir".to_string()));
    }
    Ok(())
}
