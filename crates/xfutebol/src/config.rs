//! Runtime configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::ConfigError;
use crate::logger::DEFAULT_EXPORT_RETENTION;
use crate::types::{Difficulty, GameModeType};

/// Settings for the binary and the opponent loop.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct XfutebolConfig {
    /// Match mode for new sessions.
    #[serde(default)]
    mode: GameModeType,

    /// Strength of the automated opponent.
    #[serde(default)]
    difficulty: Difficulty,

    /// Pause between automated actions, in milliseconds.
    #[serde(default = "default_pacing_ms")]
    opponent_pacing_ms: u64,

    /// Directory for exported match logs.
    #[serde(default = "default_export_dir")]
    export_dir: PathBuf,

    /// Exported logs kept per directory.
    #[serde(default = "default_log_retention")]
    log_retention: usize,
}

#[instrument]
fn default_pacing_ms() -> u64 {
    600
}

#[instrument]
fn default_export_dir() -> PathBuf {
    PathBuf::from("logs")
}

#[instrument]
fn default_log_retention() -> usize {
    DEFAULT_EXPORT_RETENTION
}

impl Default for XfutebolConfig {
    fn default() -> Self {
        Self {
            mode: GameModeType::default(),
            difficulty: Difficulty::default(),
            opponent_pacing_ms: default_pacing_ms(),
            export_dir: default_export_dir(),
            log_retention: default_log_retention(),
        }
    }
}

impl XfutebolConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        info!(mode = %config.mode, difficulty = %config.difficulty, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, defaults otherwise.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            debug!("No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Overrides the export directory.
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    /// Overrides the mode.
    pub fn with_mode(mut self, mode: GameModeType) -> Self {
        self.mode = mode;
        self
    }

    /// Pacing as a duration.
    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.opponent_pacing_ms)
    }
}
