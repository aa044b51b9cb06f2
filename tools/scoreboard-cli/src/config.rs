//! Configuration for the scoreboard CLI

use anyhow::{bail, Context, Result};
use player_registry::{DEFAULT_MAX_PLAYERS, PLAYER_LIMIT_CEILING};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the scoreboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreboardConfig {
    /// Default-named players created at startup
    pub initial_players: usize,

    /// Players shown at once (derived from terminal height when unset)
    pub show_max: Option<usize>,

    /// Hard cap on the number of players
    pub max_players: usize,

    /// Where `save` writes when no path is given
    pub save_file: Option<PathBuf>,

    /// Player list restored at startup and saved on exit
    pub history_file: Option<PathBuf>,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, overridden by RUST_LOG
    pub level: String,

    /// Output format: "compact" or "pretty"
    pub format: String,
}

impl Default for ScoreboardConfig {
    fn default() -> Self {
        Self {
            initial_players: 0,
            show_max: None,
            max_players: DEFAULT_MAX_PLAYERS,
            save_file: None,
            history_file: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "warn".to_string(), format: "compact".to_string() }
    }
}

impl ScoreboardConfig {
    /// Load configuration from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: ScoreboardConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Serialize configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check limits against the registry ceiling
    pub fn validate(&self) -> Result<()> {
        if self.max_players > PLAYER_LIMIT_CEILING {
            bail!("max_players must be at most {PLAYER_LIMIT_CEILING}, got {}", self.max_players);
        }
        if let Some(show_max) = self.show_max {
            if show_max > PLAYER_LIMIT_CEILING {
                bail!("show_max must be at most {PLAYER_LIMIT_CEILING}, got {show_max}");
            }
        }
        match self.logging.format.as_str() {
            "compact" | "pretty" => Ok(()),
            other => bail!("Unknown log format '{other}', expected 'compact' or 'pretty'"),
        }
    }
}
