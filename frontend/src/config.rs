//! Harness configuration, read from `<config_dir>/ramwatch/config.toml`.
//!
//! Every field has a default, so a missing file or a partial file both
//! work. Command-line flags override whatever the file says.

use std::path::{Path, PathBuf};

use ramwatch_core::core::title::{EpisodeSettings, GameMode, Players};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("unsupported player count {0} (expected 1, 2 or 4)")]
    Players(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Player count for mode validation: 1, 2 or 4.
    pub players: usize,
    /// Game mode to select before replaying. `None` keeps the cartridge's
    /// power-on mode.
    pub mode: Option<GameMode>,
    /// Episode frame cap; 0 disables it. Titles may override.
    pub max_frames_per_episode: u32,
    /// Emit one JSON object per frame instead of episode summaries.
    pub json: bool,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            players: 1,
            mode: None,
            max_frames_per_episode: EpisodeSettings::default().max_frames_per_episode,
            json: false,
            log_filter: "info".to_string(),
        }
    }
}

impl HarnessConfig {
    /// Default config file location.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ramwatch")
            .join("config.toml")
    }

    /// Load `path`, or defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn players(&self) -> Result<Players, ConfigError> {
        Players::from_count(self.players).ok_or(ConfigError::Players(self.players))
    }

    pub fn episode_settings(&self) -> EpisodeSettings {
        EpisodeSettings {
            max_frames_per_episode: self.max_frames_per_episode,
        }
    }
}
