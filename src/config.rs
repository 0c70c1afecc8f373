use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::aggregation::UnmappedPolicy;
use crate::engine::EngineOptions;
use crate::error::RaceError;
use crate::schema::defaults;

// ---- TOML Config ----

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RaceConfig {
    pub data: DataConfig,
    pub race: PlaybackConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    pub csv_path: PathBuf,
    pub unmapped: UnmappedPolicy,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PlaybackConfig {
    /// Bars shown per year.
    pub top_n: usize,
    /// Length of the value tween between two years.
    pub transition_ms: u64,
    /// Delay between automatic year steps.
    pub step_ms: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(defaults::CSV_PATH),
            unmapped: UnmappedPolicy::Exclude,
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            top_n: defaults::TOP_N,
            transition_ms: defaults::TRANSITION_MS,
            step_ms: defaults::STEP_MS,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: defaults::PORT,
        }
    }
}

impl PlaybackConfig {
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            top_n: self.top_n,
            transition: Duration::from_millis(self.transition_ms),
        }
    }

    pub fn step(&self) -> Duration {
        Duration::from_millis(self.step_ms)
    }
}

impl RaceConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RaceError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| RaceError::Config {
            context: "read",
            detail: format!("'{}': {e}", path.display()),
        })?;
        Self::parse(&content).map_err(|e| match e {
            RaceError::Config { context, detail } => RaceError::Config {
                context,
                detail: format!("'{}': {detail}", path.display()),
            },
            other => other,
        })
    }

    pub fn parse(content: &str) -> Result<Self, RaceError> {
        toml::from_str(content).map_err(|e| RaceError::Config {
            context: "parse",
            detail: e.to_string(),
        })
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, RaceError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }
}
