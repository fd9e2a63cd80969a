//! Game tuning loaded from an optional TOML file.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use garden_defence_core::DEFAULT_FINAL_WAVE;
use garden_defence_system_spawning::Config as SpawnConfig;
use serde::Deserialize;

/// Seed used when neither the command line nor the config file supplies one.
pub(crate) const DEFAULT_SEED: u64 = 0x5eed_6a4d;

/// Tuning knobs for a single game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    /// Seed feeding the zombie lane picker.
    pub(crate) seed: u64,
    /// Wave whose completion wins the game.
    pub(crate) final_wave: u32,
    /// Zombie spawn cadence.
    pub(crate) spawn: SpawnCadence,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            final_wave: DEFAULT_FINAL_WAVE,
            spawn: SpawnCadence::default(),
        }
    }
}

/// Spawn interval of wave `n` is `base_ms - n * step_ms`, floored at `minimum_ms`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SpawnCadence {
    pub(crate) base_ms: u64,
    pub(crate) step_ms: u64,
    pub(crate) minimum_ms: u64,
}

impl Default for SpawnCadence {
    fn default() -> Self {
        Self {
            base_ms: 3_000,
            step_ms: 200,
            minimum_ms: 1_000,
        }
    }
}

impl GameConfig {
    /// Reads a config file; keys that are absent keep their defaults.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.final_wave == 0 {
            return Err(ConfigError::Invalid("final_wave must be at least 1"));
        }
        if self.spawn.minimum_ms == 0 {
            return Err(ConfigError::Invalid("spawn.minimum_ms must be positive"));
        }
        Ok(())
    }

    /// Spawning system configuration derived from this tuning.
    #[must_use]
    pub(crate) fn spawn_config(&self) -> SpawnConfig {
        SpawnConfig::new(self.seed).with_cadence(
            Duration::from_millis(self.spawn.base_ms),
            Duration::from_millis(self.spawn.step_ms),
            Duration::from_millis(self.spawn.minimum_ms),
        )
    }
}

/// Failures while loading game tuning.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML or has unexpected keys.
    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// A value is outside its allowed range.
    #[error("invalid game config: {0}")]
    Invalid(&'static str),
}
