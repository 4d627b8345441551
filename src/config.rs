// File: src/config.rs
use crate::core::types::CarrySource;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_ROUND_SIZE: usize = 5;
pub const DEFAULT_CARRY_LIMIT: usize = 2;
pub const DEFAULT_MASTERY_CAP: u32 = 10;
pub const DEFAULT_DATA_PATH: &str = "vocab_match/profile.bin";
/// Tiles are picked with a single digit on screen, so rounds stop at nine.
pub const MAX_ROUND_SIZE: usize = 9;

/// Round rotation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    /// Words per round when the pool is large enough.
    pub round_size: usize,
    /// Most words carried over from the previous round.
    pub carry_limit: usize,
    /// Error-free matches after which a word is retired.
    pub mastery_cap: u32,
    pub carry_source: CarrySource,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            round_size: DEFAULT_ROUND_SIZE,
            carry_limit: DEFAULT_CARRY_LIMIT,
            mastery_cap: DEFAULT_MASTERY_CAP,
            carry_source: CarrySource::default(),
        }
    }
}

/// Top-level game configuration, usually read from a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub round: RoundConfig,
    /// Seed the stock players (Guest, Tony, Mina, ...) before loading.
    pub seed_presets: bool,
    pub data_path: PathBuf,
    /// Custom vocabulary file; the built-in catalog when absent.
    pub vocab_path: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            round: RoundConfig::default(),
            seed_presets: true,
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            vocab_path: None,
        }
    }
}

impl GameConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let r = &self.round;
        if r.round_size == 0 {
            return Err(ConfigError::Invalid("round_size must be at least 1".into()));
        }
        if r.round_size > MAX_ROUND_SIZE {
            return Err(ConfigError::Invalid(format!(
                "round_size {} exceeds the maximum of {}",
                r.round_size, MAX_ROUND_SIZE
            )));
        }
        if r.carry_limit > r.round_size {
            return Err(ConfigError::Invalid(format!(
                "carry_limit {} exceeds round_size {}",
                r.carry_limit, r.round_size
            )));
        }
        if r.mastery_cap == 0 {
            return Err(ConfigError::Invalid("mastery_cap must be at least 1".into()));
        }
        Ok(())
    }
}
