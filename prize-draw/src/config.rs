//! Draw configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::tiers::PICK_PRIZES;

/// Whether draws are reproducible.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawMode {
    /// Every draw is seeded from the entry or competition id.
    Testing,
    /// Draws use OS entropy.
    #[default]
    Normal,
}

impl DrawMode {
    /// Seed to use for a draw keyed by `key`, if this mode seeds draws.
    pub fn seed_for(self, key: u64) -> Option<u64> {
        match self {
            DrawMode::Testing => Some(key),
            DrawMode::Normal => None,
        }
    }
}

/// Configuration for a draw session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrawConfig {
    /// Dollar amount that earns one entry.
    #[serde(default = "default_entry_unit_amount")]
    pub entry_unit_amount: f64,

    /// Winners drawn in a random pick competition.
    #[serde(default = "default_pick_winners")]
    pub pick_winners: usize,

    #[serde(default)]
    pub mode: DrawMode,
}

fn default_entry_unit_amount() -> f64 {
    50.0
}

fn default_pick_winners() -> usize {
    PICK_PRIZES.len()
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            entry_unit_amount: default_entry_unit_amount(),
            pick_winners: default_pick_winners(),
            mode: DrawMode::default(),
        }
    }
}

impl DrawConfig {
    /// Default config in testing mode.
    pub fn testing() -> Self {
        Self {
            mode: DrawMode::Testing,
            ..Default::default()
        }
    }

    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.entry_unit_amount.is_finite() || self.entry_unit_amount <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "entry_unit_amount must be a positive amount, got {}",
                self.entry_unit_amount
            )));
        }
        if self.pick_winners == 0 || self.pick_winners > PICK_PRIZES.len() {
            return Err(ConfigError::Invalid(format!(
                "pick_winners must be between 1 and {}, got {}",
                PICK_PRIZES.len(),
                self.pick_winners
            )));
        }
        Ok(())
    }
}
