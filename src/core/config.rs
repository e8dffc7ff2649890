//! Simulation settings shared by every run against a maze.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "serde")]
use std::path::Path;

use crate::error::ConfigError;
use crate::robot::Heading;

/// Environment variable that overrides [`SimConfig::max_moves`].
pub const MAX_MOVES_ENV: &str = "MAZEBOT_MAX_MOVES";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Move budget for a single run.
    pub max_moves: usize,
    /// Heading the robot faces on the start cell.
    pub start_heading: Heading,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_moves: 100,
            start_heading: Heading::South,
        }
    }
}

impl SimConfig {
    pub const MAX_MOVES_LIMIT: usize = 1_000_000;

    pub fn with_max_moves(mut self, max_moves: usize) -> Self {
        self.max_moves = max_moves;
        self
    }

    pub fn with_start_heading(mut self, heading: Heading) -> Self {
        self.start_heading = heading;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_moves == 0 {
            return Err(ConfigError::Invalid("max_moves must be >= 1"));
        }
        if self.max_moves > Self::MAX_MOVES_LIMIT {
            return Err(ConfigError::Invalid("max_moves too large"));
        }
        Ok(())
    }

    /// Apply [`MAX_MOVES_ENV`] if it is set.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        match std::env::var(MAX_MOVES_ENV) {
            Ok(v) => self.with_max_moves_override(&v),
            Err(_) => Ok(self),
        }
    }

    fn with_max_moves_override(self, value: &str) -> Result<Self, ConfigError> {
        let max_moves = value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid("MAZEBOT_MAX_MOVES must be a number"))?;
        let cfg = self.with_max_moves(max_moves);
        cfg.validate()?;
        Ok(cfg)
    }

    #[cfg(feature = "serde")]
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let cfg: SimConfig = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    #[cfg(feature = "serde")]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
