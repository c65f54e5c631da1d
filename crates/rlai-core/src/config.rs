//! Simulation configuration and the seeding contract

use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::{Result, RlaiError};

/// Configuration shared by simulation drivers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Random seed. `None` draws a fresh seed from the OS, so runs differ.
    pub seed: Option<u64>,
    /// Maximum transitions per episode before truncation
    pub max_steps: Option<usize>,
    /// Number of episodes to simulate
    pub episodes: usize,
    /// Discount factor for returns
    pub gamma: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_steps: Some(1_000),
            episodes: 500,
            gamma: 0.95,
        }
    }
}

impl SimulationConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    /// Reject values no simulation can run with
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(RlaiError::InvalidParameter(format!(
                "gamma must lie in [0, 1], got {}",
                self.gamma
            )));
        }
        if self.max_steps == Some(0) {
            return Err(RlaiError::InvalidParameter(
                "max_steps must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Randomness source for this configuration.
    ///
    /// Seeded configurations reproduce the same draws on every call.
    #[must_use]
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Randomness source for the `episode`-th trajectory.
    ///
    /// Seeded configurations derive a distinct, reproducible stream per episode.
    #[must_use]
    pub fn episode_rng(&self, episode: usize) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(episode as u64)),
            None => StdRng::from_entropy(),
        }
    }
}
