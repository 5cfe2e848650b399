//! Configuration types for the evolver.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

fn default_population_size() -> usize {
    30
}
fn default_weight() -> f64 {
    1.0
}
fn default_kill_percent() -> f64 {
    0.1
}

/// Population and operator settings for an [`Evolver`](crate::Evolver).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolverConfig {
    /// Number of individuals kept in every generation.
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    /// Relative share of survivors carried over unchanged (elitism).
    #[serde(default = "default_weight")]
    pub copy_weight: f64,
    /// Relative share of survivors produced by single-field mutation.
    #[serde(default = "default_weight")]
    pub mutate_weight: f64,
    /// Relative share of survivors produced by uniform crossover.
    #[serde(default = "default_weight")]
    pub crossover_weight: f64,
    /// Fraction of the weakest individuals discarded each generation, in `[0, 1)`.
    #[serde(default = "default_kill_percent")]
    pub kill_percent: f64,
    /// Random seed for reproducibility. `None` seeds from entropy.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for EvolverConfig {
    fn default() -> Self {
        Self {
            population_size: default_population_size(),
            copy_weight: default_weight(),
            mutate_weight: default_weight(),
            crossover_weight: default_weight(),
            kill_percent: default_kill_percent(),
            random_seed: None,
        }
    }
}

impl EvolverConfig {
    /// Sum of the three operator weights.
    #[inline]
    pub fn weighted_total(&self) -> f64 {
        self.copy_weight + self.mutate_weight + self.crossover_weight
    }

    /// Number of individuals removed from the tail of each generation.
    #[inline]
    pub fn num_to_kill(&self) -> usize {
        (self.kill_percent * self.population_size as f64).floor() as usize
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::InvalidPopulationSize);
        }
        for (name, value) in [
            ("copy", self.copy_weight),
            ("mutate", self.mutate_weight),
            ("crossover", self.crossover_weight),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }
        if self.weighted_total() <= 0.0 {
            return Err(ConfigError::ZeroWeightSum);
        }
        if !(0.0..1.0).contains(&self.kill_percent) {
            return Err(ConfigError::InvalidKillPercent(self.kill_percent));
        }
        Ok(())
    }

    /// Load and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Population size must be non-zero")]
    InvalidPopulationSize,
    #[error("Operator weight `{name}` must be finite and non-negative, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },
    #[error("Operator weights must sum to a positive value")]
    ZeroWeightSum,
    #[error("Kill percent must be in [0, 1), got {0}")]
    InvalidKillPercent(f64),
    #[error("Schema must name at least one parameter")]
    EmptySchema,
    #[error("Parameter `{0}` appears more than once in the schema")]
    DuplicateParameter(String),
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
