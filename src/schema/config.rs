//! Configuration types for the weight optimizer.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Top-level optimizer configuration.
///
/// Supplies the fixed database list, the mutation magnitude distribution and
/// the annealing scale used when deciding to repeat a successful mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Distinct database identifiers, sorted ascending.
    pub databases: Vec<String>,
    /// Mean of the Gaussian whose absolute value is the mutation magnitude.
    #[serde(default = "default_mutator_mean")]
    pub mutator_mean: f64,
    /// Standard deviation of the mutation Gaussian.
    #[serde(default = "default_mutator_deviation")]
    pub mutator_deviation: f64,
    /// Scale `s` in P(mutate same parameter) = (e^-(1-Δ) + s) / (1 + s).
    #[serde(default = "default_p_mutate_same_parameter_scale")]
    pub p_mutate_same_parameter_scale: f64,
    /// Ranges used by random initialization.
    #[serde(default)]
    pub init: InitConfig,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            databases: Vec::new(),
            mutator_mean: default_mutator_mean(),
            mutator_deviation: default_mutator_deviation(),
            p_mutate_same_parameter_scale: default_p_mutate_same_parameter_scale(),
            init: InitConfig::default(),
            random_seed: None,
        }
    }
}

fn default_mutator_mean() -> f64 {
    0.25
}
fn default_mutator_deviation() -> f64 {
    0.15
}
fn default_p_mutate_same_parameter_scale() -> f64 {
    0.5
}

/// Inclusive ranges for randomly initialized parameter vectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitConfig {
    /// Token weights are drawn as `k / 10` with `k` in this range.
    #[serde(default = "default_token_tenths")]
    pub token_tenths: (u32, u32),
    /// Per-database description bit-score weight, whole numbers in this range.
    #[serde(default = "default_bit_score_weight")]
    pub bit_score_weight: (u32, u32),
    /// Per-database weight is drawn as `10 * k` with `k` in this range.
    #[serde(default = "default_database_weight_tens")]
    pub database_weight_tens: (u32, u32),
}

impl Default for InitConfig {
    fn default() -> Self {
        Self {
            token_tenths: default_token_tenths(),
            bit_score_weight: default_bit_score_weight(),
            database_weight_tens: default_database_weight_tens(),
        }
    }
}

fn default_token_tenths() -> (u32, u32) {
    (1, 10)
}
fn default_bit_score_weight() -> (u32, u32) {
    (1, 10)
}
fn default_database_weight_tens() -> (u32, u32) {
    (1, 10)
}

impl OptimizerConfig {
    /// Create a configuration for the given databases with default tuning
    /// constants. Identifiers are sorted and deduplicated.
    pub fn new<I, S>(databases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut databases: Vec<String> = databases.into_iter().map(Into::into).collect();
        databases.sort();
        databases.dedup();
        Self {
            databases,
            ..Default::default()
        }
    }

    /// Set the mutator mean and deviation.
    pub fn with_mutator(mut self, mean: f64, deviation: f64) -> Self {
        self.mutator_mean = mean;
        self.mutator_deviation = deviation;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Number of mutable parameter slots: three token weights plus two per database.
    #[inline]
    pub fn slot_count(&self) -> usize {
        3 + 2 * self.databases.len()
    }

    /// Parse a JSON configuration and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file and validate it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.databases.iter().any(|db| db.is_empty()) {
            return Err(ConfigError::EmptyDatabaseName);
        }
        if self.databases.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(ConfigError::UnsortedDatabases);
        }
        if !self.mutator_mean.is_finite() {
            return Err(ConfigError::InvalidMutator(format!(
                "mean {} must be finite",
                self.mutator_mean
            )));
        }
        if !self.mutator_deviation.is_finite() || self.mutator_deviation < 0.0 {
            return Err(ConfigError::InvalidMutator(format!(
                "deviation {} must be finite and non-negative",
                self.mutator_deviation
            )));
        }
        let scale = self.p_mutate_same_parameter_scale;
        if !scale.is_finite() || scale < 0.0 {
            return Err(ConfigError::InvalidScale(scale));
        }

        let check_range = |range: (u32, u32), name: &str| {
            if range.0 > range.1 {
                Err(ConfigError::InvalidInitRange(format!(
                    "{} min ({}) > max ({})",
                    name, range.0, range.1
                )))
            } else {
                Ok(())
            }
        };
        check_range(self.init.token_tenths, "token_tenths")?;
        check_range(self.init.bit_score_weight, "bit_score_weight")?;
        check_range(self.init.database_weight_tens, "database_weight_tens")?;
        if self.init.token_tenths.0 == 0 {
            return Err(ConfigError::InvalidInitRange(
                "token_tenths min must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Database identifiers must be sorted and distinct")]
    UnsortedDatabases,
    #[error("Database identifiers must be non-empty")]
    EmptyDatabaseName,
    #[error("Invalid mutator: {0}")]
    InvalidMutator(String),
    #[error("Mutate-same-parameter scale {0} must be finite and non-negative")]
    InvalidScale(f64),
    #[error("Invalid init range: {0}")]
    InvalidInitRange(String),
}
