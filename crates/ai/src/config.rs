//! Pipeline configuration.
//!
//! Read from `STOCKWISE_*` environment variables. Invalid values fall back to
//! the default and are logged; they never abort startup.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::AiError;
use crate::metric::ReorderRule;

pub const RULE_ENV: &str = "STOCKWISE_REORDER_RULE";
pub const EPOCHS_ENV: &str = "STOCKWISE_EPOCHS";
pub const BATCH_SIZE_ENV: &str = "STOCKWISE_BATCH_SIZE";
pub const LEARNING_RATE_ENV: &str = "STOCKWISE_LEARNING_RATE";
pub const SEED_ENV: &str = "STOCKWISE_SEED";

/// Classifier training settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Passes over the dataset.
    pub epochs: usize,
    /// Examples per gradient step.
    pub batch_size: usize,
    /// Adam step size.
    pub learning_rate: f64,
    /// Reshuffle example order before every epoch.
    pub shuffle: bool,
    /// Seed for weight init and shuffling; `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 50,
            batch_size: 32,
            learning_rate: 1e-3,
            shuffle: true,
            seed: Some(42),
        }
    }
}

impl TrainingConfig {
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), AiError> {
        if self.epochs == 0 {
            return Err(AiError::InvalidInput("epochs must be >= 1".to_string()));
        }
        if self.batch_size == 0 {
            return Err(AiError::InvalidInput("batch_size must be >= 1".to_string()));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(AiError::InvalidInput(
                "learning_rate must be a finite positive number".to_string(),
            ));
        }
        Ok(())
    }
}

/// Everything a prediction session needs to know up front.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Authoritative reorder rule for this deployment.
    pub rule: ReorderRule,
    pub training: TrainingConfig,
}

impl PipelineConfig {
    pub fn new(rule: ReorderRule) -> Self {
        Self {
            rule,
            training: TrainingConfig::default(),
        }
    }

    pub fn with_rule(mut self, rule: ReorderRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn with_training(mut self, training: TrainingConfig) -> Self {
        self.training = training;
        self
    }

    /// Load from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key/value source (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = TrainingConfig::default();

        let rule = parse_or(&lookup, RULE_ENV, ReorderRule::default());
        let epochs = parse_or(&lookup, EPOCHS_ENV, defaults.epochs);
        let batch_size = parse_or(&lookup, BATCH_SIZE_ENV, defaults.batch_size);
        let learning_rate = parse_or(&lookup, LEARNING_RATE_ENV, defaults.learning_rate);

        let seed = match lookup(SEED_ENV) {
            None => defaults.seed,
            Some(raw) if raw.trim().eq_ignore_ascii_case("none") => None,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(seed) => Some(seed),
                Err(_) => {
                    warn!(key = SEED_ENV, value = %raw, "invalid seed; using default");
                    defaults.seed
                }
            },
        };

        let training = TrainingConfig {
            epochs,
            batch_size,
            learning_rate,
            shuffle: defaults.shuffle,
            seed,
        };

        if let Err(e) = training.validate() {
            warn!(error = %e, "training settings from environment rejected; using defaults");
            return Self::new(rule);
        }

        Self { rule, training }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                warn!(key, value = %raw, "invalid configuration value; using default");
                default
            }
        },
    }
}
