//! Engine configuration
//!
//! Defaults reproduce the reference pipeline: a 2000-term vocabulary reduced
//! to 100 dense dimensions.

use recipex_core::{
    Error, Result, TextFeaturizer, TruncatedSvd, DEFAULT_MAX_FEATURES, DEFAULT_OVERSAMPLES,
    DEFAULT_POWER_ITERATIONS, DEFAULT_SEED, DEFAULT_STD_EPSILON, DEFAULT_TARGET_DIM,
};
use serde::{Deserialize, Serialize};

/// Default number of recommendations per query
pub const DEFAULT_K: usize = 5;

/// Upper bound on SVD power iterations, keeps fitting time bounded
pub const MAX_POWER_ITERATIONS: usize = 32;

/// Settings for fitting a recommendation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Vocabulary cap for TF-IDF
    pub max_features: usize,
    /// Dense text embedding size
    pub target_dim: usize,
    pub svd_oversamples: usize,
    pub svd_power_iterations: usize,
    /// Seed for the randomized SVD and the featured-recipe pick
    pub seed: u64,
    /// Spread below which a numeric field counts as constant
    pub std_epsilon: f64,
    pub default_k: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_features: DEFAULT_MAX_FEATURES,
            target_dim: DEFAULT_TARGET_DIM,
            svd_oversamples: DEFAULT_OVERSAMPLES,
            svd_power_iterations: DEFAULT_POWER_ITERATIONS,
            seed: DEFAULT_SEED,
            std_epsilon: DEFAULT_STD_EPSILON,
            default_k: DEFAULT_K,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON document; missing keys fall back to defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_features == 0 {
            return Err(Error::InvalidConfig("max_features must be at least 1".to_string()));
        }
        if self.target_dim == 0 {
            return Err(Error::InvalidConfig("target_dim must be at least 1".to_string()));
        }
        if self.target_dim > self.max_features {
            return Err(Error::InvalidConfig(format!(
                "target_dim {} exceeds max_features {}",
                self.target_dim, self.max_features
            )));
        }
        if self.svd_power_iterations > MAX_POWER_ITERATIONS {
            return Err(Error::InvalidConfig(format!(
                "svd_power_iterations {} exceeds the limit of {}",
                self.svd_power_iterations, MAX_POWER_ITERATIONS
            )));
        }
        if !(self.std_epsilon.is_finite() && self.std_epsilon > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "std_epsilon must be positive and finite, got {}",
                self.std_epsilon
            )));
        }
        if self.default_k == 0 {
            return Err(Error::InvalidConfig("default_k must be at least 1".to_string()));
        }
        Ok(())
    }

    pub(crate) fn featurizer(&self) -> TextFeaturizer {
        TextFeaturizer::new(self.max_features)
    }

    pub(crate) fn reducer(&self) -> TruncatedSvd {
        TruncatedSvd::new(self.target_dim)
            .with_oversamples(self.svd_oversamples)
            .with_power_iterations(self.svd_power_iterations)
            .with_seed(self.seed)
    }
}
