//! Serializable fitted state
//!
//! A bundle carries every fitted stage but not the corpus; the caching layer
//! that persists it is expected to reload the same corpus alongside.

use recipex_core::{
    Error, FittedFeaturizer, FittedNormalizer, FittedReducer, NeighborIndex, Result,
    NUMERIC_FIELD_COUNT,
};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;

/// Bumped whenever the encoded layout changes
pub const BUNDLE_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelBundle {
    pub format_version: u32,
    pub config: EngineConfig,
    pub featurizer: FittedFeaturizer,
    pub reducer: FittedReducer,
    pub normalizer: FittedNormalizer,
    pub index: NeighborIndex,
}

impl ModelBundle {
    #[must_use]
    pub fn new(
        config: EngineConfig,
        featurizer: FittedFeaturizer,
        reducer: FittedReducer,
        normalizer: FittedNormalizer,
        index: NeighborIndex,
    ) -> Self {
        Self {
            format_version: BUNDLE_FORMAT_VERSION,
            config,
            featurizer,
            reducer,
            normalizer,
            index,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Decode and check that the stages fit together
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bundle: Self =
            bincode::deserialize(bytes).map_err(|e| Error::Serialization(e.to_string()))?;
        bundle.validate()?;
        Ok(bundle)
    }

    pub fn validate(&self) -> Result<()> {
        if self.format_version != BUNDLE_FORMAT_VERSION {
            return Err(Error::Serialization(format!(
                "unsupported bundle format version {} (expected {})",
                self.format_version, BUNDLE_FORMAT_VERSION
            )));
        }
        self.config.validate()?;
        self.featurizer.validate()?;
        self.reducer.validate()?;
        self.normalizer.validate()?;
        self.index.validate()?;

        Error::check_dim(self.featurizer.vocabulary_size(), self.reducer.input_dim())?;
        Error::check_dim(self.config.target_dim, self.reducer.output_dim())?;
        if self.featurizer.vocabulary_size() > self.config.max_features {
            return Err(Error::InvalidConfig(format!(
                "bundle vocabulary of {} terms exceeds max_features {}",
                self.featurizer.vocabulary_size(),
                self.config.max_features
            )));
        }
        Error::check_dim(NUMERIC_FIELD_COUNT, self.normalizer.field_count())?;
        Error::check_dim(NUMERIC_FIELD_COUNT + self.reducer.output_dim(), self.index.dim())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FittedEngine;
    use recipex_core::RecipeRecord;

    fn fitted_bundle() -> ModelBundle {
        let corpus = vec![
            RecipeRecord::new("a", "rice beans corn").with_prep_time(20.0),
            RecipeRecord::new("b", "rice chicken").with_prep_time(35.0),
            RecipeRecord::new("c", "beans chili corn").with_prep_time(50.0),
        ];
        let config = EngineConfig {
            target_dim: 2,
            ..Default::default()
        };
        FittedEngine::fit(corpus, &config).unwrap().to_bundle()
    }

    #[test]
    fn test_bytes_round_trip() {
        let bundle = fitted_bundle();
        let bytes = bundle.to_bytes().unwrap();
        assert_eq!(ModelBundle::from_bytes(&bytes).unwrap(), bundle);
    }

    #[test]
    fn test_rejects_unknown_version() {
        let mut bundle = fitted_bundle();
        bundle.format_version = 99;
        let bytes = bundle.to_bytes().unwrap();
        assert!(matches!(ModelBundle::from_bytes(&bytes), Err(Error::Serialization(_))));
    }

    #[test]
    fn test_rejects_config_disagreeing_with_stages() {
        let mut bundle = fitted_bundle();
        bundle.config.target_dim = 3;
        assert_eq!(
            bundle.validate().unwrap_err(),
            Error::DimensionMismatch { expected: 3, actual: 2 }
        );

        let mut bundle = fitted_bundle();
        bundle.config.max_features = 2;
        let bytes = bundle.to_bytes().unwrap();
        assert!(matches!(ModelBundle::from_bytes(&bytes), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            ModelBundle::from_bytes(&[1, 2, 3]),
            Err(Error::Serialization(_))
        ));
    }
}
