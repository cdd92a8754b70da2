//! # recipex
//!
//! Recipe recommendations from time, nutrition and ingredients.
//!
//! Each recipe becomes one feature row: eight standardized numeric fields
//! (prep time, calories, fat, carbohydrates, protein, cholesterol, sodium,
//! fiber) followed by a dense embedding of its ingredient list (TF-IDF reduced
//! by truncated SVD). A query goes through the same fitted stages and is
//! matched by exact Euclidean k-nearest-neighbor search.
//!
//! ## Quick Start
//!
//! ### Command line
//!
//! ```bash
//! recipex --corpus recipes.json recommend --prep-time 20 --calories 400 \
//!     --ingredients "chicken, garlic, lemon" -k 5
//! recipex --corpus recipes.json featured --day 19650
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use recipex::prelude::*;
//!
//! let corpus = vec![
//!     RecipeRecord::new("Omelette", "egg milk butter").with_prep_time(10.0).with_calories(250.0),
//!     RecipeRecord::new("Pancakes", "egg milk flour").with_prep_time(20.0).with_calories(350.0),
//!     RecipeRecord::new("Stew", "beef wine carrot").with_prep_time(120.0).with_calories(700.0),
//! ];
//! let config = EngineConfig { target_dim: 2, ..Default::default() };
//! let service = RecommendationService::new(config).unwrap();
//! service.fit(corpus).unwrap();
//!
//! let query = RecipeQuery::new("egg milk").with_prep_time(15.0);
//! let picks = service.recommend(&query, Some(2)).unwrap();
//! assert_eq!(picks.len(), 2);
//! ```
//!
//! ## Crate Structure
//!
//! - [`recipex-core`](https://docs.rs/recipex-core) - Fitted transformers, vectors and the neighbor index
//! - [`recipex-engine`](https://docs.rs/recipex-engine) - Engine snapshots, model bundles and the service

pub mod corpus;

// Re-export core types
pub use recipex_core::{
    Error, Result,
    Vector, SparseVector,
    RecipeId, RecipeRecord, NUMERIC_FIELDS, NUMERIC_FIELD_COUNT,
    TextFeaturizer, FittedFeaturizer,
    TruncatedSvd, FittedReducer,
    NumericNormalizer, FittedNormalizer,
    FeatureComposer, NeighborIndex, Neighbor,
};

// Re-export engine
pub use recipex_engine::{
    EngineConfig, FittedEngine, ModelBundle, RecipeQuery, Recommendation,
    RecommendationService,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Error, Result,
        RecipeRecord, RecipeQuery, Recommendation,
        EngineConfig, FittedEngine, ModelBundle, RecommendationService,
    };
}
