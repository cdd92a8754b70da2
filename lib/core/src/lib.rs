//! # recipex Core
//!
//! Core library for the recipex recipe recommender.
//!
//! This crate provides the fitted transformers and the retrieval index:
//!
//! - [`TextFeaturizer`] - TF-IDF weighting of ingredient lists
//! - [`TruncatedSvd`] - Dense embedding of TF-IDF rows
//! - [`NumericNormalizer`] - Per-field standardization of time and nutrition
//! - [`FeatureComposer`] - `[numeric..., embedding...]` row layout
//! - [`NeighborIndex`] - Exact Euclidean k-nearest-neighbor search
//!
//! Every transformer follows the same two-phase shape: a settings value whose
//! `fit` returns a frozen `Fitted*` artifact, and a `transform` on that artifact
//! that never mutates it.
//!
//! ## Example
//!
//! ```rust
//! use recipex_core::{FeatureComposer, NeighborIndex, NumericNormalizer, TextFeaturizer, TruncatedSvd};
//!
//! let texts = ["egg milk", "egg milk", "beef wine"];
//! let numerics = [[10.0, 100.0], [10.0, 105.0], [90.0, 900.0]];
//!
//! let featurizer = TextFeaturizer::default().fit(&texts).unwrap();
//! let tfidf = featurizer.transform_batch(&texts);
//! let reducer = TruncatedSvd::new(2).fit(&tfidf, featurizer.vocabulary_size()).unwrap();
//! let normalizer = NumericNormalizer::default().fit(&numerics).unwrap();
//! let composer = FeatureComposer::new(2, reducer.output_dim());
//!
//! let rows = numerics
//!     .iter()
//!     .zip(&tfidf)
//!     .map(|(n, t)| {
//!         composer.compose(&normalizer.transform(n).unwrap(), &reducer.transform(t).unwrap())
//!     })
//!     .collect::<Result<Vec<_>, _>>()
//!     .unwrap();
//! let index = NeighborIndex::build(rows).unwrap();
//!
//! let query = composer
//!     .compose(
//!         &normalizer.transform(&[10.0, 100.0]).unwrap(),
//!         &reducer.transform(&featurizer.transform("egg milk")).unwrap(),
//!     )
//!     .unwrap();
//! let hits = index.query(&query, 2).unwrap();
//! assert_eq!(hits[0].id, 0);
//! assert_eq!(hits[1].id, 1);
//! ```

pub mod error;
pub mod vector;
pub mod sparse;
pub mod recipe;
pub mod featurizer;
pub mod reducer;
pub mod normalizer;
pub mod composer;
pub mod index;

/// SIMD-optimized squared Euclidean distance
///
/// Dispatch targets:
/// - AVX2/FMA on x86_64
/// - NEON on ARM64/Apple Silicon
pub mod simd;

pub use error::{Error, Result};
pub use vector::Vector;
pub use sparse::SparseVector;
pub use recipe::{RecipeId, RecipeRecord, NUMERIC_FIELDS, NUMERIC_FIELD_COUNT};
pub use featurizer::{FittedFeaturizer, TextFeaturizer, DEFAULT_MAX_FEATURES};
pub use reducer::{
    FittedReducer, TruncatedSvd, DEFAULT_OVERSAMPLES, DEFAULT_POWER_ITERATIONS, DEFAULT_SEED,
    DEFAULT_TARGET_DIM,
};
pub use normalizer::{FittedNormalizer, NumericNormalizer, DEFAULT_STD_EPSILON};
pub use composer::FeatureComposer;
pub use index::{Neighbor, NeighborIndex};
