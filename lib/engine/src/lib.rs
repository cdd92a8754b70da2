//! # recipex Engine
//!
//! Fitting lifecycle and query surface for the recipe recommender.
//!
//! [`FittedEngine`] wires the core stages together over one corpus snapshot.
//! [`RecommendationService`] owns the live engine and swaps it atomically on
//! refit. [`ModelBundle`] is the fitted state in a form an external cache can
//! persist.

pub mod bundle;
pub mod config;
pub mod engine;
pub mod query;
pub mod service;

pub use bundle::{ModelBundle, BUNDLE_FORMAT_VERSION};
pub use config::{EngineConfig, DEFAULT_K, MAX_POWER_ITERATIONS};
pub use engine::{FittedEngine, Recommendation};
pub use query::RecipeQuery;
pub use service::RecommendationService;
