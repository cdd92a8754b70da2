use std::sync::Arc;

use parking_lot::RwLock;
use recipex_core::{Error, RecipeRecord, Result};

use crate::bundle::ModelBundle;
use crate::config::EngineConfig;
use crate::engine::{FittedEngine, Recommendation};
use crate::query::RecipeQuery;

/// Entry point for callers that query recommendations.
///
/// Holds the current [`FittedEngine`] behind an `Arc`. The service config is
/// used for [`RecommendationService::fit`]; queries follow the config of
/// whichever engine is live. Queries clone the `Arc` and release the lock
/// before doing any work; a refit builds a new engine without holding the lock
/// and swaps it in at the end.
pub struct RecommendationService {
    config: EngineConfig,
    model: RwLock<Option<Arc<FittedEngine>>>,
}

impl RecommendationService {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            model: RwLock::new(None),
        })
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Fit on `corpus` and make the result live. On error the previous
    /// engine, if any, keeps serving.
    pub fn fit(&self, corpus: Vec<RecipeRecord>) -> Result<Arc<FittedEngine>> {
        let engine = Arc::new(FittedEngine::fit(corpus, &self.config)?);
        self.install_arc(Arc::clone(&engine));
        Ok(engine)
    }

    /// Make a pre-built or reloaded engine live
    pub fn install(&self, engine: FittedEngine) -> Arc<FittedEngine> {
        let engine = Arc::new(engine);
        self.install_arc(Arc::clone(&engine));
        engine
    }

    fn install_arc(&self, engine: Arc<FittedEngine>) {
        let previous = self.model.write().replace(engine);
        if previous.is_some() {
            tracing::info!("replaced live recommendation engine");
        }
    }

    /// The live engine; stays valid even if a refit swaps it out
    pub fn snapshot(&self) -> Result<Arc<FittedEngine>> {
        self.model.read().clone().ok_or(Error::NotFitted)
    }

    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.model.read().is_some()
    }

    pub fn export_bundle(&self) -> Result<ModelBundle> {
        Ok(self.snapshot()?.to_bundle())
    }

    /// Up to `k` recipes nearest to the query; `None` uses the live engine's
    /// `default_k`
    pub fn recommend(&self, query: &RecipeQuery, k: Option<usize>) -> Result<Vec<RecipeRecord>> {
        let engine = self.snapshot()?;
        engine.recommend(query, k.unwrap_or(engine.config().default_k))
    }

    pub fn recommend_scored(
        &self,
        query: &RecipeQuery,
        k: Option<usize>,
    ) -> Result<Vec<Recommendation>> {
        let engine = self.snapshot()?;
        engine.recommend_scored(query, k.unwrap_or(engine.config().default_k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> RecommendationService {
        RecommendationService::new(EngineConfig {
            target_dim: 2,
            default_k: 2,
            ..Default::default()
        })
        .unwrap()
    }

    fn corpus(names: &[&str]) -> Vec<RecipeRecord> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                RecipeRecord::new(*name, format!("{} salt pepper", name))
                    .with_prep_time(10.0 * (i + 1) as f64)
            })
            .collect()
    }

    #[test]
    fn test_not_fitted() {
        let service = service();
        assert!(!service.is_fitted());
        assert_eq!(
            service.recommend(&RecipeQuery::new("egg"), None).unwrap_err(),
            Error::NotFitted
        );
        assert!(matches!(service.export_bundle(), Err(Error::NotFitted)));
    }

    #[test]
    fn test_default_k_applies() {
        let service = service();
        service.fit(corpus(&["soup", "stew", "salad"])).unwrap();
        assert!(service.is_fitted());
        assert_eq!(service.recommend(&RecipeQuery::new("soup"), None).unwrap().len(), 2);
        assert_eq!(service.recommend(&RecipeQuery::new("soup"), Some(3)).unwrap().len(), 3);
        assert!(matches!(
            service.recommend(&RecipeQuery::new("soup"), Some(0)),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_default_k_follows_installed_engine() {
        let service = service();
        let config = EngineConfig {
            target_dim: 2,
            default_k: 3,
            ..Default::default()
        };
        let engine = FittedEngine::fit(corpus(&["soup", "stew", "salad", "pie"]), &config).unwrap();
        service.install(engine);

        let query = RecipeQuery::new("soup");
        assert_eq!(service.recommend(&query, None).unwrap().len(), 3);
        assert_eq!(service.recommend_scored(&query, None).unwrap().len(), 3);
    }

    #[test]
    fn test_refit_swaps_without_disturbing_old_snapshot() {
        let service = service();
        service.fit(corpus(&["soup", "stew", "salad"])).unwrap();
        let old = service.snapshot().unwrap();

        service.fit(corpus(&["bread", "cake", "pie", "tart"])).unwrap();
        assert_eq!(old.len(), 3);
        assert_eq!(service.snapshot().unwrap().len(), 4);
    }

    #[test]
    fn test_failed_refit_keeps_live_engine() {
        let service = service();
        service.fit(corpus(&["soup", "stew", "salad"])).unwrap();
        assert!(service.fit(Vec::new()).is_err());
        assert_eq!(service.snapshot().unwrap().len(), 3);
    }

    #[test]
    fn test_install_reloaded_bundle() {
        let service = service();
        let names = ["soup", "stew", "salad"];
        service.fit(corpus(&names)).unwrap();
        let bytes = service.export_bundle().unwrap().to_bytes().unwrap();

        let other = self::service();
        let bundle = ModelBundle::from_bytes(&bytes).unwrap();
        other.install(FittedEngine::from_bundle(bundle, corpus(&names)).unwrap());

        let query = RecipeQuery::new("stew pepper").with_prep_time(20.0);
        assert_eq!(
            service.recommend_scored(&query, Some(3)).unwrap(),
            other.recommend_scored(&query, Some(3)).unwrap()
        );
    }
}
