use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use recipex_core::{
    Error, FeatureComposer, FittedFeaturizer, FittedNormalizer, FittedReducer, NeighborIndex,
    NumericNormalizer, RecipeId, RecipeRecord, Result, Vector, NUMERIC_FIELD_COUNT,
};
use serde::Serialize;

use crate::bundle::ModelBundle;
use crate::config::EngineConfig;
use crate::query::RecipeQuery;

/// A recommendation with its position in the corpus and distance to the query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub id: RecipeId,
    pub distance: f32,
    pub record: RecipeRecord,
}

/// Immutable fitted snapshot: every transformer, the composed index and the
/// corpus they were derived from.
///
/// Built once by [`FittedEngine::fit`] or restored from a [`ModelBundle`];
/// nothing mutates it afterwards, so it can be shared freely between readers.
#[derive(Debug, Clone)]
pub struct FittedEngine {
    config: EngineConfig,
    featurizer: FittedFeaturizer,
    reducer: FittedReducer,
    normalizer: FittedNormalizer,
    composer: FeatureComposer,
    index: NeighborIndex,
    corpus: Vec<RecipeRecord>,
}

impl FittedEngine {
    /// Fit every stage over `corpus`. All-or-nothing: any failure returns
    /// before a partially fitted engine exists.
    pub fn fit(corpus: Vec<RecipeRecord>, config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        if corpus.is_empty() {
            return Err(Error::InvalidInput("corpus is empty".to_string()));
        }
        for (id, record) in corpus.iter().enumerate() {
            record.validate().map_err(|e| match e {
                Error::InvalidInput(msg) => Error::InvalidInput(format!("recipe {}: {}", id, msg)),
                other => other,
            })?;
        }

        let start = Instant::now();
        tracing::info!(
            recipes = corpus.len(),
            max_features = config.max_features,
            target_dim = config.target_dim,
            "fitting recommendation engine"
        );

        let texts: Vec<&str> = corpus.iter().map(|r| r.ingredients.as_str()).collect();
        let featurizer = config.featurizer().fit(&texts)?;
        let tfidf = featurizer.transform_batch(&texts);
        let reducer = config.reducer().fit(&tfidf, featurizer.vocabulary_size())?;
        tracing::debug!(
            vocabulary = featurizer.vocabulary_size(),
            output_dim = reducer.output_dim(),
            "text stages fitted"
        );

        let numerics: Vec<[f64; NUMERIC_FIELD_COUNT]> =
            corpus.iter().map(RecipeRecord::numeric_features).collect();
        let normalizer = NumericNormalizer::default()
            .with_epsilon(config.std_epsilon)
            .fit(&numerics)?;
        let composer = FeatureComposer::new(NUMERIC_FIELD_COUNT, reducer.output_dim());

        let rows = numerics
            .iter()
            .zip(&tfidf)
            .map(|(numeric, text)| {
                composer.compose(&normalizer.transform(numeric)?, &reducer.transform(text)?)
            })
            .collect::<Result<Vec<_>>>()?;
        let index = NeighborIndex::build(rows)?;

        tracing::info!(
            recipes = index.len(),
            vocabulary = featurizer.vocabulary_size(),
            dim = composer.dim(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "recommendation engine fitted"
        );

        Ok(Self {
            config: config.clone(),
            featurizer,
            reducer,
            normalizer,
            composer,
            index,
            corpus,
        })
    }

    /// Restore an engine from persisted state plus the corpus it was fitted on
    pub fn from_bundle(bundle: ModelBundle, corpus: Vec<RecipeRecord>) -> Result<Self> {
        bundle.validate()?;
        if corpus.len() != bundle.index.len() {
            return Err(Error::InvalidInput(format!(
                "bundle was fitted on {} recipes but the corpus has {}",
                bundle.index.len(),
                corpus.len()
            )));
        }

        let composer = FeatureComposer::new(NUMERIC_FIELD_COUNT, bundle.reducer.output_dim());
        tracing::debug!(recipes = corpus.len(), dim = composer.dim(), "restored engine from bundle");
        Ok(Self {
            config: bundle.config,
            featurizer: bundle.featurizer,
            reducer: bundle.reducer,
            normalizer: bundle.normalizer,
            composer,
            index: bundle.index,
            corpus,
        })
    }

    /// Copy out the fitted state; the corpus itself is not part of the bundle
    #[must_use]
    pub fn to_bundle(&self) -> ModelBundle {
        ModelBundle::new(
            self.config.clone(),
            self.featurizer.clone(),
            self.reducer.clone(),
            self.normalizer.clone(),
            self.index.clone(),
        )
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn normalizer(&self) -> &FittedNormalizer {
        &self.normalizer
    }

    #[inline]
    #[must_use]
    pub fn corpus(&self) -> &[RecipeRecord] {
        &self.corpus
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.corpus.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.corpus.is_empty()
    }

    /// Run a query through the fitted stages into index space
    pub fn query_vector(&self, query: &RecipeQuery) -> Result<Vector> {
        query.validate()?;
        let numeric = self.normalizer.transform(&query.numeric_features())?;
        let tfidf = self.featurizer.transform(&query.ingredients);
        let embedding = self.reducer.transform(&tfidf)?;
        self.composer.compose(&numeric, &embedding)
    }

    /// Nearest recipes with ids and distances, nearest first
    pub fn recommend_scored(&self, query: &RecipeQuery, k: usize) -> Result<Vec<Recommendation>> {
        let vector = self.query_vector(query)?;
        let hits = self.index.query(&vector, k)?;
        tracing::debug!(k, returned = hits.len(), "recommendation query");

        hits.into_iter()
            .map(|hit| {
                let record = self.corpus.get(hit.id).cloned().ok_or_else(|| {
                    Error::InvalidInput(format!("index row {} has no corpus entry", hit.id))
                })?;
                Ok(Recommendation {
                    id: hit.id,
                    distance: hit.distance,
                    record,
                })
            })
            .collect()
    }

    /// Nearest recipes, nearest first
    pub fn recommend(&self, query: &RecipeQuery, k: usize) -> Result<Vec<RecipeRecord>> {
        Ok(self
            .recommend_scored(query, k)?
            .into_iter()
            .map(|r| r.record)
            .collect())
    }

    /// Recipe of the day. Stable for a given seed and day.
    #[must_use]
    pub fn featured(&self, day: u64) -> (RecipeId, &RecipeRecord) {
        let mut rng = StdRng::seed_from_u64(self.config.seed ^ day);
        let id = rng.random_range(0..self.corpus.len());
        (id, &self.corpus[id])
    }
}
