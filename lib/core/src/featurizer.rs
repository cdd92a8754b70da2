//! TF-IDF featurization of ingredient lists.
//!
//! [`TextFeaturizer`] holds the fit-time settings; [`TextFeaturizer::fit`]
//! produces a frozen [`FittedFeaturizer`] whose vocabulary and IDF weights never
//! change afterwards. Unknown terms at query time simply contribute nothing.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use crate::{Error, Result, SparseVector};

/// Vocabulary cap used when none is configured
pub const DEFAULT_MAX_FEATURES: usize = 2000;

/// Fit-time settings for TF-IDF featurization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextFeaturizer {
    max_features: usize,
    normalize: bool,
}

impl Default for TextFeaturizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FEATURES)
    }
}

impl TextFeaturizer {
    #[inline]
    #[must_use]
    pub fn new(max_features: usize) -> Self {
        Self {
            max_features,
            normalize: true,
        }
    }

    /// Toggle L2 normalization of every transformed row (on by default)
    #[inline]
    #[must_use]
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    #[inline]
    #[must_use]
    pub fn max_features(&self) -> usize {
        self.max_features
    }

    /// Tokenize text for featurization.
    /// Lower-cases, splits on anything that is not alphanumeric and drops
    /// single-character tokens. Fit and transform share this exact function.
    #[inline]
    pub fn tokenize(text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|s| s.chars().count() > 1)
            .map(str::to_string)
            .collect()
    }

    /// Learn vocabulary and IDF weights from the corpus.
    ///
    /// Terms are ranked by document frequency (descending, ties in lexical
    /// order) and the top `max_features` are kept.
    pub fn fit<S: AsRef<str>>(&self, corpus: &[S]) -> Result<FittedFeaturizer> {
        if self.max_features == 0 {
            return Err(Error::InvalidConfig("max_features must be at least 1".to_string()));
        }
        if corpus.is_empty() {
            return Err(Error::InvalidInput("cannot fit featurizer on an empty corpus".to_string()));
        }

        // term -> number of documents containing it
        let mut doc_freq: AHashMap<String, usize> = AHashMap::new();
        for doc in corpus {
            let unique: AHashSet<String> = Self::tokenize(doc.as_ref()).into_iter().collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        if doc_freq.is_empty() {
            return Err(Error::InvalidInput(
                "corpus contains no usable terms".to_string(),
            ));
        }

        let mut ranked: Vec<(String, usize)> = doc_freq.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(self.max_features);
        // Index order is lexical so lookups can binary search
        ranked.sort_by(|a, b| a.0.cmp(&b.0));

        let n_docs = corpus.len() as f64;
        let (terms, idf): (Vec<String>, Vec<f64>) = ranked
            .into_iter()
            .map(|(term, df)| {
                let weight = ((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0;
                (term, weight)
            })
            .unzip();

        tracing::debug!(
            documents = corpus.len(),
            vocabulary = terms.len(),
            "fitted text featurizer"
        );

        Ok(FittedFeaturizer {
            terms,
            idf,
            normalize: self.normalize,
        })
    }
}

/// Frozen vocabulary and IDF weights
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FittedFeaturizer {
    /// Vocabulary in lexical order; a term's position is its feature index
    terms: Vec<String>,
    idf: Vec<f64>,
    normalize: bool,
}

impl FittedFeaturizer {
    #[inline]
    #[must_use]
    pub fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    #[inline]
    #[must_use]
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.terms
            .binary_search_by(|entry| entry.as_str().cmp(term))
            .ok()
    }

    #[inline]
    #[must_use]
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.index_of(term).map(|idx| self.idf[idx])
    }

    /// TF-IDF weights for one document.
    /// Out-of-vocabulary tokens are ignored; text with no known terms maps to
    /// the zero vector.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for token in TextFeaturizer::tokenize(text) {
            if let Some(idx) = self.index_of(&token) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let (indices, values): (Vec<usize>, Vec<f64>) = counts
            .into_iter()
            .map(|(idx, tf)| (idx, tf * self.idf[idx]))
            .unzip();

        let mut vector = SparseVector::from_sorted_parts(self.terms.len(), indices, values);
        if self.normalize {
            vector.normalize();
        }
        vector
    }

    pub fn transform_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<SparseVector> {
        texts.iter().map(|t| self.transform(t.as_ref())).collect()
    }

    /// Internal consistency check for state that came from outside a fit
    pub fn validate(&self) -> Result<()> {
        Error::check_dim(self.terms.len(), self.idf.len())?;
        if self.terms.is_empty() {
            return Err(Error::InvalidInput("featurizer vocabulary is empty".to_string()));
        }
        if !self.terms.windows(2).all(|w| w[0] < w[1]) {
            return Err(Error::InvalidInput("featurizer vocabulary is not sorted".to_string()));
        }
        Ok(())
    }
}
