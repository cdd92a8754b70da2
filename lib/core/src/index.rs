use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::BinaryHeap;
use crate::{Error, RecipeId, Result, Vector};

/// One query hit: corpus row and its Euclidean distance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub id: RecipeId,
    pub distance: f32,
}

/// Heap entry ordered by (squared distance, row); the max sits on top so the
/// worst of the current k is evicted first. Equal distances keep the lower row.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Candidate {
    dist: OrderedFloat<f32>,
    idx: usize,
}

/// Exact nearest-neighbor index over composed recipe vectors.
///
/// Read-only after [`NeighborIndex::build`]; reflecting a corpus change means
/// building a new index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NeighborIndex {
    dim: usize,
    len: usize,
    /// Contiguous row-major storage, `len * dim` floats
    vectors: Vec<f32>,
}

impl NeighborIndex {
    /// Take ownership of the composed feature matrix
    pub fn build(rows: Vec<Vector>) -> Result<Self> {
        let dim = rows
            .first()
            .map(Vector::dim)
            .ok_or_else(|| Error::InvalidInput("cannot build an index over zero rows".to_string()))?;
        if dim == 0 {
            return Err(Error::InvalidInput("feature rows are empty".to_string()));
        }

        let len = rows.len();
        let mut vectors = Vec::with_capacity(len * dim);
        for row in rows {
            Error::check_dim(dim, row.dim())?;
            if !row.is_finite() {
                return Err(Error::InvalidInput("feature rows must be finite".to_string()));
            }
            vectors.extend_from_slice(row.as_slice());
        }

        tracing::debug!(rows = len, dim, "built neighbor index");
        Ok(Self { dim, len, vectors })
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stored row for a corpus position
    #[inline]
    #[must_use]
    pub fn row(&self, id: RecipeId) -> Option<&[f32]> {
        if id < self.len {
            Some(&self.vectors[id * self.dim..(id + 1) * self.dim])
        } else {
            None
        }
    }

    /// The `min(k, len)` nearest rows, nearest first.
    ///
    /// Ties on distance resolve to the lower corpus position.
    pub fn query(&self, query: &Vector, k: usize) -> Result<Vec<Neighbor>> {
        if k == 0 {
            return Err(Error::InvalidArgument("k must be a positive integer".to_string()));
        }
        Error::check_dim(self.dim, query.dim())?;
        if !query.is_finite() {
            return Err(Error::InvalidInput("query vector must be finite".to_string()));
        }

        let q = query.as_slice();
        let keep = k.min(self.len);
        let mut heap: BinaryHeap<Candidate> = BinaryHeap::with_capacity(keep + 1);

        for (idx, row) in self.vectors.chunks_exact(self.dim).enumerate() {
            let candidate = Candidate {
                dist: OrderedFloat(crate::simd::l2_squared_simd(q, row)),
                idx,
            };
            if heap.len() < keep {
                heap.push(candidate);
            } else if heap.peek().is_some_and(|worst| candidate < *worst) {
                heap.pop();
                heap.push(candidate);
            }
        }

        Ok(heap
            .into_sorted_vec()
            .into_iter()
            .map(|c| Neighbor {
                id: c.idx,
                distance: c.dist.into_inner().sqrt(),
            })
            .collect())
    }

    /// Internal consistency check for state that came from outside a build
    pub fn validate(&self) -> Result<()> {
        Error::check_dim(self.len * self.dim, self.vectors.len())?;
        if self.len == 0 || self.dim == 0 {
            return Err(Error::InvalidInput("neighbor index is empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_index(n: usize) -> NeighborIndex {
        let rows = (0..n).map(|i| Vector::new(vec![i as f32, 0.0])).collect();
        NeighborIndex::build(rows).unwrap()
    }

    #[test]
    fn test_query_returns_nearest_first() {
        let index = line_index(10);
        let hits = index.query(&Vector::new(vec![4.2, 0.0]), 3).unwrap();
        let ids: Vec<usize> = hits.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![4, 5, 3]);
        assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
        assert!((hits[0].distance - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_k_larger_than_corpus_returns_everything() {
        let index = line_index(4);
        let hits = index.query(&Vector::new(vec![0.0, 0.0]), 10).unwrap();
        assert_eq!(hits.len(), 4);
    }

    #[test]
    fn test_zero_k_is_invalid_argument() {
        let index = line_index(4);
        let err = index.query(&Vector::new(vec![0.0, 0.0]), 0).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_ties_resolve_to_lower_row() {
        let rows = vec![
            Vector::new(vec![1.0, 0.0]),
            Vector::new(vec![0.0, 1.0]),
            Vector::new(vec![-1.0, 0.0]),
            Vector::new(vec![0.0, -1.0]),
        ];
        let index = NeighborIndex::build(rows).unwrap();
        let hits = index.query(&Vector::new(vec![0.0, 0.0]), 2).unwrap();
        assert_eq!(hits.iter().map(|n| n.id).collect::<Vec<_>>(), vec![0, 1]);

        let all = index.query(&Vector::new(vec![0.0, 0.0]), 4).unwrap();
        assert_eq!(all.iter().map(|n| n.id).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_build_validation() {
        assert!(matches!(NeighborIndex::build(Vec::new()), Err(Error::InvalidInput(_))));

        let ragged = vec![Vector::new(vec![1.0, 2.0]), Vector::new(vec![1.0])];
        assert_eq!(
            NeighborIndex::build(ragged).unwrap_err(),
            Error::DimensionMismatch { expected: 2, actual: 1 }
        );

        let index = line_index(3);
        assert_eq!(
            index.query(&Vector::new(vec![1.0]), 1).unwrap_err(),
            Error::DimensionMismatch { expected: 2, actual: 1 }
        );
        assert_eq!(index.row(1), Some(&[1.0f32, 0.0][..]));
        assert_eq!(index.row(3), None);
    }
}
