//! Truncated SVD over sparse TF-IDF rows.
//!
//! Fitting runs a seeded randomized range finder (Halko et al.) with a few
//! power iterations, re-orthonormalized by QR, then solves the small projected
//! problem exactly with a symmetric eigen-decomposition. The result is a frozen
//! basis of right singular vectors; `transform` is a plain linear projection
//! onto it.

use nalgebra::{DMatrix, SymmetricEigen};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use crate::{Error, Result, SparseVector};

pub const DEFAULT_TARGET_DIM: usize = 100;
pub const DEFAULT_OVERSAMPLES: usize = 10;
pub const DEFAULT_POWER_ITERATIONS: usize = 5;
pub const DEFAULT_SEED: u64 = 42;

/// Singular values below this fraction of the largest are treated as zero
const SINGULAR_CUTOFF: f64 = 1e-7;

/// Fit-time settings for truncated SVD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncatedSvd {
    target_dim: usize,
    oversamples: usize,
    power_iterations: usize,
    seed: u64,
}

impl Default for TruncatedSvd {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_DIM)
    }
}

impl TruncatedSvd {
    #[inline]
    #[must_use]
    pub fn new(target_dim: usize) -> Self {
        Self {
            target_dim,
            oversamples: DEFAULT_OVERSAMPLES,
            power_iterations: DEFAULT_POWER_ITERATIONS,
            seed: DEFAULT_SEED,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_oversamples(mut self, oversamples: usize) -> Self {
        self.oversamples = oversamples;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_power_iterations(mut self, power_iterations: usize) -> Self {
        self.power_iterations = power_iterations;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[inline]
    #[must_use]
    pub fn target_dim(&self) -> usize {
        self.target_dim
    }

    /// Learn a `target_dim`-component basis from the rows.
    ///
    /// Every row must share `input_dim`, and `target_dim` may not exceed it.
    pub fn fit(&self, rows: &[SparseVector], input_dim: usize) -> Result<FittedReducer> {
        if self.target_dim == 0 {
            return Err(Error::InvalidConfig("target dimension must be at least 1".to_string()));
        }
        if self.target_dim > input_dim {
            return Err(Error::InvalidConfig(format!(
                "target dimension {} exceeds vocabulary size {}",
                self.target_dim, input_dim
            )));
        }
        if rows.is_empty() {
            return Err(Error::InvalidInput("cannot fit reducer on an empty matrix".to_string()));
        }
        for row in rows {
            Error::check_dim(input_dim, row.dim())?;
        }

        let n_rows = rows.len();
        let sketch = (self.target_dim + self.oversamples).min(input_dim);
        let mut rng = StdRng::seed_from_u64(self.seed);

        // Omega: input_dim x sketch test matrix
        let omega_data: Vec<f64> = (0..input_dim * sketch)
            .map(|_| rng.random_range(-1.0..1.0))
            .collect();
        let omega = DMatrix::from_row_slice(input_dim, sketch, &omega_data);

        // Q spans the range of A * Omega, refined by power iterations
        let mut q = multiply(rows, &omega).qr().q();
        for _ in 0..self.power_iterations {
            let z = multiply_transpose(rows, &q, input_dim).qr().q();
            q = multiply(rows, &z).qr().q();
        }

        // B^T = A^T Q (input_dim x s); the small problem is B B^T
        let bt = multiply_transpose(rows, &q, input_dim);
        let gram = bt.tr_mul(&bt);
        let eigen = SymmetricEigen::new(gram);

        let mut order: Vec<usize> = (0..eigen.eigenvalues.len()).collect();
        order.sort_by(|&x, &y| {
            eigen.eigenvalues[y]
                .partial_cmp(&eigen.eigenvalues[x])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(x.cmp(&y))
        });
        let sigma = |e: usize| eigen.eigenvalues[e].max(0.0).sqrt();
        let cutoff = order.first().map_or(0.0, |&e| sigma(e)) * SINGULAR_CUTOFF;

        let mut components = vec![0.0; self.target_dim * input_dim];
        let mut singular_values = Vec::with_capacity(self.target_dim);
        let mut rank_deficient = 0usize;

        for (c, component) in components.chunks_exact_mut(input_dim).enumerate() {
            let e = match order.get(c) {
                Some(&e) if sigma(e) > cutoff && sigma(e) > 0.0 => e,
                _ => {
                    singular_values.push(0.0);
                    rank_deficient += 1;
                    continue;
                }
            };
            // v = B^T w / sigma
            let s = sigma(e);
            let v = &bt * eigen.eigenvectors.column(e) / s;
            component.copy_from_slice(v.as_slice());
            flip_sign(component);
            singular_values.push(s);
        }

        if rank_deficient > 0 {
            tracing::warn!(
                zero_components = rank_deficient,
                target_dim = self.target_dim,
                "corpus rank is below the target dimension; trailing components are zero"
            );
        }
        tracing::debug!(
            rows = n_rows,
            input_dim,
            target_dim = self.target_dim,
            "fitted truncated svd"
        );

        Ok(FittedReducer {
            input_dim,
            output_dim: self.target_dim,
            components,
            singular_values,
        })
    }
}

/// Frozen projection basis
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FittedReducer {
    input_dim: usize,
    output_dim: usize,
    /// `output_dim` rows of `input_dim` loadings, row-major
    components: Vec<f64>,
    singular_values: Vec<f64>,
}

impl FittedReducer {
    #[inline]
    #[must_use]
    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    #[inline]
    #[must_use]
    pub fn output_dim(&self) -> usize {
        self.output_dim
    }

    /// Singular values, largest first
    #[inline]
    #[must_use]
    pub fn singular_values(&self) -> &[f64] {
        &self.singular_values
    }

    /// Loadings of one component, `None` past `output_dim`
    #[inline]
    #[must_use]
    pub fn component(&self, c: usize) -> Option<&[f64]> {
        if c < self.output_dim {
            Some(&self.components[c * self.input_dim..(c + 1) * self.input_dim])
        } else {
            None
        }
    }

    /// Project a sparse row onto the basis
    pub fn transform(&self, x: &SparseVector) -> Result<Vec<f64>> {
        Error::check_dim(self.input_dim, x.dim())?;
        let mut out = vec![0.0; self.output_dim];
        for (j, value) in x.iter() {
            for (c, slot) in out.iter_mut().enumerate() {
                *slot += value * self.components[c * self.input_dim + j];
            }
        }
        Ok(out)
    }

    /// Internal consistency check for state that came from outside a fit
    pub fn validate(&self) -> Result<()> {
        Error::check_dim(self.input_dim * self.output_dim, self.components.len())?;
        Error::check_dim(self.output_dim, self.singular_values.len())?;
        if self.output_dim == 0 || self.output_dim > self.input_dim {
            return Err(Error::InvalidConfig(format!(
                "reducer output dimension {} is out of range for input dimension {}",
                self.output_dim, self.input_dim
            )));
        }
        Ok(())
    }
}

/// A * M for a dense `input_dim x m` matrix; returns `n_rows x m`
fn multiply(rows: &[SparseVector], m: &DMatrix<f64>) -> DMatrix<f64> {
    let mut out = DMatrix::zeros(rows.len(), m.ncols());
    for (i, row) in rows.iter().enumerate() {
        for (j, a_ij) in row.iter() {
            for c in 0..m.ncols() {
                out[(i, c)] += a_ij * m[(j, c)];
            }
        }
    }
    out
}

/// A^T * M for a dense `n_rows x m` matrix; returns `input_dim x m`
fn multiply_transpose(rows: &[SparseVector], m: &DMatrix<f64>, input_dim: usize) -> DMatrix<f64> {
    let mut out = DMatrix::zeros(input_dim, m.ncols());
    for (i, row) in rows.iter().enumerate() {
        for (j, a_ij) in row.iter() {
            for c in 0..m.ncols() {
                out[(j, c)] += a_ij * m[(i, c)];
            }
        }
    }
    out
}

/// Make the largest-magnitude loading positive
fn flip_sign(component: &mut [f64]) {
    let mut pivot = 0.0f64;
    for &x in component.iter() {
        if x.abs() > pivot.abs() {
            pivot = x;
        }
    }
    if pivot < 0.0 {
        component.iter_mut().for_each(|x| *x = -*x);
    }
}
