use serde::{Deserialize, Serialize};
use crate::{Error, Result};

/// Default floor under which a field's spread counts as zero
pub const DEFAULT_STD_EPSILON: f64 = 1e-12;

/// Fit-time settings for per-field standardization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericNormalizer {
    epsilon: f64,
}

impl Default for NumericNormalizer {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_STD_EPSILON,
        }
    }
}

impl NumericNormalizer {
    #[inline]
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Compute per-field mean and population standard deviation.
    ///
    /// Every row must have the same number of fields as the first.
    pub fn fit<R: AsRef<[f64]>>(&self, rows: &[R]) -> Result<FittedNormalizer> {
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "standardization epsilon must be positive and finite, got {}",
                self.epsilon
            )));
        }
        let first = rows
            .first()
            .ok_or_else(|| Error::InvalidInput("cannot fit normalizer on zero rows".to_string()))?;
        let fields = first.as_ref().len();
        if fields == 0 {
            return Err(Error::InvalidInput("numeric rows have no fields".to_string()));
        }

        let n = rows.len() as f64;
        let mut mean = vec![0.0; fields];
        for row in rows {
            let row = row.as_ref();
            Error::check_dim(fields, row.len())?;
            for (m, &x) in mean.iter_mut().zip(row) {
                *m += x;
            }
        }
        mean.iter_mut().for_each(|m| *m /= n);

        let mut variance = vec![0.0; fields];
        for row in rows {
            for ((v, &x), &m) in variance.iter_mut().zip(row.as_ref()).zip(&mean) {
                let d = x - m;
                *v += d * d;
            }
        }

        // Zero-spread fields keep a unit scale so they reduce to centering
        let scale: Vec<f64> = variance
            .into_iter()
            .map(|v| {
                let std = (v / n).sqrt();
                if std < self.epsilon { 1.0 } else { std }
            })
            .collect();

        Ok(FittedNormalizer { mean, scale })
    }
}

/// Frozen per-field mean and scale
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FittedNormalizer {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl FittedNormalizer {
    #[inline]
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.mean.len()
    }

    #[inline]
    #[must_use]
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Divisor per field: the standard deviation, or 1.0 for constant fields
    #[inline]
    #[must_use]
    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    /// `(x - mean) / scale` per field
    pub fn transform(&self, values: &[f64]) -> Result<Vec<f64>> {
        Error::check_dim(self.mean.len(), values.len())?;
        Ok(values
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(&x, (&m, &s))| (x - m) / s)
            .collect())
    }

    /// Internal consistency check for state that came from outside a fit
    pub fn validate(&self) -> Result<()> {
        Error::check_dim(self.mean.len(), self.scale.len())?;
        if self.scale.iter().any(|&s| !(s.is_finite() && s > 0.0)) {
            return Err(Error::InvalidInput("normalizer scale must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standardized_columns_have_zero_mean_unit_std() {
        let rows = vec![
            vec![10.0, 100.0, 5.0],
            vec![20.0, 300.0, 5.0],
            vec![30.0, 200.0, 5.0],
            vec![60.0, 900.0, 5.0],
        ];
        let fitted = NumericNormalizer::default().fit(&rows).unwrap();
        let transformed: Vec<Vec<f64>> = rows.iter().map(|r| fitted.transform(r).unwrap()).collect();

        for field in 0..2 {
            let column: Vec<f64> = transformed.iter().map(|r| r[field]).collect();
            let mean = column.iter().sum::<f64>() / 4.0;
            let var = column.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / 4.0;
            assert!(mean.abs() < 1e-12);
            assert!((var.sqrt() - 1.0).abs() < 1e-12);
        }

        // Constant field maps to zero
        assert!(transformed.iter().all(|r| r[2] == 0.0));
        assert_eq!(fitted.scale()[2], 1.0);
    }

    #[test]
    fn test_constant_field_does_not_blow_up_on_new_values() {
        let fitted = NumericNormalizer::default().fit(&[[1.0], [1.0]]).unwrap();
        assert_eq!(fitted.transform(&[4.0]).unwrap(), vec![3.0]);
    }

    #[test]
    fn test_dimension_mismatch() {
        let fitted = NumericNormalizer::default().fit(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
        let err = fitted.transform(&[1.0]).unwrap_err();
        assert_eq!(err, Error::DimensionMismatch { expected: 2, actual: 1 });
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        let err = NumericNormalizer::default().fit(&rows).unwrap_err();
        assert_eq!(err, Error::DimensionMismatch { expected: 2, actual: 1 });
    }

    #[test]
    fn test_empty_and_bad_epsilon() {
        let rows: Vec<Vec<f64>> = Vec::new();
        assert!(matches!(
            NumericNormalizer::default().fit(&rows),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            NumericNormalizer::default().with_epsilon(0.0).fit(&[[1.0]]),
            Err(Error::InvalidConfig(_))
        ));
    }
}
