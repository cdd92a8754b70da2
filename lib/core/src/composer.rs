use serde::{Deserialize, Serialize};
use crate::{Error, Result, Vector};

/// Layout of a composed feature row: `[numeric..., embedding...]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureComposer {
    numeric_dim: usize,
    text_dim: usize,
}

impl FeatureComposer {
    #[inline]
    #[must_use]
    pub fn new(numeric_dim: usize, text_dim: usize) -> Self {
        Self {
            numeric_dim,
            text_dim,
        }
    }

    /// Length of every composed row
    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.numeric_dim + self.text_dim
    }

    /// Concatenate standardized numerics with the text embedding.
    ///
    /// Fails when a value overflows `f32` instead of storing an infinity.
    pub fn compose(&self, numeric: &[f64], embedding: &[f64]) -> Result<Vector> {
        Error::check_dim(self.numeric_dim, numeric.len())?;
        Error::check_dim(self.text_dim, embedding.len())?;

        let mut row: Vec<f32> = Vec::with_capacity(self.dim());
        for (position, &x) in numeric.iter().chain(embedding).enumerate() {
            let narrowed = x as f32;
            if !narrowed.is_finite() {
                return Err(Error::InvalidInput(format!(
                    "feature {} is not representable as f32: {}",
                    position, x
                )));
            }
            row.push(narrowed);
        }
        Ok(Vector::new(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_order() {
        let composer = FeatureComposer::new(2, 3);
        let v = composer.compose(&[1.0, 2.0], &[3.0, 4.0, 5.0]).unwrap();
        assert_eq!(v.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(composer.dim(), 5);
    }

    #[test]
    fn test_compose_rejects_wrong_lengths() {
        let composer = FeatureComposer::new(2, 3);
        assert_eq!(
            composer.compose(&[1.0], &[3.0, 4.0, 5.0]).unwrap_err(),
            Error::DimensionMismatch { expected: 2, actual: 1 }
        );
        assert_eq!(
            composer.compose(&[1.0, 2.0], &[3.0]).unwrap_err(),
            Error::DimensionMismatch { expected: 3, actual: 1 }
        );
    }

    #[test]
    fn test_compose_rejects_f32_overflow() {
        let composer = FeatureComposer::new(1, 1);
        let err = composer.compose(&[1e200], &[0.0]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(ref msg) if msg.contains("feature 0")));
        assert!(composer.compose(&[0.0], &[f64::NAN]).is_err());
        assert!(composer.compose(&[f64::from(f32::MAX)], &[-1.0]).is_ok());
    }
}
