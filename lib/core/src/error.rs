use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Empty or malformed corpus, record or text.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Reducer target dimension exceeds the vocabulary, or an unusable setting.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Engine is not fitted")]
    NotFitted,

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Shorthand used at every stage boundary.
    #[inline]
    pub fn check_dim(expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(Error::DimensionMismatch { expected, actual })
        }
    }
}
