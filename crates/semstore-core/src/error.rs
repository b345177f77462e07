use thiserror::Error;

/// Top-level error type for the semstore service.
///
/// The vector and API crates return this type from their fallible operations
/// so that `?` works across crate boundaries; the API layer maps it onto an
/// HTTP status at the handler boundary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SemstoreError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    Dimension { expected: usize, actual: usize },

    #[error("Store error: {0}")]
    Store(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for SemstoreError {
    fn from(err: toml::de::Error) -> Self {
        SemstoreError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for SemstoreError {
    fn from(err: toml::ser::Error) -> Self {
        SemstoreError::Config(err.to_string())
    }
}

/// A specialized `Result` type for semstore operations.
pub type Result<T> = std::result::Result<T, SemstoreError>;
