use thiserror::Error;

/// Top-level error type for the Stride storefront.
///
/// Subsystem crates define their own error types and implement
/// `From<SubsystemError> for StrideError` so that `?` works across crate
/// boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StrideError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Assistant error: {0}")]
    Assistant(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for StrideError {
    fn from(err: toml::de::Error) -> Self {
        StrideError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for StrideError {
    fn from(err: toml::ser::Error) -> Self {
        StrideError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for StrideError {
    fn from(err: serde_json::Error) -> Self {
        StrideError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Stride operations.
pub type Result<T> = std::result::Result<T, StrideError>;
