//! Error types for catalog loading.

use stride_core::error::StrideError;

/// Errors raised while loading the products CSV.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV missing required column: {0}")]
    MissingColumn(String),
    #[error("invalid price {value:?} on row {row}")]
    InvalidPrice { row: usize, value: String },
    #[error("malformed CSV: {0}")]
    Csv(String),
}

impl From<csv::Error> for CatalogError {
    fn from(err: csv::Error) -> Self {
        CatalogError::Csv(err.to_string())
    }
}

impl From<CatalogError> for StrideError {
    fn from(err: CatalogError) -> Self {
        StrideError::Catalog(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_names_the_column() {
        let err = CatalogError::MissingColumn("tags".to_string());
        assert_eq!(err.to_string(), "CSV missing required column: tags");
    }

    #[test]
    fn test_io_error_names_the_path() {
        let err = CatalogError::Io {
            path: "products.csv".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let msg = err.to_string();
        assert!(msg.contains("products.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_invalid_price_display() {
        let err = CatalogError::InvalidPrice {
            row: 3,
            value: "cheap".to_string(),
        };
        assert_eq!(err.to_string(), "invalid price \"cheap\" on row 3");
    }

    #[test]
    fn test_into_stride_error() {
        let err: StrideError = CatalogError::MissingColumn("price".to_string()).into();
        assert!(matches!(err, StrideError::Catalog(_)));
        assert!(err.to_string().contains("price"));
    }
}
