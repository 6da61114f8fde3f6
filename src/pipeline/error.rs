//! Error types for the preprocessing pipeline.
//!
//! Every stage returns [`Result`] with a [`PreprocessError`]. The variants
//! group into input errors (missing file, missing target), data-quality errors
//! (all-missing column, unseen category, degenerate variance) and I/O errors
//! when persisting the fitted transforms.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Result alias used by all pipeline stages.
pub type Result<T> = std::result::Result<T, PreprocessError>;

/// Errors that can occur while fitting or applying the preprocessing stages.
#[derive(Debug, Error)]
pub enum PreprocessError {
    /// A required column is not present in the dataset.
    #[error("Column '{column}' not found in dataset. Available columns: {available:?}")]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    /// The target column exists but holds text values.
    #[error("Target column '{column}' must be numeric, found {dtype}")]
    NonNumericTarget { column: String, dtype: String },

    /// A numeric column has no observed value, so its mean is undefined.
    #[error("Column '{column}' has no non-missing values; cannot compute an imputation mean")]
    AllMissing { column: String },

    /// A categorical column contains missing entries, which have no code.
    #[error("Categorical column '{column}' contains {count} missing value(s)")]
    MissingCategorical { column: String, count: usize },

    /// A categorical value was not observed when the encoder was fit.
    #[error("Value '{value}' in column '{column}' was not seen when the encoder was fit")]
    UnseenCategory { column: String, value: String },

    /// A column type that can be neither imputed nor encoded.
    #[error("Column '{column}' has unsupported type {dtype}")]
    UnsupportedColumn { column: String, dtype: String },

    /// A feature value is still missing when building the feature matrix.
    #[error("Column '{column}' still has a missing value at row {row}")]
    MissingValue { column: String, row: usize },

    /// The train/test split parameters cannot produce two non-empty partitions.
    #[error("Invalid split: {0}")]
    InvalidSplit(String),

    /// A stage received no rows or no columns to work with.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// A fitted transform was applied to data of the wrong width.
    #[error("Shape mismatch: expected {expected} feature column(s), got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Every feature is constant, so explained-variance ratios are undefined.
    #[error("Total variance of the training features is zero; PCA is undefined")]
    ZeroTotalVariance,

    /// The requested fraction of explained variance is outside (0, 1].
    #[error("Variance target must be in (0, 1], got {0}")]
    InvalidVarianceTarget(f64),

    /// A persisted artifact failed validation after loading.
    #[error("Corrupt artifact '{path}': {message}")]
    CorruptArtifact { path: String, message: String },

    #[error(transparent)]
    Polars(#[from] PolarsError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize artifact: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("Failed to deserialize artifact: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("Failed to read or write manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_missing_message_names_column() {
        let err = PreprocessError::AllMissing {
            column: "GDP".to_string(),
        };
        assert!(err.to_string().contains("'GDP'"));
    }

    #[test]
    fn test_shape_mismatch_message() {
        let err = PreprocessError::ShapeMismatch {
            expected: 4,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "Shape mismatch: expected 4 feature column(s), got 3"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: PreprocessError = io.into();
        assert!(matches!(err, PreprocessError::Io(_)));
    }
}
