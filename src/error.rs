//! Error types for u-profile.
//!
//! The statistics functions never fail: every data-shape edge case maps to
//! an explicit "undefined" value. Errors only arise while loading a dataset
//! or when a chart is requested for a column that cannot support it.

/// Result type alias for u-profile operations.
pub type Result<T> = std::result::Result<T, ProfileError>;

/// All errors produced by u-profile operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ProfileError {
    /// CSV parsing failed.
    #[error("CSV parse error at line {line}: {message}")]
    CsvParse { line: usize, message: String },

    /// Uploaded bytes are not valid UTF-8.
    #[error("input is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    /// Column is not numeric where numeric data is required.
    #[error("column '{column}' is not numeric")]
    NonNumericColumn { column: String },

    /// Column holds numbers where labels are required.
    #[error("column '{column}' is not categorical")]
    NonCategoricalColumn { column: String },

    /// Insufficient data for the requested operation.
    #[error("need at least {min_required} rows, got {actual}")]
    InsufficientData { min_required: usize, actual: usize },

    /// Column not found in the dataset.
    #[error("column '{name}' not found")]
    ColumnNotFound { name: String },

    /// A column with this name already exists.
    #[error("duplicate column name '{name}'")]
    DuplicateColumn { name: String },

    /// Column length differs from the dataset's row count.
    #[error("expected {expected} rows, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Invalid option value.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Report serialization failed.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error during file reading.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
