//! Error types for sp-hist

use thiserror::Error;

/// sp-hist error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Observable key not present in the bundle
    #[error("unknown observable: {0}")]
    UnknownObservable(String),

    /// Axis name not present on the histogram
    #[error("unknown axis: {0}")]
    UnknownAxis(String),

    /// Category not present on a category axis
    #[error("unknown category '{category}' on axis '{axis}'")]
    UnknownCategory {
        /// Axis name.
        axis: String,
        /// Requested category.
        category: String,
    },

    /// Two series that must share bin edges do not
    #[error("binning mismatch: {0}")]
    BinningMismatch(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
