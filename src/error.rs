//! Error types for the gpr-prep library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum GprError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Could not read {path:?} with any supported encoding (tried {}): {last_error}", .attempted.join(", "))]
    Encoding {
        path: PathBuf,
        attempted: Vec<String>,
        last_error: String,
    },

    #[error("No valid {field} column found in {path:?} (accepted: {}). Available columns: {}", .tried.join(", "), .found.join(", "))]
    MissingColumn {
        path: PathBuf,
        field: String,
        tried: Vec<String>,
        found: Vec<String>,
    },

    #[error("Empty control group: {0}")]
    EmptyControlGroup(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Failed to process {path:?}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: Box<GprError>,
    },

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GprError {
    /// Attach the path of the file being processed to an error.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            // Already tagged with a file; keep the innermost path.
            err @ GprError::File { .. } => err,
            other => GprError::File {
                path: path.into(),
                source: Box::new(other),
            },
        }
    }
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, GprError>;
