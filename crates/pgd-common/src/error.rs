//! Error types for PGD

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for PGD operations
pub type Result<T> = std::result::Result<T, PgdError>;

/// Main error type for PGD
#[derive(Error, Debug)]
pub enum PgdError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A reshaped input file does not carry the expected column set
    #[error(
        "Schema mismatch in '{}': expected columns [{}], found [{}]",
        file.display(),
        expected.join(", "),
        actual.join(", ")
    )]
    Schema {
        file: PathBuf,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    /// The external concept recognizer failed; never retried
    #[error("Annotation error: {0}")]
    Annotation(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl PgdError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an annotation error
    pub fn annotation(msg: impl Into<String>) -> Self {
        Self::Annotation(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
