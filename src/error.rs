//! Error types for the comment analyzer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Fetch cancelled")]
    Cancelled,

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AnalyzerError {
    /// True when the comment or metadata source failed
    pub fn is_source_unavailable(&self) -> bool {
        matches!(self, AnalyzerError::SourceUnavailable(_))
    }
}

// Transport failures (timeouts, refused connections, bad bodies) all mean the
// source could not be read.
impl From<reqwest::Error> for AnalyzerError {
    fn from(err: reqwest::Error) -> Self {
        AnalyzerError::SourceUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
