//! Custom error types for scopus-roster.
//!
//! Fetch and enrichment failures are handled inside the clients (logged, then
//! turned into partial or empty results). What reaches callers as a
//! `ScopusError` is configuration, validation, or output failures.

use thiserror::Error;

/// Main error type for scopus-roster operations.
#[derive(Debug, Error)]
pub enum ScopusError {
    /// Network/HTTP request error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// External API returned a non-success status
    #[error("API error: {code} - {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Error message
        message: String,
    },

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV read/write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias using `ScopusError`
pub type Result<T> = std::result::Result<T, ScopusError>;
