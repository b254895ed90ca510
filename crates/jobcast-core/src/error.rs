//! Jobcast error type.

use thiserror::Error;

/// All errors a notification run can surface.
#[derive(Debug, Error)]
pub enum JobcastError {
    /// A required action input is missing or malformed.
    #[error("Input error: {0}")]
    Input(String),

    /// Configuration file could not be read or parsed.
    #[error("Config error: {0}")]
    Config(String),

    /// Webhook delivery failed (transport error or non-success status).
    #[error("Webhook error: {0}")]
    Webhook(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, JobcastError>;
