// Error types for devflags.
// Covers request construction, HTTP and decode failures, and cache I/O.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DevFlagsError {
    #[error("Request service unavailable")]
    ServiceUnavailable,

    #[error("No tokio runtime to run the request on")]
    RuntimeUnavailable,

    #[error("Failed to create request: {0}")]
    RequestConstruction(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown toggle: {0}")]
    InvalidToggle(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, DevFlagsError>;
