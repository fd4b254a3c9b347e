//! Error types for the OpenLineage client.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Delivery failures get their own enum so transports can stay independent
//! of client-level concerns.

use thiserror::Error;

/// The top-level error type for all client operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Delivery ---
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

impl Error {
    /// Shorthand for a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while delivering a single event.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to marshal event: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("server responded with status {status_code}: {body}")]
    Status { status_code: u16, body: String },

    #[error("execute POST request: {0}")]
    Network(String),

    #[error("emit event to console: {0}")]
    Write(String),

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("delivery cancelled")]
    Cancelled,

    #[error("delivery deadline exceeded")]
    DeadlineExceeded,
}
