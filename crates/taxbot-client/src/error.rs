//! Error types for taxbot-client

use thiserror::Error;

/// Result type alias using taxbot-client Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to the tax endpoint
#[derive(Error, Debug)]
pub enum Error {
    /// Endpoint answered with a non-success status
    #[error("Failed to fetch tax data (HTTP {status})")]
    Status { status: reqwest::StatusCode },

    /// Request could not be sent or the body could not be read
    #[error("Failed to fetch tax data: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
