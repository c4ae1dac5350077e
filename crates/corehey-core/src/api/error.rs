//! API caller error types

use thiserror::Error;

/// Transport failures talking to the downstream API
///
/// Non-2xx responses are not errors: their bodies are handed back as-is.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request could not be sent or no response arrived in time
    #[error("Request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The response body could not be read
    #[error("Failed to read response: {0}")]
    ReadBody(#[source] reqwest::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;
