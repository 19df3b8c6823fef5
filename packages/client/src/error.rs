use thiserror::Error;

/// Error type for Congress.gov API operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response was received.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not valid JSON.
    #[error("invalid JSON in response from {endpoint}: {message}")]
    InvalidJson { endpoint: String, message: String },

    /// Detail fetch for an item failed.
    #[error("detail fetch for {path} failed with status {status}")]
    DetailStatus { path: String, status: u16 },

    /// Configuration problem (bad base URL, missing key).
    #[error("client configuration error: {0}")]
    Config(String),
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
