use thiserror::Error;

/// Errors that can occur while exchanging payloads with a node.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TransportError {
    /// Request exceeded the configured timeout duration.
    #[error("Request timeout")]
    Timeout,

    /// Failed to establish a connection to the node, or to build the client.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP-level error occurred (non-2xx status code).
    ///
    /// First field is the HTTP status code, second is the (truncated) response body.
    #[error("HTTP error {0}: {1}")]
    HttpError(u16, String),

    /// Network-level error from the underlying HTTP client.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The transport cannot carry this kind of exchange.
    #[error("Unsupported endpoint: {0}")]
    Unsupported(String),
}

impl TransportError {
    /// Returns `true` if retrying the same request later may succeed.
    ///
    /// Transient errors include timeouts, connection and network failures, HTTP 5xx server
    /// errors and HTTP 429 rate limiting.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout | Self::Network(_) | Self::ConnectionFailed(_) => true,
            Self::HttpError(status, _) => (500..=599).contains(status) || *status == 429,
            Self::Unsupported(_) => false,
        }
    }
}
