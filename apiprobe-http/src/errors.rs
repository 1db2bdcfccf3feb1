//! HTTP error types

/// Error type for HTTP operations
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid header name: {0}")]
    InvalidHeaderName(String),

    #[error("Invalid value for header {0}")]
    InvalidHeaderValue(String),

    #[error("Response body is not valid JSON (status {status}): {source}")]
    InvalidJson {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] apiprobe_config::ConfigError),
}

impl HttpError {
    /// Whether the failure happened below HTTP (connect, DNS, TLS, body read)
    pub fn is_transport(&self) -> bool {
        matches!(self, HttpError::NetworkError(_))
    }
}
