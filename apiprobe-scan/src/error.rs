//! Scanner error types

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Security scanner at {url} is not running or unreachable: {message}")]
    Unavailable { url: String, message: String },

    #[error("Scanner request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Scanner endpoint {endpoint} answered {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Unexpected response from {endpoint}: {message}")]
    InvalidResponse { endpoint: String, message: String },

    #[error("Active scan of {target} could not start: {message}")]
    ScanNotStarted { target: String, message: String },

    #[error("Scan did not finish after {polls} polls (last progress {progress}%)")]
    Timeout { polls: u32, progress: u8 },

    #[error("Failed to write report {path}: {source}")]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
