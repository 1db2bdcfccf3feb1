//! Stub orchestration error types

use std::fmt;
use std::path::PathBuf;

/// Errors talking to the stub server admin API or reading mapping files
#[derive(Debug, thiserror::Error)]
pub enum StubError {
    #[error("Stub admin request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Stub server rejected {operation} with status {status}: {body}")]
    Rejected {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("Failed to read mappings file {path}: {source}")]
    MappingsFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Mappings file {path} is malformed: {message}")]
    MappingsParse { path: PathBuf, message: String },

    #[error("Unexpected admin response: {0}")]
    InvalidResponse(String),
}

/// Errors from the container runtime
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },
}

/// Orchestration stage that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetupStage {
    ContainerRuntime,
    Reachability,
    Provisioning,
}

impl SetupStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SetupStage::ContainerRuntime => "container-runtime",
            SetupStage::Reachability => "reachability",
            SetupStage::Provisioning => "provisioning",
        }
    }
}

impl fmt::Display for SetupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stub server setup failure; aborts the session
#[derive(Debug, Clone, thiserror::Error)]
#[error("stub setup failed at {stage}: {message}")]
pub struct SetupError {
    pub stage: SetupStage,
    pub message: String,
}

impl SetupError {
    pub fn new(stage: SetupStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }

    /// Single-line diagnostic naming the failed stage
    pub fn diagnostic(&self) -> String {
        let message = self.message.split_whitespace().collect::<Vec<_>>().join(" ");
        format!("stub setup failed at {}: {}", self.stage, message)
    }
}
