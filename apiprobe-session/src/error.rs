//! Session bootstrap errors

use apiprobe_logging::{ErrorCategory, ErrorSeverity, FailureReport};
use apiprobe_stub::{SetupError, SetupStage};
use std::fmt;

/// Bootstrap stage that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionStage {
    Config,
    Data,
    BaseUrl,
    Schemas,
    ContainerRuntime,
    Reachability,
    Provisioning,
}

impl SessionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStage::Config => "config",
            SessionStage::Data => "data",
            SessionStage::BaseUrl => "base-url",
            SessionStage::Schemas => "schemas",
            SessionStage::ContainerRuntime => "container-runtime",
            SessionStage::Reachability => "reachability",
            SessionStage::Provisioning => "provisioning",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SessionStage::Config | SessionStage::BaseUrl => ErrorCategory::Configuration,
            SessionStage::Data => ErrorCategory::Data,
            SessionStage::Schemas => ErrorCategory::Contract,
            SessionStage::ContainerRuntime
            | SessionStage::Reachability
            | SessionStage::Provisioning => ErrorCategory::Setup,
        }
    }
}

impl fmt::Display for SessionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SetupStage> for SessionStage {
    fn from(stage: SetupStage) -> Self {
        match stage {
            SetupStage::ContainerRuntime => SessionStage::ContainerRuntime,
            SetupStage::Reachability => SessionStage::Reachability,
            SetupStage::Provisioning => SessionStage::Provisioning,
        }
    }
}

/// Session start failed; the whole run is aborted
#[derive(Debug, Clone, thiserror::Error)]
#[error("session start failed at {stage}: {message}")]
pub struct SessionError {
    pub stage: SessionStage,
    pub message: String,
}

impl SessionError {
    pub fn new(stage: SessionStage, message: impl ToString) -> Self {
        Self {
            stage,
            message: message.to_string(),
        }
    }

    /// Failure report for the log; any bootstrap failure aborts the run
    pub fn report(&self) -> FailureReport {
        FailureReport::new(self.stage.category(), self.stage.as_str(), self.message.clone())
            .with_severity(ErrorSeverity::Critical)
    }

    /// Single-line diagnostic naming the failed stage
    pub fn diagnostic(&self) -> String {
        self.report().diagnostic()
    }
}

impl From<SetupError> for SessionError {
    fn from(error: SetupError) -> Self {
        Self::new(error.stage.into(), error.message)
    }
}
