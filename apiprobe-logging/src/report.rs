use crate::severity::{ErrorCategory, ErrorSeverity};
use serde::{Deserialize, Serialize};

/// A failure that aborted a session or a test, ready to be logged
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureReport {
    pub category: ErrorCategory,
    pub stage: String,
    pub message: String,
    pub severity: ErrorSeverity,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl FailureReport {
    pub fn new(
        category: ErrorCategory,
        stage: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            stage: stage.into(),
            message: message.into(),
            severity: category.default_severity(),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.severity = severity;
        self
    }

    /// Single-line diagnostic naming the failed stage.
    ///
    /// Line breaks in the underlying message are folded into spaces.
    pub fn diagnostic(&self) -> String {
        let message = self
            .message
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        format!("[{}] {} failed: {}", self.category, self.stage, message)
    }

    /// Emit the report through `tracing` at a level matching its severity
    pub fn log(&self) {
        let diagnostic = self.diagnostic();
        match self.severity {
            ErrorSeverity::Critical | ErrorSeverity::High => tracing::error!(
                category = %self.category,
                stage = %self.stage,
                "{}",
                diagnostic
            ),
            ErrorSeverity::Medium => tracing::warn!(
                category = %self.category,
                stage = %self.stage,
                "{}",
                diagnostic
            ),
            ErrorSeverity::Low | ErrorSeverity::Info => tracing::info!(
                category = %self.category,
                stage = %self.stage,
                "{}",
                diagnostic
            ),
        }
    }
}

impl std::fmt::Display for FailureReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.diagnostic())
    }
}
