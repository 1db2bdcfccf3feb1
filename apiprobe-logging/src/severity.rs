//! Error severity levels and categories

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum ErrorSeverity {
    Info,
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

/// Where in the harness a failure originated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Missing or malformed configuration; fatal at session start
    Configuration,
    /// Missing section or key in the test data; fails the requesting test
    Data,
    /// Network failure talking to the API, stub server or scanner
    Transport,
    /// Response did not conform to its schema
    Contract,
    /// Stub server or scanner bring-up failed
    Setup,
}

impl ErrorCategory {
    /// Default severity for failures in this category
    pub fn default_severity(&self) -> ErrorSeverity {
        match self {
            ErrorCategory::Configuration | ErrorCategory::Setup => ErrorSeverity::Critical,
            ErrorCategory::Transport => ErrorSeverity::High,
            ErrorCategory::Data | ErrorCategory::Contract => ErrorSeverity::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Configuration => "configuration",
            ErrorCategory::Data => "data",
            ErrorCategory::Transport => "transport",
            ErrorCategory::Contract => "contract",
            ErrorCategory::Setup => "setup",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
