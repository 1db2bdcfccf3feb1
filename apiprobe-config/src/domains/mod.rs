//! Typed settings sections of the configuration document

pub mod logging;
pub mod scanner;
pub mod stub;
pub mod utils;

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Harness settings read from the optional `logging`, `stub` and `scanner` sections
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HarnessSettings {
    /// Logging configuration
    #[serde(default)]
    pub logging: logging::LoggingConfig,

    /// Stub server orchestration
    #[serde(default)]
    pub stub: stub::StubSettings,

    /// Security scanner workflow
    #[serde(default)]
    pub scanner: scanner::ScannerSettings,
}

impl HarnessSettings {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.logging.validate()?;
        self.stub.validate()?;
        self.scanner.validate()?;
        Ok(())
    }

    /// Generate a sample settings block
    pub fn generate_sample() -> String {
        serde_yaml::to_string(&HarnessSettings::default())
            .unwrap_or_else(|_| "# Failed to generate sample settings".to_string())
    }
}
