//! Security scanner (ZAP) settings

use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_required_string, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerSettings {
    /// Pause between active-scan status polls
    #[serde(with = "crate::domains::utils::serde_duration")]
    pub poll_interval: Duration,

    /// Give up after this many status polls
    pub max_polls: u32,

    /// Where the HTML report is written
    pub report_path: String,

    /// Run the spider before the active scan
    #[serde(default = "crate::domains::utils::default_false")]
    pub spider_first: bool,

    /// API paths pushed through the scanner proxy before scanning
    pub seed_paths: Vec<String>,
}

impl Default for ScannerSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            max_polls: 120,
            report_path: "zap_api_report.html".to_string(),
            spider_first: false,
            seed_paths: default_seed_paths(),
        }
    }
}

fn default_seed_paths() -> Vec<String> {
    [
        "/users",
        "/users/2",
        "/users/23",
        "/unknown",
        "/unknown/2",
        "/unknown/23",
        "/register",
        "/login",
        "/users?delay=3",
    ]
    .iter()
    .map(|path| path.to_string())
    .collect()
}

impl Validatable for ScannerSettings {
    fn validate(&self) -> ConfigResult<()> {
        validate_positive(self.max_polls, "max_polls", self.domain_name())?;
        validate_required_string(&self.report_path, "report_path", self.domain_name())?;
        for path in &self.seed_paths {
            if !path.starts_with('/') {
                return Err(self.validation_error(format!(
                    "seed path '{}' must start with '/'",
                    path
                )));
            }
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "scanner"
    }
}
