//! Scanner alerts

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Alert risk level, as reported by the scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Risk {
    Informational,
    Low,
    Medium,
    High,
}

impl FromStr for Risk {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "informational" | "info" => Ok(Risk::Informational),
            "low" => Ok(Risk::Low),
            "medium" => Ok(Risk::Medium),
            "high" => Ok(Risk::High),
            _ => Err(format!("Unknown risk level: {}", s)),
        }
    }
}

impl fmt::Display for Risk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let risk = match self {
            Risk::Informational => "Informational",
            Risk::Low => "Low",
            Risk::Medium => "Medium",
            Risk::High => "High",
        };
        f.write_str(risk)
    }
}

/// One scanner finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub alert: String,
    pub risk: String,
    pub url: String,
    #[serde(default)]
    pub solution: String,
    #[serde(default)]
    pub confidence: String,
    #[serde(default)]
    pub plugin_id: String,
}

impl Alert {
    /// Parsed risk; unrecognised labels count as informational
    pub fn risk_level(&self) -> Risk {
        self.risk.parse().unwrap_or(Risk::Informational)
    }
}

/// Alerts grouped for assertions and logging
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertSummary {
    alerts: Vec<Alert>,
}

impl AlertSummary {
    pub fn new(alerts: Vec<Alert>) -> Self {
        Self { alerts }
    }

    pub fn total(&self) -> usize {
        self.alerts.len()
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn with_risk(&self, risk: Risk) -> Vec<&Alert> {
        self.alerts
            .iter()
            .filter(|alert| alert.risk_level() == risk)
            .collect()
    }

    pub fn high_risk(&self) -> Vec<&Alert> {
        self.with_risk(Risk::High)
    }

    pub fn medium_risk(&self) -> Vec<&Alert> {
        self.with_risk(Risk::Medium)
    }

    pub fn has_high_risk(&self) -> bool {
        self.alerts.iter().any(|alert| alert.risk_level() == Risk::High)
    }
}
