//! Security scanning through an OWASP ZAP-compatible proxy
//!
//! Seeds the API paths through the scanner, runs an active scan, polls it
//! to completion, then collects alerts and the HTML report.

pub mod alert;
pub mod client;
pub mod error;
pub mod workflow;

pub use alert::{Alert, AlertSummary, Risk};
pub use client::ZapClient;
pub use error::ScanError;
pub use workflow::{ScanOutcome, SecurityScan};
