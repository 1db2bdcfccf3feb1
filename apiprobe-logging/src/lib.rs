//! Structured logging infrastructure for apiprobe
//!
//! This crate provides:
//! - `tracing` subscriber initialisation driven by the `logging` config section
//! - Error severity and category classification
//! - Single-line failure diagnostics for aborted sessions

pub mod init;
pub mod report;
pub mod severity;

// Re-export main types for convenience
pub use init::{init_logging_from_config, init_simple_tracing, init_test_tracing};
pub use report::FailureReport;
pub use severity::{ErrorCategory, ErrorSeverity};
