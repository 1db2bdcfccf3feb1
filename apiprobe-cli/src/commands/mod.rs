//! Subcommand handlers

pub mod config;
pub mod contract;
pub mod endpoint;
pub mod scan;
pub mod stub;
