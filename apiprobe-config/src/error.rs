//! Configuration and test data error types

use std::path::PathBuf;
use thiserror::Error;

/// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Test data result type
pub type DataResult<T> = Result<T, DataError>;

/// Configuration errors
///
/// All of these are fatal at session start.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist
    #[error("Configuration file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The configuration file is not valid YAML, or its root is not a mapping
    #[error("Error parsing YAML in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// Any other I/O fault while reading the configuration file
    #[error("Failed to load config file {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No base URL registered for the resolved environment
    #[error("Base URL for environment '{environment}' not found in config")]
    MissingBaseUrl { environment: String },

    /// Endpoint group/name pair is absent
    #[error("Endpoint '{name}' in group '{group}' not found in config")]
    EndpointNotFound { group: String, name: String },

    /// A template placeholder has no supplied value
    #[error("Endpoint template '{template}' requires a value for placeholder '{placeholder}'")]
    PlaceholderMissing { template: String, placeholder: String },

    /// A template placeholder was supplied an empty value
    #[error("Endpoint template '{template}' got an empty value for placeholder '{placeholder}'")]
    PlaceholderEmpty { template: String, placeholder: String },

    /// A required top-level key is absent
    #[error("Required config key '{0}' not found")]
    MissingKey(String),

    /// A key is present but has the wrong shape
    #[error("Invalid value for config key '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Environment variable override error
    #[error("Environment variable error: {0}")]
    EnvError(String),

    /// Domain-specific configuration error
    #[error("Domain configuration error in {domain}: {message}")]
    DomainError { domain: String, message: String },
}

/// Test data errors
///
/// These fail the individual test that asked for the data.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Data file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Error parsing YAML in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Failed to load data file {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Test data section '{section}' not found for environment '{environment}'")]
    SectionNotFound { environment: String, section: String },

    #[error("Test data key '{key}' not found in section '{section}'")]
    KeyNotFound { section: String, key: String },

    #[error("Test data '{location}' has an unexpected shape: {message}")]
    InvalidValue { location: String, message: String },
}
