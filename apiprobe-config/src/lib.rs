//! Configuration resolution for apiprobe
//!
//! This crate loads the harness configuration document once per session,
//! resolves the active environment, substitutes `${VAR}` tokens, renders
//! endpoint templates and loads the per-environment test data documents.

pub mod data;
pub mod document;
pub mod endpoint;
pub mod env;
pub mod error;
pub mod loader;
pub mod validation;

// Domain-specific configuration modules
pub mod domains;

// Re-export main types
pub use data::TestData;
pub use document::{AuthCredentials, ConfigDocument};
pub use endpoint::Placeholders;
pub use env::{resolve_environment, substitute_env_vars, DEFAULT_ENVIRONMENT, ENVIRONMENT_VAR};
pub use error::{ConfigError, ConfigResult, DataError, DataResult};
pub use loader::{ConfigLoader, DEFAULT_CONFIG_PATH};

// Re-export domain configurations
pub use domains::{
    logging::{LogFormat, LogLevel, LoggingConfig},
    scanner::ScannerSettings,
    stub::StubSettings,
    HarnessSettings,
};

pub use domains::utils::serde_duration;
