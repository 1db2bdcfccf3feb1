//! Configuration loading and environment variable handling

use crate::document::ConfigDocument;
use crate::domains::HarnessSettings;
use crate::env::{resolve_environment, substitute_top_level};
use crate::error::{ConfigError, ConfigResult};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default location of the configuration document
pub const DEFAULT_CONFIG_PATH: &str = "config/config.yaml";

/// Keys of the document that hold typed harness settings
const SETTINGS_KEYS: [&str; 3] = ["logging", "stub", "scanner"];

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    /// Environment variable prefix for settings overrides
    prefix: String,

    /// Explicit environment, taking precedence over `TEST_ENV`
    environment: Option<String>,
}

impl ConfigLoader {
    /// Create a new config loader with default prefix
    pub fn new() -> Self {
        Self {
            prefix: "APIPROBE".to_string(),
            environment: None,
        }
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            environment: None,
        }
    }

    /// Pin the environment instead of reading `TEST_ENV`
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Load the document from the default path, or the given one
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<ConfigDocument> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_file(DEFAULT_CONFIG_PATH),
        }
    }

    /// Load configuration from a YAML file
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<ConfigDocument> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::Load {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        log::debug!("Loaded configuration from {}", path.display());
        self.parse(&content, Some(path.to_path_buf()))
    }

    /// Load configuration from YAML text
    pub fn from_yaml_str(&self, content: &str) -> ConfigResult<ConfigDocument> {
        self.parse(content, None)
    }

    fn parse(&self, content: &str, source: Option<PathBuf>) -> ConfigResult<ConfigDocument> {
        let origin = source
            .clone()
            .unwrap_or_else(|| PathBuf::from("<inline>"));

        let parsed: Value = serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
            path: origin.clone(),
            message: e.to_string(),
        })?;

        let mut values = match parsed {
            Value::Object(values) => values,
            Value::Null => Map::new(),
            other => {
                return Err(ConfigError::Parse {
                    path: origin,
                    message: format!("document root must be a mapping, found {}", kind_of(&other)),
                })
            }
        };

        substitute_top_level(&mut values, |name| std::env::var(name).ok());

        let mut settings = extract_settings(&values)?;
        self.apply_env_overrides(&mut settings)?;
        settings.validate_all()?;

        let environment = resolve_environment(self.environment.as_deref());
        log::info!("Using test environment '{}'", environment);

        Ok(ConfigDocument::new(source, environment, values, settings))
    }

    /// Apply environment variable overrides to the typed settings
    fn apply_env_overrides(&self, settings: &mut HarnessSettings) -> ConfigResult<()> {
        if let Ok(level) = self.get_env_var("LOG_LEVEL") {
            settings.logging.level = crate::domains::logging::LogLevel::from_str(&level)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_LEVEL: {}", level)))?;
        }

        if let Ok(format) = self.get_env_var("LOG_FORMAT") {
            settings.logging.format = crate::domains::logging::LogFormat::from_str(&format)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_FORMAT: {}", format)))?;
        }

        if let Ok(attempts) = self.get_env_var("STUB_READINESS_ATTEMPTS") {
            settings.stub.readiness_attempts = attempts.parse().map_err(|e| {
                ConfigError::EnvError(format!("Invalid STUB_READINESS_ATTEMPTS: {}", e))
            })?;
        }

        Ok(())
    }

    /// Get environment variable with prefix
    fn get_env_var(&self, name: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, name))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn extract_settings(values: &Map<String, Value>) -> ConfigResult<HarnessSettings> {
    let mut sections = Map::new();
    for key in SETTINGS_KEYS {
        if let Some(section) = values.get(key).filter(|v| !v.is_null()) {
            sections.insert(key.to_string(), section.clone());
        }
    }

    serde_json::from_value(Value::Object(sections)).map_err(|e| ConfigError::InvalidValue {
        key: SETTINGS_KEYS.join("/"),
        message: e.to_string(),
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
