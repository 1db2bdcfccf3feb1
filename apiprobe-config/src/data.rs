//! Per-environment test data documents

use crate::env::resolve_environment;
use crate::error::{DataError, DataResult};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Default directory holding `<env>.yaml` data files
pub const DEFAULT_DATA_DIR: &str = "data";

/// Test data for one environment, keyed by section
#[derive(Debug, Clone)]
pub struct TestData {
    environment: String,
    path: PathBuf,
    sections: Map<String, Value>,
}

impl TestData {
    /// Load `<data_dir>/<env>.yaml`, resolving the environment like the config loader
    pub fn load(data_dir: impl AsRef<Path>, environment: Option<&str>) -> DataResult<Self> {
        let environment = resolve_environment(environment);
        let path = data_dir.as_ref().join(format!("{}.yaml", environment));

        let content = std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                DataError::FileNotFound { path: path.clone() }
            } else {
                DataError::Load {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        Self::parse(environment, path, &content)
    }

    /// Build test data from YAML text
    pub fn from_yaml_str(environment: impl Into<String>, content: &str) -> DataResult<Self> {
        Self::parse(environment.into(), PathBuf::from("<inline>"), content)
    }

    fn parse(environment: String, path: PathBuf, content: &str) -> DataResult<Self> {
        let parsed: Value = serde_yaml::from_str(content).map_err(|e| DataError::Parse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        let sections = match parsed {
            Value::Object(sections) => sections,
            Value::Null => Map::new(),
            _ => {
                return Err(DataError::Parse {
                    path,
                    message: "document root must be a mapping".to_string(),
                })
            }
        };

        log::debug!(
            "Loaded {} test data sections for environment '{}'",
            sections.len(),
            environment
        );

        Ok(Self {
            environment,
            path,
            sections,
        })
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whole section when `key` is `None`, otherwise the keyed value
    pub fn get_data(&self, section: &str, key: Option<&str>) -> DataResult<&Value> {
        let section_value =
            self.sections
                .get(section)
                .ok_or_else(|| DataError::SectionNotFound {
                    environment: self.environment.clone(),
                    section: section.to_string(),
                })?;

        let Some(key) = key else {
            return Ok(section_value);
        };

        section_value
            .as_object()
            .and_then(|entries| entries.get(key))
            .ok_or_else(|| DataError::KeyNotFound {
                section: section.to_string(),
                key: key.to_string(),
            })
    }

    /// Deserialize a section or keyed value into a typed structure
    pub fn get_as<T: DeserializeOwned>(&self, section: &str, key: Option<&str>) -> DataResult<T> {
        let value = self.get_data(section, key)?;
        serde_json::from_value(value.clone()).map_err(|e| DataError::InvalidValue {
            location: match key {
                Some(key) => format!("{}.{}", section, key),
                None => section.to_string(),
            },
            message: e.to_string(),
        })
    }
}
