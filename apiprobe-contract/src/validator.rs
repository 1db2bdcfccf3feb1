//! Two-stage contract validator

use crate::defaults::inject_defaults;
use crate::error::{ContractError, ContractResult, Violation};
use crate::uri_template::is_uri_template;
use jsonschema::{Draft, Validator};
use serde_json::Value as JsonValue;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

/// A compiled contract
pub struct ContractValidator {
    name: String,
    schema: JsonValue,
    validator: Validator,
}

impl ContractValidator {
    /// Check `schema` against the Draft 7 meta-schema and compile it
    pub fn new(name: impl Into<String>, schema: JsonValue) -> ContractResult<Self> {
        let name = name.into();

        jsonschema::draft7::meta::validate(&schema).map_err(|e| ContractError::InvalidSchema {
            name: name.clone(),
            message: e.to_string(),
        })?;

        let validator = jsonschema::options()
            .with_draft(Draft::Draft7)
            .should_validate_formats(true)
            .with_format("uri", is_uri_template)
            .build(&schema)
            .map_err(|e| ContractError::InvalidSchema {
                name: name.clone(),
                message: e.to_string(),
            })?;

        debug!("Compiled contract '{}'", name);
        Ok(Self {
            name,
            schema,
            validator,
        })
    }

    /// Load and compile a schema file
    pub fn from_file(name: impl Into<String>, path: impl AsRef<Path>) -> ContractResult<Self> {
        Self::new(name, load_schema_file(path)?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &JsonValue {
        &self.schema
    }

    /// Inject schema defaults into `instance`, then check it
    pub fn validate(&self, instance: &mut JsonValue) -> ContractResult<()> {
        inject_defaults(&self.schema, instance);
        self.check(instance)
    }

    /// Check `instance` without modifying it
    pub fn check(&self, instance: &JsonValue) -> ContractResult<()> {
        let violations: Vec<Violation> = self
            .validator
            .iter_errors(instance)
            .map(|error| Violation {
                instance_path: error.instance_path.to_string(),
                schema_path: error.schema_path.to_string(),
                message: error.to_string(),
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ContractError::Validation {
                schema: self.name.clone(),
                violations,
            })
        }
    }

    pub fn is_valid(&self, instance: &JsonValue) -> bool {
        self.validator.is_valid(instance)
    }
}

impl fmt::Debug for ContractValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractValidator")
            .field("name", &self.name)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

/// Read a JSON schema from disk
pub fn load_schema_file(path: impl AsRef<Path>) -> ContractResult<JsonValue> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ContractError::SchemaFile {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|e| ContractError::SchemaParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
