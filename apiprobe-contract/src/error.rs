//! Contract error types

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

pub type ContractResult<T> = Result<T, ContractError>;

/// One schema violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// JSON pointer into the instance
    pub instance_path: String,
    /// JSON pointer into the schema
    pub schema_path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = if self.instance_path.is_empty() {
            "/"
        } else {
            &self.instance_path
        };
        write!(f, "{}: {}", location, self.message)
    }
}

/// Errors produced by contract validation
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("Schema '{name}' is not a valid Draft 7 schema: {message}")]
    InvalidSchema { name: String, message: String },

    #[error("Response does not satisfy the '{schema}' contract: {}", join_violations(.violations))]
    Validation {
        schema: String,
        violations: Vec<Violation>,
    },

    #[error("Failed to read schema file {path}: {source}")]
    SchemaFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Schema file {path} is not valid JSON: {message}")]
    SchemaParse { path: PathBuf, message: String },

    #[error("Unknown schema '{0}'")]
    UnknownSchema(String),
}

impl ContractError {
    /// Violations carried by a validation failure
    pub fn violations(&self) -> &[Violation] {
        match self {
            ContractError::Validation { violations, .. } => violations,
            _ => &[],
        }
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
