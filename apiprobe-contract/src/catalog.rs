//! Built-in contracts for the API under test

use crate::error::{ContractError, ContractResult};
use crate::validator::ContractValidator;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// The built-in contracts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaName {
    User,
    ListUsers,
    Resource,
    ListResources,
}

impl SchemaName {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaName::User => "user",
            SchemaName::ListUsers => "list_users",
            SchemaName::Resource => "resource",
            SchemaName::ListResources => "list_resources",
        }
    }

    pub fn all() -> &'static [SchemaName] {
        &[
            SchemaName::User,
            SchemaName::ListUsers,
            SchemaName::Resource,
            SchemaName::ListResources,
        ]
    }

    fn source(&self) -> &'static str {
        match self {
            SchemaName::User => include_str!("../schemas/user.json"),
            SchemaName::ListUsers => include_str!("../schemas/list_users.json"),
            SchemaName::Resource => include_str!("../schemas/resource.json"),
            SchemaName::ListResources => include_str!("../schemas/list_resources.json"),
        }
    }

    /// The schema document
    pub fn schema(&self) -> ContractResult<JsonValue> {
        serde_json::from_str(self.source()).map_err(|e| ContractError::InvalidSchema {
            name: self.as_str().to_string(),
            message: e.to_string(),
        })
    }
}

impl fmt::Display for SchemaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaName {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SchemaName::all()
            .iter()
            .copied()
            .find(|name| name.as_str() == s.replace('-', "_"))
            .ok_or_else(|| ContractError::UnknownSchema(s.to_string()))
    }
}

/// Every built-in contract, compiled once per session
#[derive(Debug)]
pub struct SchemaCatalog {
    validators: HashMap<SchemaName, ContractValidator>,
}

impl SchemaCatalog {
    /// Compile all built-in contracts; the first invalid one is an error
    pub fn load() -> ContractResult<Self> {
        let mut validators = HashMap::new();
        for name in SchemaName::all() {
            let validator = ContractValidator::new(name.as_str(), name.schema()?)?;
            validators.insert(*name, validator);
        }
        Ok(Self { validators })
    }

    pub fn get(&self, name: SchemaName) -> &ContractValidator {
        // load() inserts every variant
        &self.validators[&name]
    }

    /// Inject defaults and validate against the named contract
    pub fn validate(&self, name: SchemaName, instance: &mut JsonValue) -> ContractResult<()> {
        self.get(name).validate(instance)
    }

    /// Validate against the named contract without modifying the instance
    pub fn check(&self, name: SchemaName, instance: &JsonValue) -> ContractResult<()> {
        self.get(name).check(instance)
    }
}
