//! `apiprobe contract` handlers

use anyhow::{Context, Result};
use apiprobe_contract::{ContractError, SchemaCatalog, SchemaName};
use serde_json::Value as JsonValue;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// Validate a saved response body against a built-in contract
pub fn handle_contract_check(schema: &str, file: &Path) -> Result<()> {
    let name = SchemaName::from_str(schema)?;
    info!("Checking {:?} against the '{}' contract", file, name.as_str());

    let content =
        std::fs::read_to_string(file).context(format!("Failed to read {:?}", file))?;
    let mut instance: JsonValue =
        serde_json::from_str(&content).context(format!("{:?} is not valid JSON", file))?;

    let catalog = SchemaCatalog::load()?;
    match catalog.validate(name, &mut instance) {
        Ok(()) => {
            println!("✅ {} satisfies the '{}' contract", file.display(), name.as_str());
            Ok(())
        }
        Err(ContractError::Validation { schema, violations }) => {
            println!("❌ {} violates the '{}' contract:", file.display(), schema);
            for violation in &violations {
                println!("  - {}", violation);
            }
            Err(ContractError::Validation { schema, violations }.into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Print the built-in contracts
pub fn handle_contract_list() -> Result<()> {
    for name in SchemaName::all() {
        let schema = name.schema()?;
        let title = schema
            .get("title")
            .and_then(JsonValue::as_str)
            .unwrap_or_default();
        println!("{:<16} {}", name.as_str(), title);
    }
    Ok(())
}
