//! `apiprobe endpoint` handler

use anyhow::{Context, Result};
use apiprobe_config::endpoint::template_placeholders;
use apiprobe_config::{ConfigDocument, ConfigError, Placeholders};

/// Resolve an endpoint template and print it
pub fn handle_endpoint(
    config: &ConfigDocument,
    group: &str,
    name: &str,
    values: &[(String, String)],
    absolute: bool,
) -> Result<()> {
    let resolved = resolve_endpoint(config, group, name, values, absolute)?;
    println!("{}", resolved);
    Ok(())
}

pub fn resolve_endpoint(
    config: &ConfigDocument,
    group: &str,
    name: &str,
    values: &[(String, String)],
    absolute: bool,
) -> Result<String> {
    let placeholders: Placeholders = values.iter().cloned().collect();

    let path = match config.get_endpoint(group, name, &placeholders) {
        Ok(path) => path,
        Err(e @ ConfigError::PlaceholderMissing { .. }) => {
            let expected = config
                .endpoint_template(group, name)
                .map(template_placeholders)
                .unwrap_or_default();
            return Err(e).context(format!("Expected placeholders: {}", expected.join(", ")));
        }
        Err(e) => return Err(e.into()),
    };

    if absolute {
        Ok(format!("{}{}", config.get_base_url(None)?, path))
    } else {
        Ok(path)
    }
}
