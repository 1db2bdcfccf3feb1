//! `apiprobe config` handlers

use anyhow::{Context, Result};
use apiprobe_config::{ConfigDocument, HarnessSettings, TestData};
use std::path::Path;
use tracing::info;

/// Check that the environment has a base URL and a readable data file
pub fn handle_config_validate(config: &ConfigDocument, data_dir: &Path) -> Result<()> {
    let environment = config.environment();
    info!("Validating configuration for environment '{}'", environment);

    let base_url = config.get_base_url(None)?;
    let data = TestData::load(data_dir, Some(environment))
        .context(format!("Test data for '{}' is unusable", environment))?;

    println!("✅ Configuration is valid");
    println!("  environment: {}", environment);
    println!("  base URL:    {}", base_url);
    println!("  test data:   {}", data.path().display());
    Ok(())
}

/// Print default harness settings
pub fn handle_config_sample() -> Result<()> {
    print!("{}", HarnessSettings::generate_sample());
    Ok(())
}
