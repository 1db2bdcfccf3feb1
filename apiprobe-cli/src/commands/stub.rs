//! `apiprobe stub` handlers

use anyhow::{Context, Result};
use apiprobe_config::ConfigDocument;
use apiprobe_stub::{DockerCli, StubAdmin, StubOrchestrator};
use std::path::Path;
use tracing::{error, info};

fn admin_for(config: &ConfigDocument) -> Result<StubAdmin> {
    let stub_url = config.stub_url().context("No stub server configured")?;
    StubAdmin::new(stub_url).context("Failed to build stub admin client")
}

/// Run the orchestrator and print the final state
pub async fn handle_stub_up(config: &ConfigDocument, work_dir: &Path) -> Result<()> {
    let admin = admin_for(config)?;
    info!("Bringing stub server at {} to ready", admin.base_url());

    let mut orchestrator =
        StubOrchestrator::new(admin, DockerCli::new(), config.settings().stub.clone())
            .with_work_dir(work_dir);

    match orchestrator.ensure_ready().await {
        Ok(report) => {
            if let Some(container) = &report.launched {
                println!("🐳 Launched container {}", container);
            }
            println!(
                "✅ Stub server {:?} with {} mappings provisioned",
                report.state, report.provisioned
            );
            Ok(())
        }
        Err(e) => {
            println!("❌ {}", e.diagnostic());
            error!("Stub bring-up aborted in state {:?}", orchestrator.state());
            Err(e.into())
        }
    }
}

/// Drop provisioned mappings
pub async fn handle_stub_reset(config: &ConfigDocument) -> Result<()> {
    let admin = admin_for(config)?;
    admin
        .reset_mappings()
        .await
        .context("Failed to reset stub mappings")?;
    println!("✅ Stub mappings reset at {}", admin.base_url());
    Ok(())
}

/// Print the mappings the stub server holds
pub async fn handle_stub_list(config: &ConfigDocument) -> Result<()> {
    let admin = admin_for(config)?;
    let mappings = admin
        .list_mappings()
        .await
        .context("Failed to list stub mappings")?;

    println!("{} mappings at {}", mappings.len(), admin.base_url());
    for mapping in &mappings {
        match &mapping.name {
            Some(name) => println!("  {} ({})", mapping.describe(), name),
            None => println!("  {}", mapping.describe()),
        }
    }
    Ok(())
}
