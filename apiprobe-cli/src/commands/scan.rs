//! `apiprobe scan` handler

use anyhow::{bail, Context, Result};
use apiprobe_config::ConfigDocument;
use apiprobe_scan::{SecurityScan, ZapClient};
use tracing::warn;

/// Scan the environment base URL; fails when high-risk alerts are raised
pub async fn handle_scan(config: &ConfigDocument, api_key: Option<&str>) -> Result<()> {
    let target = config.get_base_url(None)?;

    let mut client = ZapClient::new(config.zap_url()).context("Failed to build scanner client")?;
    if let Some(key) = api_key {
        client = client.with_api_key(key);
    }

    let scan = SecurityScan::new(client, target, config.settings().scanner.clone());
    println!("🔒 Scanning {}", scan.target());
    let outcome = scan.run().await?;

    println!(
        "Scan {} finished: {} alerts ({} high, {} medium)",
        outcome.scan_id,
        outcome.alerts.total(),
        outcome.alerts.high_risk().len(),
        outcome.alerts.medium_risk().len()
    );
    println!("Report written to {}", outcome.report_path.display());

    if outcome.alerts.has_high_risk() {
        for alert in outcome.alerts.high_risk() {
            warn!("High risk: {} at {}", alert.alert, alert.url);
            println!("❌ {} ({})", alert.alert, alert.url);
        }
        bail!(
            "{} high-risk alerts raised against {}",
            outcome.alerts.high_risk().len(),
            scan.target()
        );
    }

    println!("✅ No high-risk alerts");
    Ok(())
}
