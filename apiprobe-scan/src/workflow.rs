//! End-to-end security scan of the API under test

use crate::alert::AlertSummary;
use crate::client::ZapClient;
use crate::error::ScanError;
use apiprobe_config::ScannerSettings;
use apiprobe_resilience::{RetryError, RetryExecutor, RetryPolicy, Retryable};
use std::fmt;
use std::path::PathBuf;
use tracing::{info, warn};

/// Result of a completed scan
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub scan_id: String,
    pub alerts: AlertSummary,
    pub report_path: PathBuf,
}

/// Poll result that keeps the retry loop going while the scan runs
#[derive(Debug)]
enum Poll {
    Running(u8),
    Failed(ScanError),
}

impl fmt::Display for Poll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Poll::Running(progress) => write!(f, "scan at {}%", progress),
            Poll::Failed(e) => write!(f, "{}", e),
        }
    }
}

impl Retryable for Poll {
    fn is_retryable(&self) -> bool {
        matches!(self, Poll::Running(_))
    }
}

/// Scan workflow: check, seed, scan, poll, collect
pub struct SecurityScan {
    client: ZapClient,
    target: String,
    settings: ScannerSettings,
}

impl SecurityScan {
    pub fn new(client: ZapClient, target: impl Into<String>, settings: ScannerSettings) -> Self {
        Self {
            client,
            target: target.into(),
            settings,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Fails with `ScanError::Unavailable` when the scanner does not answer
    pub async fn ensure_available(&self) -> Result<String, ScanError> {
        let version = self
            .client
            .version()
            .await
            .map_err(|e| ScanError::Unavailable {
                url: self.client.base_url().to_string(),
                message: e.to_string(),
            })?;
        info!("Security scanner version {}", version);
        Ok(version)
    }

    /// Push every configured API path through the scanner
    pub async fn seed(&self) -> Result<usize, ScanError> {
        for path in &self.settings.seed_paths {
            let url = format!("{}{}", self.target, path);
            info!("Seeding {}", url);
            self.client.access_url(&url).await?;
        }
        Ok(self.settings.seed_paths.len())
    }

    /// Run the whole workflow and write the HTML report
    pub async fn run(&self) -> Result<ScanOutcome, ScanError> {
        info!("Starting security scan of {}", self.target);
        self.ensure_available().await?;
        self.seed().await?;

        if self.settings.spider_first {
            let spider_id = self.client.spider_scan(&self.target).await?;
            self.wait_for(|| self.client.spider_status(&spider_id)).await?;
        }

        let scan_id = self.client.active_scan(&self.target).await?;
        self.wait_for(|| self.client.active_scan_status(&scan_id)).await?;
        info!("Active scan {} completed", scan_id);

        let alerts = AlertSummary::new(self.client.alerts(&self.target).await?);
        info!(
            "Total security alerts: {} (high: {}, medium: {})",
            alerts.total(),
            alerts.high_risk().len(),
            alerts.medium_risk().len()
        );
        for alert in alerts.high_risk() {
            warn!(
                "{} - {} at {}. Solution: {}",
                alert.alert, alert.risk, alert.url, alert.solution
            );
        }

        let report_path = self.write_report().await?;

        Ok(ScanOutcome {
            scan_id,
            alerts,
            report_path,
        })
    }

    /// Fetch the HTML report and save it to the configured path
    pub async fn write_report(&self) -> Result<PathBuf, ScanError> {
        let report = self.client.html_report().await?;
        let path = PathBuf::from(&self.settings.report_path);
        tokio::fs::write(&path, report)
            .await
            .map_err(|source| ScanError::Report {
                path: path.clone(),
                source,
            })?;
        info!("Security report saved as {}", path.display());
        Ok(path)
    }

    /// Poll a percent-complete status at a fixed interval until it reaches 100
    async fn wait_for<F, Fut>(&self, mut status: F) -> Result<(), ScanError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<u8, ScanError>>,
    {
        let policy = RetryPolicy::fixed(self.settings.max_polls, self.settings.poll_interval);

        RetryExecutor::new(policy)
            .execute(|| {
                let poll = status();
                async move {
                    match poll.await {
                        Ok(progress) if progress >= 100 => Ok(()),
                        Ok(progress) => {
                            info!("Scan progress: {}%", progress);
                            Err(Poll::Running(progress))
                        }
                        Err(e) => Err(Poll::Failed(e)),
                    }
                }
            })
            .await
            .map_err(|e| match e {
                RetryError::Exhausted {
                    attempts,
                    last_error: Poll::Running(progress),
                } => ScanError::Timeout {
                    polls: attempts,
                    progress,
                },
                RetryError::Aborted {
                    attempt,
                    error: Poll::Running(progress),
                } => ScanError::Timeout {
                    polls: attempt,
                    progress,
                },
                RetryError::Exhausted {
                    last_error: Poll::Failed(e),
                    ..
                }
                | RetryError::Aborted {
                    error: Poll::Failed(e),
                    ..
                } => e,
            })
    }
}
