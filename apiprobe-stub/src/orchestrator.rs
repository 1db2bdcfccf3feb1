//! Stub server lifecycle state machine
//!
//! `Unchecked -> ContainerRuntimeVerified -> ServerReachable ->
//! MappingsProvisioned -> Ready`, or `Aborted` from any stage.

use crate::admin::StubAdmin;
use crate::error::{SetupError, SetupStage};
use crate::mapping::{load_mappings, StubMapping};
use crate::runtime::{ContainerRuntime, ContainerSpec};
use apiprobe_config::StubSettings;
use apiprobe_resilience::{RetryExecutor, RetryPolicy, Retryable};
use std::fmt;
use std::path::PathBuf;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubState {
    Unchecked,
    ContainerRuntimeVerified,
    ServerReachable,
    MappingsProvisioned,
    Ready,
    Aborted(SetupStage),
}

/// Where the mappings to provision come from
#[derive(Debug, Clone)]
pub enum MappingSource {
    Predefined(Vec<StubMapping>),
    /// JSON file, relative paths resolved against the working directory
    File(PathBuf),
}

/// Outcome of a successful bring-up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubReport {
    pub state: StubState,
    /// Container id when a container had to be launched
    pub launched: Option<String>,
    pub provisioned: usize,
}

#[derive(Debug)]
struct NotReachable(String);

impl fmt::Display for NotReachable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stub server at {} is not answering", self.0)
    }
}

impl Retryable for NotReachable {
    fn is_retryable(&self) -> bool {
        true
    }
}

/// Ensures the stub server is running and provisioned
pub struct StubOrchestrator<R: ContainerRuntime> {
    admin: StubAdmin,
    runtime: R,
    settings: StubSettings,
    source: MappingSource,
    work_dir: PathBuf,
    state: StubState,
}

impl<R: ContainerRuntime> StubOrchestrator<R> {
    /// Mappings are read from `settings.mappings_file` unless replaced
    pub fn new(admin: StubAdmin, runtime: R, settings: StubSettings) -> Self {
        let source = MappingSource::File(PathBuf::from(&settings.mappings_file));
        Self {
            admin,
            runtime,
            settings,
            source,
            work_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            state: StubState::Unchecked,
        }
    }

    pub fn with_mappings(mut self, source: MappingSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = work_dir.into();
        self
    }

    pub fn state(&self) -> StubState {
        self.state
    }

    pub fn admin(&self) -> &StubAdmin {
        &self.admin
    }

    /// Drive the state machine to `Ready`
    ///
    /// Any failure moves to `Aborted` and is reported with the stage that
    /// failed. Nothing is torn down afterwards.
    pub async fn ensure_ready(&mut self) -> Result<StubReport, SetupError> {
        match self.run().await {
            Ok(report) => Ok(report),
            Err(e) => {
                self.state = StubState::Aborted(e.stage);
                error!("{}", e.diagnostic());
                Err(e)
            }
        }
    }

    async fn run(&mut self) -> Result<StubReport, SetupError> {
        self.runtime
            .info()
            .await
            .map_err(|e| SetupError::new(SetupStage::ContainerRuntime, e.to_string()))?;
        self.state = StubState::ContainerRuntimeVerified;

        let launched = self.ensure_reachable().await?;
        self.state = StubState::ServerReachable;

        let provisioned = self.provision().await?;
        self.state = StubState::MappingsProvisioned;

        self.state = StubState::Ready;
        info!(
            "Stub server at {} ready with {} mappings",
            self.admin.base_url(),
            provisioned
        );

        Ok(StubReport {
            state: self.state,
            launched,
            provisioned,
        })
    }

    async fn ensure_reachable(&self) -> Result<Option<String>, SetupError> {
        if self.admin.is_reachable().await {
            info!("Stub server already running at {}", self.admin.base_url());
            return Ok(None);
        }

        warn!("Stub server not running, launching a container");
        let spec = ContainerSpec::from_settings(&self.settings, &self.work_dir);
        let container_id = self
            .runtime
            .launch(&spec)
            .await
            .map_err(|e| SetupError::new(SetupStage::Reachability, e.to_string()))?;

        tokio::time::sleep(self.settings.startup_grace).await;

        let policy = RetryPolicy::fixed(
            self.settings.readiness_attempts,
            self.settings.readiness_interval,
        );
        info!(
            "Waiting up to {:?} for {} to answer",
            policy.total_wait(),
            self.admin.base_url()
        );
        let admin = &self.admin;
        RetryExecutor::new(policy)
            .execute(|| async move {
                if admin.is_reachable().await {
                    Ok(())
                } else {
                    Err(NotReachable(admin.base_url().to_string()))
                }
            })
            .await
            .map_err(|e| {
                SetupError::new(
                    SetupStage::Reachability,
                    format!("stub server did not start in time: {}", e),
                )
            })?;

        Ok(Some(container_id))
    }

    async fn provision(&self) -> Result<usize, SetupError> {
        let mappings = match &self.source {
            MappingSource::Predefined(mappings) => mappings.clone(),
            MappingSource::File(path) => load_mappings(self.work_dir.join(path))
                .map_err(|e| SetupError::new(SetupStage::Provisioning, e.to_string()))?,
        };

        if self.settings.reset_before_provision {
            self.admin
                .reset_mappings()
                .await
                .map_err(|e| SetupError::new(SetupStage::Provisioning, e.to_string()))?;
        }

        for mapping in &mappings {
            self.admin
                .register(mapping)
                .await
                .map_err(|e| SetupError::new(SetupStage::Provisioning, e.to_string()))?;
        }

        Ok(mappings.len())
    }
}
