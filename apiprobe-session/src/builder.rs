//! Session builder

use crate::error::{SessionError, SessionStage};
use crate::session::TestSession;
use apiprobe_config::{ConfigLoader, TestData, DEFAULT_CONFIG_PATH};
use apiprobe_config::data::DEFAULT_DATA_DIR;
use apiprobe_contract::SchemaCatalog;
use apiprobe_logging::init_logging_from_config;
use apiprobe_stub::{
    ContainerRuntime, DockerCli, MappingSource, StubAdmin, StubMapping, StubOrchestrator,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Configures and starts a `TestSession`
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    config_path: PathBuf,
    data_dir: PathBuf,
    environment: Option<String>,
    stub: bool,
    mappings: Option<Vec<StubMapping>>,
    work_dir: Option<PathBuf>,
    init_logging: bool,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            environment: None,
            stub: false,
            mappings: None,
            work_dir: None,
            init_logging: true,
        }
    }
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = path.into();
        self
    }

    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Override `TEST_ENV`
    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Bring the stub server to ready during start
    pub fn with_stub(mut self, enabled: bool) -> Self {
        self.stub = enabled;
        self
    }

    /// Provision these mappings instead of the configured mappings file
    pub fn with_mappings(mut self, mappings: Vec<StubMapping>) -> Self {
        self.mappings = Some(mappings);
        self
    }

    /// Directory the stub volume and mappings file are resolved against
    pub fn work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    /// Install a tracing subscriber from the `logging` section (on by default)
    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.init_logging = enabled;
        self
    }

    /// Start the session using the Docker CLI for the stub server
    pub async fn start(self) -> Result<TestSession, SessionError> {
        self.start_with_runtime(DockerCli::new()).await
    }

    /// Start the session with a specific container runtime
    pub async fn start_with_runtime<R: ContainerRuntime>(
        self,
        runtime: R,
    ) -> Result<TestSession, SessionError> {
        let result = self.bootstrap(runtime).await;
        if let Err(e) = &result {
            e.report().log();
        }
        result
    }

    async fn bootstrap<R: ContainerRuntime>(self, runtime: R) -> Result<TestSession, SessionError> {
        let mut loader = ConfigLoader::new();
        if let Some(environment) = &self.environment {
            loader = loader.with_environment(environment.clone());
        }
        let config = loader
            .load(Some(&self.config_path))
            .map_err(|e| SessionError::new(SessionStage::Config, e))?;

        if self.init_logging {
            init_logging_from_config(&config.settings().logging)
                .map_err(|e| SessionError::new(SessionStage::Config, e))?;
        }

        let environment = config.environment().to_string();
        info!("Starting test session for environment '{}'", environment);

        let data = TestData::load(&self.data_dir, Some(&environment))
            .map_err(|e| SessionError::new(SessionStage::Data, e))?;

        let base_url = config
            .get_base_url(None)
            .map_err(|e| SessionError::new(SessionStage::BaseUrl, e))?;

        let schemas =
            SchemaCatalog::load().map_err(|e| SessionError::new(SessionStage::Schemas, e))?;

        let stub = if self.stub {
            let stub_url = config
                .stub_url()
                .map_err(|e| SessionError::new(SessionStage::Config, e))?;
            let admin =
                StubAdmin::new(stub_url).map_err(|e| SessionError::new(SessionStage::Config, e))?;

            let mut orchestrator =
                StubOrchestrator::new(admin, runtime, config.settings().stub.clone());
            if let Some(mappings) = self.mappings {
                orchestrator = orchestrator.with_mappings(MappingSource::Predefined(mappings));
            }
            if let Some(work_dir) = self.work_dir {
                orchestrator = orchestrator.with_work_dir(work_dir);
            }

            Some(orchestrator.ensure_ready().await?)
        } else {
            None
        };

        info!("Test session ready against {}", base_url);
        Ok(TestSession::new(
            Arc::new(config),
            Arc::new(data),
            Arc::new(schemas),
            environment,
            base_url,
            stub,
        ))
    }
}
