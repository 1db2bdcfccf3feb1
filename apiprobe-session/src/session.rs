//! Session-scoped, read-only test context

use apiprobe_config::{ConfigDocument, ConfigResult, Placeholders, TestData};
use apiprobe_contract::{ContractResult, SchemaCatalog, SchemaName};
use apiprobe_http::{ApiClient, HttpError};
use apiprobe_scan::{ScanError, SecurityScan, ZapClient};
use apiprobe_stub::StubReport;
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Everything a test needs, loaded once per run
#[derive(Debug, Clone)]
pub struct TestSession {
    config: Arc<ConfigDocument>,
    data: Arc<TestData>,
    schemas: Arc<SchemaCatalog>,
    environment: String,
    base_url: String,
    stub: Option<StubReport>,
}

impl TestSession {
    pub(crate) fn new(
        config: Arc<ConfigDocument>,
        data: Arc<TestData>,
        schemas: Arc<SchemaCatalog>,
        environment: String,
        base_url: String,
        stub: Option<StubReport>,
    ) -> Self {
        Self {
            config,
            data,
            schemas,
            environment,
            base_url,
            stub,
        }
    }

    pub fn config(&self) -> &ConfigDocument {
        &self.config
    }

    pub fn data(&self) -> &TestData {
        &self.data
    }

    pub fn schemas(&self) -> &SchemaCatalog {
        &self.schemas
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Bring-up report when the stub server was started with the session
    pub fn stub_report(&self) -> Option<&StubReport> {
        self.stub.as_ref()
    }

    /// Client against the API under test, authenticated from configuration
    pub async fn api_client(&self) -> Result<ApiClient, HttpError> {
        ApiClient::from_config(&self.base_url, &self.config).await
    }

    /// Unauthenticated client against the stub server
    pub fn stub_client(&self) -> Result<ApiClient, HttpError> {
        ApiClient::with_token(self.config.stub_url()?, None)
    }

    /// Resolve a `base_api` endpoint
    pub fn endpoint(&self, name: &str, placeholders: &Placeholders) -> ConfigResult<String> {
        self.config.get_api_endpoint(name, placeholders)
    }

    /// Inject defaults and validate against a built-in contract
    pub fn validate(&self, schema: SchemaName, instance: &mut JsonValue) -> ContractResult<()> {
        self.schemas.validate(schema, instance)
    }

    /// Security scan of the API under test using the `scanner` settings
    pub fn security_scan(&self) -> Result<SecurityScan, ScanError> {
        let client = ZapClient::new(self.config.zap_url())?;
        Ok(SecurityScan::new(
            client,
            self.base_url.clone(),
            self.config.settings().scanner.clone(),
        ))
    }
}
