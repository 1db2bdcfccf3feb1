//! Stub server (WireMock) orchestration settings

use crate::error::ConfigResult;
use crate::validation::{validate_port_range, validate_positive, validate_required_string, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the stub server container is launched and provisioned
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StubSettings {
    /// Container name used for `docker run --name`
    pub container_name: String,

    /// Image to launch
    pub image: String,

    /// Host side of the published admin port
    pub host_port: u16,

    /// Container side of the published admin port
    pub container_port: u16,

    /// Host directory with stub definitions, relative to the working directory
    pub volume_dir: String,

    /// Mount point of `volume_dir` inside the container
    pub container_volume: String,

    /// JSON file holding the list of mappings to provision
    pub mappings_file: String,

    /// Pause after launching the container, before polling
    #[serde(with = "crate::domains::utils::serde_duration")]
    pub startup_grace: Duration,

    /// Readiness poll attempts after a launch
    pub readiness_attempts: u32,

    /// Fixed pause between readiness polls
    #[serde(with = "crate::domains::utils::serde_duration")]
    pub readiness_interval: Duration,

    /// Reset the server's mappings before provisioning
    #[serde(default = "crate::domains::utils::default_true")]
    pub reset_before_provision: bool,
}

impl Default for StubSettings {
    fn default() -> Self {
        Self {
            container_name: "wiremock".to_string(),
            image: "wiremock/wiremock".to_string(),
            host_port: 8080,
            container_port: 8080,
            volume_dir: "wiremock".to_string(),
            container_volume: "/home/wiremock".to_string(),
            mappings_file: "mocks/wiremock_stubs.json".to_string(),
            startup_grace: Duration::from_secs(5),
            readiness_attempts: 10,
            readiness_interval: Duration::from_secs(1),
            reset_before_provision: true,
        }
    }
}

impl Validatable for StubSettings {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.container_name, "container_name", self.domain_name())?;
        validate_required_string(&self.image, "image", self.domain_name())?;
        validate_required_string(&self.container_volume, "container_volume", self.domain_name())?;
        validate_required_string(&self.mappings_file, "mappings_file", self.domain_name())?;
        validate_port_range(self.host_port, "host_port", self.domain_name())?;
        validate_port_range(self.container_port, "container_port", self.domain_name())?;
        validate_positive(self.readiness_attempts, "readiness_attempts", self.domain_name())?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "stub"
    }
}
