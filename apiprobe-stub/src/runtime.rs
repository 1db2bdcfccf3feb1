//! Container runtime seam

use crate::error::RuntimeError;
use apiprobe_config::StubSettings;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

/// What the orchestrator needs from a container runtime
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Succeeds when the runtime daemon is usable
    async fn info(&self) -> Result<(), RuntimeError>;

    /// Start a detached container, returning its id
    async fn launch(&self, spec: &ContainerSpec) -> Result<String, RuntimeError>;
}

/// How to run the stub server container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
    /// `(host, container)` port pairs
    pub ports: Vec<(u16, u16)>,
    /// `(host directory, mount point)` pairs
    pub volumes: Vec<(PathBuf, String)>,
    /// Remove the container once it stops
    pub remove_on_exit: bool,
}

impl ContainerSpec {
    /// Spec for the stub server; `work_dir` anchors the relative volume directory
    pub fn from_settings(settings: &StubSettings, work_dir: &Path) -> Self {
        Self {
            name: settings.container_name.clone(),
            image: settings.image.clone(),
            ports: vec![(settings.host_port, settings.container_port)],
            volumes: vec![(
                work_dir.join(&settings.volume_dir),
                settings.container_volume.clone(),
            )],
            remove_on_exit: true,
        }
    }

    /// Arguments for a detached `run`
    pub fn run_args(&self) -> Vec<String> {
        let mut args = vec!["run".to_string(), "-d".to_string()];
        if self.remove_on_exit {
            args.push("--rm".to_string());
        }
        args.push("--name".to_string());
        args.push(self.name.clone());
        for (host, container) in &self.ports {
            args.push("-p".to_string());
            args.push(format!("{}:{}", host, container));
        }
        for (host_dir, mount) in &self.volumes {
            args.push("-v".to_string());
            args.push(format!("{}:{}", host_dir.display(), mount));
        }
        args.push(self.image.clone());
        args
    }
}

/// Docker command-line client
#[derive(Debug, Clone)]
pub struct DockerCli {
    program: String,
}

impl Default for DockerCli {
    fn default() -> Self {
        Self {
            program: "docker".to_string(),
        }
    }
}

impl DockerCli {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use another docker-compatible binary, e.g. `podman`
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn run(&self, args: &[String]) -> Result<String, RuntimeError> {
        let command = format!("{} {}", self.program, args.join(" "));
        debug!("Running {}", command);

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .await
            .map_err(|source| RuntimeError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(RuntimeError::CommandFailed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl ContainerRuntime for DockerCli {
    async fn info(&self) -> Result<(), RuntimeError> {
        self.run(&["info".to_string()]).await.map(|_| ())
    }

    async fn launch(&self, spec: &ContainerSpec) -> Result<String, RuntimeError> {
        let id = self.run(&spec.run_args()).await?;
        info!("Started container {} ({})", spec.name, id);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_run_args() {
        let spec = ContainerSpec::from_settings(&StubSettings::default(), Path::new("/work"));
        assert_eq!(
            spec.run_args(),
            vec![
                "run",
                "-d",
                "--rm",
                "--name",
                "wiremock",
                "-p",
                "8080:8080",
                "-v",
                "/work/wiremock:/home/wiremock",
                "wiremock/wiremock",
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let docker = DockerCli::with_program("apiprobe-no-such-container-runtime");
        assert!(matches!(docker.info().await, Err(RuntimeError::Spawn { .. })));
    }
}
