//! Stub server orchestration for apiprobe
//!
//! Brings a WireMock-compatible stub server to a ready state once per
//! session: verify the container runtime, make sure the server answers
//! (launching a container if needed), then provision request/response
//! mappings. The server is never torn down.

pub mod admin;
pub mod error;
pub mod mapping;
pub mod orchestrator;
pub mod runtime;

pub use admin::StubAdmin;
pub use error::{RuntimeError, SetupError, SetupStage, StubError};
pub use mapping::{load_mappings, RequestPattern, ResponseDefinition, StubMapping};
pub use orchestrator::{MappingSource, StubOrchestrator, StubReport, StubState};
pub use runtime::{ContainerRuntime, ContainerSpec, DockerCli};
