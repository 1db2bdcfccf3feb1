//! Test session bootstrap
//!
//! Loads configuration and test data once, initialises logging, compiles
//! the contract catalog and optionally brings the stub server up. The
//! resulting `TestSession` is passed explicitly to every test.

pub mod builder;
pub mod error;
pub mod session;

pub use builder::SessionBuilder;
pub use error::{SessionError, SessionStage};
pub use session::TestSession;

// Re-exported so suites depend on one crate
pub use apiprobe_config::{ConfigDocument, Placeholders, TestData};
pub use apiprobe_contract::{SchemaCatalog, SchemaName};
pub use apiprobe_http::{ApiClient, ApiResponse, Headers, HttpResponse};
pub use apiprobe_stub::{StubMapping, StubReport};
