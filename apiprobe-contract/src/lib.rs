//! Contract validation for apiprobe
//!
//! Responses are checked against Draft 7 JSON Schemas in two stages:
//! absent properties that declare a `default` are filled in first, then
//! the structural check runs with format assertion on. The `uri` format
//! accepts any RFC 6570 URI Template.

pub mod catalog;
pub mod defaults;
pub mod error;
pub mod uri_template;
pub mod validator;

pub use catalog::{SchemaCatalog, SchemaName};
pub use defaults::inject_defaults;
pub use error::{ContractError, ContractResult, Violation};
pub use uri_template::is_uri_template;
pub use validator::{load_schema_file, ContractValidator};
