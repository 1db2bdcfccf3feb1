//! CLI argument parsing definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true, default_value = "config/config.yaml")]
    pub config: PathBuf,

    /// Directory holding `<env>.yaml` test data files
    #[arg(long, value_name = "PATH", global = true, default_value = "data")]
    pub data_dir: PathBuf,

    /// Target environment (overrides TEST_ENV)
    #[arg(long = "env", value_name = "NAME", global = true)]
    pub environment: Option<String>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Stub server management
    Stub {
        #[command(subcommand)]
        stub_cmd: StubCommands,
    },

    /// Contract checks of saved response bodies
    Contract {
        #[command(subcommand)]
        contract_cmd: ContractCommands,
    },

    /// Resolve a configured endpoint template
    Endpoint {
        /// Endpoint group, e.g. base_api
        group: String,

        /// Endpoint name within the group
        name: String,

        /// Placeholder value (example: --set user_id=2)
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        values: Vec<(String, String)>,

        /// Prefix the path with the environment base URL
        #[arg(long)]
        absolute: bool,
    },

    /// Run a security scan against the environment base URL
    Scan {
        /// Scanner API key
        #[arg(long, value_name = "KEY", env = "ZAP_API_KEY")]
        api_key: Option<String>,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        config_cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum StubCommands {
    /// Bring the stub server to ready: check Docker, launch if needed, provision mappings
    Up {
        /// Directory the stub volume and mappings file are resolved against
        #[arg(long, value_name = "PATH", default_value = ".")]
        work_dir: PathBuf,
    },

    /// Drop provisioned mappings, restoring the file-backed defaults
    Reset,

    /// List the mappings the stub server currently holds
    List,
}

#[derive(Subcommand)]
pub enum ContractCommands {
    /// Validate a JSON file against a built-in contract
    Check {
        /// Contract name: user, list_users, resource, list_resources
        #[arg(long, value_name = "NAME")]
        schema: String,

        /// JSON file holding the response body
        #[arg(long, value_name = "PATH")]
        file: PathBuf,
    },

    /// List the built-in contracts
    List,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Validate the configuration file and the environment's test data
    Validate,

    /// Print the default harness settings as YAML
    Sample,
}

/// Parse `key=value` pairs for `--set`
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{}'", raw));
    }
    Ok((key.to_string(), value.to_string()))
}
