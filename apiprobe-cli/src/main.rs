use anyhow::{Context, Result};
use apiprobe_config::{ConfigDocument, ConfigLoader, LogLevel};
use apiprobe_logging::init_logging_from_config;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands, ConfigCommands, ContractCommands, StubCommands};
use commands::{config, contract, endpoint, scan, stub};

/// Load the configuration document for the selected environment
fn load_config(config_path: &Path, environment: Option<&str>) -> Result<ConfigDocument> {
    let mut loader = ConfigLoader::new();
    if let Some(environment) = environment {
        loader = loader.with_environment(environment);
    }

    debug!("Loading configuration from: {:?}", config_path);
    loader
        .from_file(config_path)
        .context(format!("Failed to load configuration from {:?}", config_path))
}

/// Initialize tracing from the `logging` section, with `--log-level` taking precedence
fn init_logging(config: &ConfigDocument, log_level: Option<&str>) -> Result<()> {
    let mut logging = config.settings().logging.clone();
    if let Some(level) = log_level {
        logging.level = LogLevel::from_str(level).map_err(anyhow::Error::msg)?;
    }
    init_logging_from_config(&logging)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let Some(command) = &cli.command else {
        // If no subcommand is provided, print help
        use clap::CommandFactory;
        let mut cmd = Cli::command();
        cmd.print_help().context("Failed to print help")?;
        println!();
        return Ok(());
    };

    match command {
        // These work without a configuration document
        Commands::Contract { contract_cmd } => {
            apiprobe_logging::init_simple_tracing(cli.log_level.as_deref().unwrap_or("warn"))?;
            run_contract(contract_cmd)
        }
        Commands::Config {
            config_cmd: ConfigCommands::Sample,
        } => config::handle_config_sample(),
        command => run_configured(&cli, command).await,
    }
}

async fn run_configured(cli: &Cli, command: &Commands) -> Result<()> {
    let config = load_config(&cli.config, cli.environment.as_deref())?;
    init_logging(&config, cli.log_level.as_deref())?;
    info!("apiprobe starting for environment '{}'", config.environment());

    match command {
        Commands::Stub { stub_cmd } => match stub_cmd {
            StubCommands::Up { work_dir } => stub::handle_stub_up(&config, work_dir).await,
            StubCommands::Reset => stub::handle_stub_reset(&config).await,
            StubCommands::List => stub::handle_stub_list(&config).await,
        },
        Commands::Endpoint {
            group,
            name,
            values,
            absolute,
        } => endpoint::handle_endpoint(&config, group, name, values, *absolute),
        Commands::Scan { api_key } => scan::handle_scan(&config, api_key.as_deref()).await,
        Commands::Config { config_cmd } => match config_cmd {
            ConfigCommands::Validate => config::handle_config_validate(&config, &cli.data_dir),
            ConfigCommands::Sample => config::handle_config_sample(),
        },
        Commands::Contract { contract_cmd } => run_contract(contract_cmd),
    }
}

fn run_contract(command: &ContractCommands) -> Result<()> {
    match command {
        ContractCommands::Check { schema, file } => contract::handle_contract_check(schema, file),
        ContractCommands::List => contract::handle_contract_list(),
    }
}
