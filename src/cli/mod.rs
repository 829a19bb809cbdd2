//! CLI module for user-api
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing with clap
//! - Configuration merging (CLI args + config files)
//! - Command handlers for serve and migrate operations

pub mod config_merger;
pub mod handlers;
pub mod parser;
pub mod validation;

pub use config_merger::ConfigurationMerger;
pub use parser::{Cli, Commands, EnvironmentArg, LogLevel, MigrateArgs, ServeArgs};

use anyhow::Context;

use crate::config::settings::Settings;
use crate::logger::init_logger;
use handlers::{MigrateCommandHandler, ServeCommandHandler};

/// Resolve configuration, install the logger and run the selected command.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = load_and_merge_config(&cli)?;
    init_logger_from_settings(&settings)?;

    match cli.command_or_default() {
        Commands::Serve(args) => ServeCommandHandler::new(settings).execute(args.dry_run).await,
        Commands::Migrate(args) => {
            MigrateCommandHandler::new(settings).execute(&args).await?;
            Ok(())
        }
    }
}

/// Load configuration files, apply CLI overrides and validate.
pub fn load_and_merge_config(cli: &Cli) -> anyhow::Result<Settings> {
    let merger = ConfigurationMerger::from_cli(cli).context("Configuration error")?;
    merger
        .merge_cli_args(cli)
        .context("Configuration merge error")
}

pub fn init_logger_from_settings(settings: &Settings) -> anyhow::Result<()> {
    let logger_config = settings
        .logger
        .clone()
        .into_logger_config()
        .context("Logger configuration error")?;

    init_logger(logger_config).context("Logger initialization error")
}
