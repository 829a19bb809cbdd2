//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::Environment;

/// User management HTTP service
#[derive(Parser, Debug)]
#[command(name = "user-api")]
#[command(about = "User management HTTP service backed by PostgreSQL")]
#[command(long_about = "
user-api serves create, read, update, delete and paginated listing of users
over a JSON HTTP API.

EXAMPLES:
    # Start the server with default configuration
    user-api serve

    # Start server on custom host and port
    user-api serve --host 0.0.0.0 --port 8080

    # Use a single configuration file
    user-api --config /etc/user-api/production.toml serve

    # Check configuration without starting the server
    user-api serve --dry-run

    # Apply, preview or roll back migrations
    user-api migrate
    user-api migrate --dry-run
    user-api migrate --rollback 2
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    ///
    /// Loads this single TOML file instead of the layered `config/` directory.
    /// `USERS_*` environment variables still override its values.
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection (otherwise `USERS_APP_ENV`)
    #[arg(short, long, value_enum)]
    pub env: Option<EnvironmentArg>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the web server (default)
    Serve(ServeArgs),
    /// Database migration operations
    Migrate(MigrateArgs),
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ServeArgs {
    /// Host address to bind to
    #[arg(long, value_name = "ADDRESS", value_parser = super::validation::validate_host_address)]
    pub host: Option<String>,

    /// Port number to listen on
    #[arg(short, long, value_name = "PORT", value_parser = super::validation::validate_port)]
    pub port: Option<u16>,

    /// Log level override; wins over --verbose and --quiet
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Validate configuration, print the bind address and exit
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrateArgs {
    /// List pending migrations without applying them
    #[arg(long, conflicts_with = "rollback")]
    pub dry_run: bool,

    /// Revert the most recent STEPS migrations (1-100)
    #[arg(long, value_name = "STEPS", value_parser = super::validation::validate_rollback_steps)]
    pub rollback: Option<u32>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnvironmentArg {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    #[value(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl From<EnvironmentArg> for Environment {
    fn from(env: EnvironmentArg) -> Self {
        match env {
            EnvironmentArg::Development => Environment::Development,
            EnvironmentArg::Test => Environment::Test,
            EnvironmentArg::Staging => Environment::Staging,
            EnvironmentArg::Production => Environment::Production,
        }
    }
}

impl Cli {
    /// The subcommand to run; `serve` with defaults when none is given.
    pub fn command_or_default(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Serve(ServeArgs::default()))
    }
}
