//! Configuration merger for CLI arguments and config files
//!
//! Precedence, lowest to highest: configuration files, `USERS_*` environment
//! variables, CLI flags. Validation runs once, after every override is applied.

use super::parser::{Cli, Commands, ServeArgs};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, settings::Settings};

/// Applies CLI overrides on top of file and environment configuration.
pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Load the unvalidated base configuration the CLI points at.
    ///
    /// `--config` selects a single file; otherwise the layered loader reads
    /// `USERS_CONFIG_DIR` / `USERS_CONFIG_FILE`. `--env` replaces the
    /// environment taken from `USERS_APP_ENV`.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let loader = match cli.config {
            Some(ref path) => ConfigLoader::from_file(path),
            None => ConfigLoader::new()?,
        };
        let loader = match cli.env {
            Some(env) => loader.with_environment(env.into()),
            None => loader,
        };

        Ok(Self::new(loader.load_unvalidated()?))
    }

    /// Merge CLI arguments and validate the result.
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }

        if let Some(Commands::Serve(ref args)) = cli.command {
            apply_serve_overrides(&mut config, args);
        }

        config.validate()?;
        Ok(config)
    }
}

fn apply_serve_overrides(config: &mut Settings, args: &ServeArgs) {
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    // --log-level wins over --verbose / --quiet
    if let Some(level) = args.log_level {
        config.logger.level = level.as_str().to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PaginationSettings;
    use clap::Parser;

    fn valid_base_config() -> Settings {
        let mut config = Settings::default();
        config.database.url = "postgres://localhost/test".to_string();
        config.pagination = PaginationSettings {
            default_limit: Some(10),
        };
        config
    }

    fn merge(args: &[&str]) -> Result<Settings, ConfigError> {
        let cli = Cli::try_parse_from(args).unwrap();
        ConfigurationMerger::new(valid_base_config()).merge_cli_args(&cli)
    }

    #[test]
    fn test_no_flags_keeps_base_config() {
        assert_eq!(merge(&["user-api"]).unwrap(), valid_base_config());
    }

    #[test]
    fn test_verbose_and_quiet_flags() {
        assert_eq!(merge(&["user-api", "--verbose"]).unwrap().logger.level, "debug");
        assert_eq!(merge(&["user-api", "--quiet"]).unwrap().logger.level, "error");
    }

    #[test]
    fn test_serve_host_and_port() {
        let config = merge(&["user-api", "serve", "--host", "0.0.0.0", "--port", "8080"]).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_log_level_overrides_verbose() {
        let config = merge(&["user-api", "--verbose", "serve", "--log-level", "warn"]).unwrap();
        assert_eq!(config.logger.level, "warn");
    }

    #[test]
    fn test_merged_config_is_validated() {
        let cli = Cli::try_parse_from(["user-api"]).unwrap();
        let mut base = valid_base_config();
        base.pagination.default_limit = None;

        let result = ConfigurationMerger::new(base).merge_cli_args(&cli);
        assert!(matches!(
            result,
            Err(ConfigError::ValidationError { ref field, .. }) if field == "pagination.default_limit"
        ));
    }
}
