//! Serve command handler
//!
//! Handles the serve command including dry-run validation and server startup.

use crate::config::settings::Settings;
use crate::server::Server;

/// Handler for the serve command
pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Start the server, or only report the resolved configuration when
    /// `dry_run` is set.
    pub async fn execute(self, dry_run: bool) -> anyhow::Result<()> {
        if dry_run {
            for line in self.dry_run_report()? {
                println!("{}", line);
            }
            return Ok(());
        }

        Server::new(self.config).run().await
    }

    /// Lines printed by `serve --dry-run`. Nothing here touches the network.
    pub fn dry_run_report(&self) -> anyhow::Result<Vec<String>> {
        self.config.validate()?;
        let pagination = self.config.pagination.clone().into_pagination_config()?;

        Ok(vec![
            "✓ Configuration is valid".to_string(),
            format!("✓ Server would bind to: {}", self.config.server.address()),
            format!("✓ Default page size: {}", pagination.default_limit),
            format!(
                "✓ Migrations on startup: {}",
                if self.config.database.auto_migrate { "enabled" } else { "disabled" }
            ),
        ])
    }
}
