//! Migrate command handler
//!
//! Handles database migration operations including dry-run and rollback.

use crate::cli::parser::MigrateArgs;
use crate::config::settings::Settings;
use crate::db::{pending_migrations, revert_migrations, run_pending_migrations};
use crate::error::AppResult;

/// Handler for the migrate command
pub struct MigrateCommandHandler {
    config: Settings,
}

impl MigrateCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Apply, list or revert migrations depending on `args`.
    ///
    /// # Errors
    /// - Invalid database configuration
    /// - Database connection or migration errors
    pub async fn execute(&self, args: &MigrateArgs) -> AppResult<()> {
        self.config.database.validate()?;
        let url = &self.config.database.url;

        if args.dry_run {
            let pending = pending_migrations(url).await?;
            if pending.is_empty() {
                println!("✓ No pending migrations found - database is up to date");
            } else {
                println!("Found {} pending migration(s):", pending.len());
                for name in &pending {
                    println!("  - {}", name);
                }
                println!("\nRun without --dry-run to apply these migrations");
            }
            return Ok(());
        }

        if let Some(steps) = args.rollback {
            let reverted = revert_migrations(url, steps).await?;
            tracing::info!(count = reverted.len(), "Migrations reverted");
            println!("✓ Rolled back {} migration(s)", reverted.len());
            for version in &reverted {
                println!("  - {}", version);
            }
            return Ok(());
        }

        let applied = run_pending_migrations(url).await?;
        tracing::info!(count = applied.len(), "Migrations applied");
        if applied.is_empty() {
            println!("✓ No migrations to apply - database is already up to date");
        } else {
            println!("✓ Applied {} migration(s):", applied.len());
            for version in &applied {
                println!("  - {}", version);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[tokio::test]
    async fn test_migrate_rejects_invalid_database_config() {
        let handler = MigrateCommandHandler::new(Settings::default());

        let result = handler.execute(&MigrateArgs::default()).await;
        assert!(matches!(result, Err(AppError::Configuration { ref key, .. }) if key == "database.url"));
    }

    #[tokio::test]
    async fn test_migrate_zero_rollback_steps() {
        let mut config = Settings::default();
        config.database.url = "postgres://localhost/test".to_string();
        let handler = MigrateCommandHandler::new(config);

        let args = MigrateArgs {
            dry_run: false,
            rollback: Some(0),
        };
        let result = handler.execute(&args).await;
        assert!(matches!(result, Err(AppError::Validation { ref field, .. }) if field == "rollback"));
    }
}
