//! Migrate command handler.
//!
//! Applies, previews or reverts the embedded schema migrations over a
//! plain blocking connection; the async pool exists only for the server.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::MigrationHarness;

use crate::config::settings::Settings;
use crate::db::MIGRATIONS;
use crate::error::{AppError, AppResult};

/// Handler for the migrate command
pub struct MigrateCommandHandler {
    config: Settings,
}

impl MigrateCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Runs the migrate command. `--dry-run` lists pending migrations,
    /// `--rollback N` reverts the last N, the default applies everything
    /// pending.
    pub async fn execute(&self, dry_run: bool, rollback: Option<u32>) -> AppResult<()> {
        self.config.database.validate()?;

        if dry_run {
            return self.preview().await;
        }
        match rollback {
            Some(steps) => self.rollback(steps).await,
            None => self.apply().await,
        }
    }

    async fn preview(&self) -> AppResult<()> {
        let pending = self
            .on_blocking_connection("list pending migrations", |conn| {
                let migrations = conn
                    .pending_migrations(MIGRATIONS)
                    .map_err(|e| migration_error("list pending migrations", e))?;
                Ok(migrations
                    .iter()
                    .map(|m| m.name().to_string())
                    .collect::<Vec<_>>())
            })
            .await?;

        if pending.is_empty() {
            println!("Database schema is up to date");
        } else {
            println!("{} pending migration(s):", pending.len());
            for name in &pending {
                println!("  {}", name);
            }
            println!("Run `rsvp-relay migrate` to apply them");
        }
        Ok(())
    }

    async fn apply(&self) -> AppResult<()> {
        let applied = self
            .on_blocking_connection("run migrations", |conn| {
                let versions = conn
                    .run_pending_migrations(MIGRATIONS)
                    .map_err(|e| migration_error("run migrations", e))?;
                Ok(versions
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>())
            })
            .await?;

        if applied.is_empty() {
            println!("Database schema is up to date");
        } else {
            for version in &applied {
                println!("Applied {}", version);
            }
        }
        Ok(())
    }

    async fn rollback(&self, steps: u32) -> AppResult<()> {
        // The CLI parser enforces the range; this guards direct callers.
        if steps == 0 {
            return Err(AppError::Validation {
                field: "rollback_steps".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        let reverted = self
            .on_blocking_connection("revert migrations", move |conn| {
                let mut reverted = Vec::new();
                for _ in 0..steps {
                    let version = conn
                        .revert_last_migration(MIGRATIONS)
                        .map_err(|e| migration_error("revert migrations", e))?;
                    reverted.push(version.to_string());
                }
                Ok(reverted)
            })
            .await?;

        for version in &reverted {
            println!("Reverted {}", version);
        }
        Ok(())
    }

    /// Opens a blocking connection off the async runtime and hands it to
    /// `work`.
    async fn on_blocking_connection<T, F>(&self, operation: &'static str, work: F) -> AppResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> AppResult<T> + Send + 'static,
    {
        let url = self.config.database.url.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = PgConnection::establish(&url).map_err(|e| AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::new(e),
            })?;
            work(&mut conn)
        })
        .await
        .map_err(|e| AppError::Internal {
            source: anyhow::Error::from(e),
        })?
    }
}

fn migration_error(operation: &str, e: Box<dyn std::error::Error + Send + Sync>) -> AppError {
    AppError::Database {
        operation: operation.to_string(),
        source: anyhow::anyhow!(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Settings {
        let mut config = Settings::default();
        config.database.url = "postgres://localhost/rsvp_test".to_string();
        config
    }

    #[tokio::test]
    async fn test_zero_rollback_steps_rejected() {
        let handler = MigrateCommandHandler::new(valid_config());
        match handler.execute(false, Some(0)).await {
            Err(AppError::Validation { field, reason }) => {
                assert_eq!(field, "rollback_steps");
                assert!(reason.contains("greater than 0"));
            }
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_bad_database_url_rejected_before_connecting() {
        let mut config = Settings::default();
        config.database.url = "mysql://localhost/rsvp".to_string();
        let handler = MigrateCommandHandler::new(config);
        assert!(handler.execute(true, None).await.is_err());
    }
}
