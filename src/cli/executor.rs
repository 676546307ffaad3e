//! Dispatches a parsed command to its handler.
//!
//! The actual server start is deliberately absent here; `main.rs` owns it
//! so the handlers stay testable without binding sockets.

use super::handlers::{MigrateCommandHandler, ServeCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::settings::Settings;
use crate::error::{AppError, AppResult};

/// Runs the command carried by `cli` against the merged settings.
///
/// `serve` without `--dry-run` (and a bare invocation) return `Ok(())`
/// immediately and leave the server start to the caller.
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<()> {
    cli.validate().map_err(|reason| AppError::Validation {
        field: "cli_arguments".to_string(),
        reason,
    })?;

    match &cli.command {
        Some(Commands::Serve { dry_run: true, .. }) => {
            ServeCommandHandler::new(settings).execute(true).await
        }
        Some(Commands::Serve { .. }) | None => Ok(()),
        Some(Commands::Migrate { dry_run, rollback }) => {
            MigrateCommandHandler::new(settings)
                .execute(*dry_run, *rollback)
                .await
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn valid_config() -> Settings {
        let mut config = Settings::default();
        config.database.url = "postgres://localhost/rsvp_test".to_string();
        config
    }

    #[tokio::test]
    async fn test_serve_dry_run_validates_and_returns() {
        let cli = Cli::try_parse_from(["rsvp-relay", "serve", "--dry-run"]).unwrap();
        assert!(execute_command(&cli, valid_config()).await.is_ok());
    }

    #[tokio::test]
    async fn test_plain_serve_defers_to_caller() {
        let cli = Cli::try_parse_from(["rsvp-relay", "serve"]).unwrap();
        assert!(execute_command(&cli, valid_config()).await.is_ok());
    }

    #[tokio::test]
    async fn test_bare_invocation_defers_to_caller() {
        let cli = Cli::try_parse_from(["rsvp-relay"]).unwrap();
        assert!(execute_command(&cli, valid_config()).await.is_ok());
    }

    #[tokio::test]
    async fn test_conflicting_migrate_flags_rejected() {
        // clap already blocks this combination on the command line; a
        // directly built Cli must still be caught.
        let cli = Cli {
            command: Some(Commands::Migrate {
                dry_run: true,
                rollback: Some(5),
            }),
            config: None,
            env: None,
            verbose: false,
            quiet: false,
        };
        let result = execute_command(&cli, valid_config()).await;
        assert!(matches!(
            result,
            Err(AppError::Validation { ref field, .. }) if field == "cli_arguments"
        ));
    }
}
