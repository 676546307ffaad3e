//! Server module for managing HTTP server lifecycle
//!
//! This module handles server initialization, startup, and graceful shutdown.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;

use crate::api::routes::create_router;
use crate::config::{Environment, settings::Settings};
use crate::db::{MIGRATIONS, establish_async_connection_pool};
use crate::services::notifications::ProviderRegistry;
use crate::services::watcher::{ChangeFeed, GuestWatcher};
use crate::state::AppState;

/// HTTP server manager
pub struct Server {
    settings: Settings,
}

impl Server {
    /// Create a new server with the given settings
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Start the server and run until shutdown signal
    ///
    /// This method:
    /// 1. Logs startup information
    /// 2. Runs pending migrations when `database.auto_migrate` is set
    /// 3. Initializes the database connection pool
    /// 4. Builds the notification provider registry from configuration
    /// 5. Spawns the guest watcher when enabled
    /// 6. Binds to the configured address and serves until shutdown
    ///
    /// # Errors
    /// - Migration and database connection pool errors
    /// - Address binding errors
    /// - Server runtime errors
    pub async fn run(self) -> anyhow::Result<()> {
        tracing::info!(
            app_name = %self.settings.application.name,
            app_version = %crate::pkg_version(),
            environment = %Environment::from_env().as_str(),
            "Application starting"
        );

        tracing::info!(
            host = %self.settings.server.host,
            port = %self.settings.server.port,
            "Server configuration loaded"
        );
        tracing::info!(
            max_connections = %self.settings.database.max_connections,
            connect_timeout_seconds = %self.settings.database.connect_timeout_seconds,
            auto_migrate = %self.settings.database.auto_migrate,
            "Database configuration loaded"
        );

        if self.settings.database.auto_migrate {
            run_pending_migrations(self.settings.database.url.clone()).await?;
        }

        let pool = establish_async_connection_pool(&self.settings.database).await?;
        tracing::info!("Database connection pool initialized");

        let providers = Arc::new(ProviderRegistry::from_settings(&self.settings.providers));
        tracing::info!(
            channels = ?providers.configured_channels(),
            "Notification providers configured"
        );

        let feed = ChangeFeed::new();
        let state = AppState::new(pool, providers, feed.clone());

        let watcher = if self.settings.watcher.enabled {
            Some(GuestWatcher::spawn(
                &feed,
                state.services.notifications.clone(),
                self.settings.watcher.clone(),
            ))
        } else {
            tracing::info!("Guest watcher disabled by configuration");
            None
        };

        let router = create_router(state);

        let address = self.settings.server.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind to address");
            anyhow::anyhow!("Failed to bind to {}: {}", address, e)
        })?;

        tracing::info!(address = %address, "Server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        if let Some(handle) = watcher {
            handle.shutdown().await;
        }

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Applies pending embedded migrations over a blocking connection.
async fn run_pending_migrations(database_url: String) -> anyhow::Result<()> {
    let applied = tokio::task::spawn_blocking(move || {
        use diesel::Connection;
        use diesel::pg::PgConnection;
        use diesel_migrations::MigrationHarness;

        let mut conn = PgConnection::establish(&database_url)
            .map_err(|e| anyhow::anyhow!("Connection error: {}", e))?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| anyhow::anyhow!("Migration error: {}", e))?;
        Ok::<_, anyhow::Error>(applied.len())
    })
    .await??;

    if applied > 0 {
        tracing::info!(count = applied, "Applied pending migrations");
    } else {
        tracing::info!("Database schema is up to date");
    }
    Ok(())
}

/// Waits for a shutdown signal (Ctrl+C or SIGTERM).
///
/// This function returns when either signal is received, allowing
/// the server to perform graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
