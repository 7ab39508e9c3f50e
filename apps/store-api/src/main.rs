//! # Store API
//!
//! HTTP server for the store service.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Store API Server                                 │
//! │                                                                         │
//! │  init tracing ─► load config ─► connect pool ─► migrations ─► serve     │
//! │                                                                 │       │
//! │  SIGINT / SIGTERM ─► stop accepting ─► drain (GRACEFUL_TIMEOUT) ◄┘      │
//! │                                           │                             │
//! │                                           ▼                             │
//! │                                      close pool                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::future::IntoFuture;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use store_api::{app, AppState, StoreConfig};
use store_db::migrations::migration_status;
use store_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Config first so LOG_LEVEL / LOG_JSON shape the subscriber
    let config = StoreConfig::load().context("Failed to load configuration")?;

    init_tracing(&config);

    info!("Starting Store API server...");
    info!(
        addr = %config.http_addr,
        max_conns = config.postgres_max_conns,
        request_timeout_secs = config.request_timeout.as_secs(),
        "Configuration loaded"
    );

    // Connect to database
    let db_config = DbConfig::new(config.postgres_dsn.clone())
        .max_connections(config.postgres_max_conns)
        .run_migrations(config.run_migrations);

    let db = Database::new(db_config)
        .await
        .context("Failed to connect to PostgreSQL")?;
    info!("Connected to PostgreSQL");

    match migration_status(db.pool()).await {
        Ok((total, applied)) => info!(total, applied, "Migration status"),
        Err(e) => warn!(error = %e, "Could not read migration status"),
    }

    let listener = TcpListener::bind(&config.http_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.http_addr))?;
    info!(addr = %config.http_addr, "Starting HTTP server");

    let graceful_timeout = config.graceful_timeout;
    let router = app(AppState::new(db.clone(), config));

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        let _ = shutdown_rx.changed().await;
    });
    let mut server = tokio::spawn(server.into_future());

    tokio::select! {
        result = &mut server => {
            result??;
        }
        _ = shutdown_signal() => {
            let _ = shutdown_tx.send(true);

            match tokio::time::timeout(graceful_timeout, &mut server).await {
                Ok(result) => result??,
                Err(_) => {
                    warn!(
                        timeout_secs = graceful_timeout.as_secs(),
                        "Graceful shutdown timed out, dropping in-flight requests"
                    );
                    server.abort();
                }
            }
        }
    }

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `LOG_LEVEL` with sqlx kept at warn.
fn init_tracing(config: &StoreConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},sqlx=warn", config.log_level)));

    if config.log_json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
