//! Application entry point and server initialization
//!
//! This module contains the main function that:
//! - Loads environment configuration
//! - Initializes the database
//! - Starts the HTTP server with graceful shutdown support

use std::process::ExitCode;

use dotenvy::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use adpulse::config::Config;
use adpulse::database::{init_db, AppState};
use adpulse::route::create_app;

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file if it exists
    dotenv().ok();

    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .init();

    let db = match init_db(&config.database_url) {
        Ok(db) => db,
        Err(err) => {
            tracing::error!(error = %err, path = %config.database_url, "failed to initialize database");
            return ExitCode::FAILURE;
        }
    };

    let state = AppState::new(db).with_auth_token(config.auth_token.clone());
    let app = create_app(state).layer(TraceLayer::new_for_http());

    let addr = config.bind_addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(error = %err, %addr, "failed to bind listener");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        port = config.port,
        database = %config.database_url,
        auth = config.auth_token.is_some(),
        "server running"
    );

    // Runs until SIGTERM or SIGINT
    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %err, "server error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Resolves when SIGINT (Ctrl+C) or, on Unix, SIGTERM is received
///
/// Open connections are allowed to complete so no write transaction is cut
/// off mid-commit.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
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

    tracing::info!("shutdown signal received, stopping server");
}
