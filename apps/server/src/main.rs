//! # Mercado Server
//!
//! Binary entry point: tracing, configuration, database, router, listener.

mod auth;
mod config;
mod error;
mod mailer;
mod routes;
mod state;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use mercado_db::{Database, DbConfig};

use crate::auth::AuthService;
use crate::config::ServerConfig;
use crate::mailer::LogMailer;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG controls verbosity; default to info.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::load()?;
    info!(port = config.http_port, db = %config.database_path, "Starting Mercado server");

    let db = Database::new(DbConfig::new(&config.database_path)).await?;

    let auth = AuthService::new(
        config.jwt_secret.clone(),
        config.jwt_lifetime_secs,
        config.code_ttl_minutes,
    );
    let state = AppState::new(db, auth, Arc::new(LogMailer));

    let app = routes::router(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    // Ctrl-C ends the accept loop; in-flight requests finish first.
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}
