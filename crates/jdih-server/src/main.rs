//! JDIH bot server.
//!
//! Serves the admin REST API and drives the Telegram long-polling
//! transport against a shared dispatcher.

use std::sync::Arc;

use jdih_gateway::JdihGateway;
use jdih_server::config::AppConfig;
use jdih_server::routes;
use jdih_server::state::AppState;
use jdih_server::telegram::{self, TelegramClient};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "jdih-server starting");

    // Config file path from first CLI arg, otherwise environment variables
    let config = match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!(path = %path, "loading config file");
            AppConfig::from_file(&path)?
        }
        None => AppConfig::from_env(),
    };

    let gateway = Arc::new(JdihGateway::new(config.gateway.clone())?);
    let state = AppState::new(&config, gateway);

    if !state.sheets_config.borrow().is_configured() {
        tracing::warn!("spreadsheet not configured, audit records will be dropped");
    }

    match (config.telegram.enabled, config.telegram.token.clone()) {
        (true, Some(token)) => {
            let client = Arc::new(TelegramClient::new(&config.telegram.api_base, token)?);
            tokio::spawn(telegram::run(
                client,
                Arc::clone(&state.dispatcher),
                Arc::clone(&state.telegram),
                config.telegram.poll_timeout_secs,
            ));
        }
        (true, None) => tracing::warn!("telegram enabled but TELEGRAM_BOT_TOKEN not set"),
        (false, _) => tracing::info!("telegram transport disabled"),
    }

    if config.whatsapp_enabled {
        tracing::warn!("whatsapp enabled but no whatsapp transport is linked into this build");
    }

    let app = routes::build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        // Graceful shutdown on SIGINT
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }

    tracing::info!("jdih-server stopped");
    Ok(())
}
