//! Shared application state for the Axum server.

use std::sync::Arc;

use jdih_core::audit::{AuditSink, NoopAuditSink, SheetsAuditSink, SheetsConfig};
use jdih_core::{CoreConfig, Dispatcher};
use jdih_gateway::SearchGateway;
use tokio::sync::{RwLock, watch};

use crate::config::AppConfig;
use crate::telegram::TelegramStatus;

/// Platform switches editable from the admin panel.
#[derive(Debug, Clone, Default)]
pub struct PlatformSettings {
    pub whatsapp_enabled: bool,
    pub telegram_enabled: bool,
    pub telegram_token: Option<String>,
}

/// Shared application state, cloned into every Axum handler.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub platforms: Arc<RwLock<PlatformSettings>>,
    /// Publishes core settings to the dispatcher.
    pub core_config: Arc<watch::Sender<CoreConfig>>,
    /// Publishes spreadsheet settings to the audit sink.
    pub sheets_config: Arc<watch::Sender<SheetsConfig>>,
    pub telegram: Arc<TelegramStatus>,
    /// Telegram Bot API root, used by the connection test endpoint.
    pub telegram_api_base: String,
}

impl AppState {
    /// Wire the dispatcher to `gateway` with a Sheets audit sink.
    ///
    /// Falls back to a sink that drops records if the Sheets HTTP client
    /// cannot be built.
    pub fn new(config: &AppConfig, gateway: Arc<dyn SearchGateway>) -> Self {
        let (sheets_tx, sheets_rx) = watch::channel(sheets_snapshot(config));
        let audit: Arc<dyn AuditSink> = match SheetsAuditSink::new(sheets_rx) {
            Ok(sink) => Arc::new(sink),
            Err(e) => {
                tracing::warn!(error = %e, "sheets audit sink unavailable, records will be dropped");
                Arc::new(NoopAuditSink)
            }
        };
        Self::with_sink(config, gateway, audit, sheets_tx)
    }

    /// Wire the dispatcher to `gateway` and an explicit audit sink (tests).
    pub fn with_audit(
        config: &AppConfig,
        gateway: Arc<dyn SearchGateway>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        let (sheets_tx, _) = watch::channel(sheets_snapshot(config));
        Self::with_sink(config, gateway, audit, sheets_tx)
    }

    fn with_sink(
        config: &AppConfig,
        gateway: Arc<dyn SearchGateway>,
        audit: Arc<dyn AuditSink>,
        sheets_tx: watch::Sender<SheetsConfig>,
    ) -> Self {
        let (core_tx, core_rx) = watch::channel(config.core.clone());
        let dispatcher = Arc::new(Dispatcher::new(gateway, audit, core_rx));
        Self {
            dispatcher,
            platforms: Arc::new(RwLock::new(PlatformSettings {
                whatsapp_enabled: config.whatsapp_enabled,
                telegram_enabled: config.telegram.enabled,
                telegram_token: config.telegram.token.clone(),
            })),
            core_config: Arc::new(core_tx),
            sheets_config: Arc::new(sheets_tx),
            telegram: Arc::new(TelegramStatus::default()),
            telegram_api_base: config.telegram.api_base.clone(),
        }
    }
}

/// Sheets settings with the timestamp offset taken from the core config.
fn sheets_snapshot(config: &AppConfig) -> SheetsConfig {
    SheetsConfig {
        utc_offset_hours: config.core.utc_offset_hours,
        ..config.sheets.clone()
    }
}
