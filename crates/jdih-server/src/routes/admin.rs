//! Admin panel endpoints: status, configuration, history logs, export,
//! connection tests.

use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use chrono::Utc;
use jdih_core::audit::check_connection;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::telegram::TelegramClient;

/// Lines returned by the logs endpoint.
const LOG_LINES: usize = 50;

const MASKED: &str = "***configured***";

fn mask(secret: Option<&str>) -> &'static str {
    match secret {
        Some(s) if !s.trim().is_empty() => MASKED,
        _ => "",
    }
}

/// GET /admin/status: platform connectivity and usage numbers.
pub async fn status(State(state): State<AppState>) -> Json<Value> {
    let platforms = state.platforms.read().await.clone();
    let sheets_configured = state.sheets_config.borrow().is_configured();
    let stats = state.dispatcher.status().await;

    Json(json!({
        "whatsapp": {
            "enabled": platforms.whatsapp_enabled,
            "connected": false,
        },
        "telegram": {
            "enabled": platforms.telegram_enabled,
            "connected": state.telegram.is_connected(),
            "username": state.telegram.username(),
        },
        "sheets": {
            "connected": sheets_configured,
            "sheet_name": if sheets_configured { "Configured" } else { "Not configured" },
        },
        "stats": {
            "total_searches": stats.total_searches,
            "total_users": stats.total_users,
            "today_searches": stats.today_searches,
            "uptime_seconds": stats.uptime_seconds,
            "uptime": stats.uptime_label(),
        },
    }))
}

async fn config_view(state: &AppState) -> Value {
    let platforms = state.platforms.read().await.clone();
    let sheets = state.sheets_config.borrow().clone();
    let core = state.core_config.borrow().clone();

    json!({
        "whatsapp": { "enabled": platforms.whatsapp_enabled },
        "telegram": {
            "enabled": platforms.telegram_enabled,
            "token": mask(platforms.telegram_token.as_deref()),
        },
        "sheets": {
            "sheet_id": sheets.spreadsheet_id.unwrap_or_default(),
            "access_token": mask(sheets.access_token.as_deref()),
        },
        "core": core,
    })
}

/// GET /admin/config: current settings with secrets masked.
pub async fn get_config(State(state): State<AppState>) -> Json<Value> {
    Json(config_view(&state).await)
}

/// Partial settings update; absent fields keep their value, empty strings clear.
#[derive(Debug, Default, Deserialize)]
pub struct SaveConfigRequest {
    pub whatsapp_enabled: Option<bool>,
    pub telegram_enabled: Option<bool>,
    pub telegram_token: Option<String>,
    pub google_sheet_id: Option<String>,
    pub sheets_access_token: Option<String>,
    pub min_delay_ms: Option<u64>,
    pub max_delay_ms: Option<u64>,
    pub utc_offset_hours: Option<i32>,
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// POST /admin/config/save: validate and publish new settings.
pub async fn save_config(
    State(state): State<AppState>,
    Json(req): Json<SaveConfigRequest>,
) -> ApiResult<Json<Value>> {
    let mut core = state.core_config.borrow().clone();
    if let Some(min) = req.min_delay_ms {
        core.min_delay_ms = min;
    }
    if let Some(max) = req.max_delay_ms {
        core.max_delay_ms = max;
    }
    if let Some(offset) = req.utc_offset_hours {
        core.utc_offset_hours = offset;
    }
    core.validate().map_err(ApiError::BadRequest)?;

    {
        let mut platforms = state.platforms.write().await;
        if let Some(enabled) = req.whatsapp_enabled {
            platforms.whatsapp_enabled = enabled;
        }
        if let Some(enabled) = req.telegram_enabled {
            platforms.telegram_enabled = enabled;
        }
        if let Some(token) = req.telegram_token {
            platforms.telegram_token = non_empty(token);
        }
    }

    let mut sheets = state.sheets_config.borrow().clone();
    if let Some(id) = req.google_sheet_id {
        sheets.spreadsheet_id = non_empty(id);
    }
    if let Some(token) = req.sheets_access_token {
        sheets.access_token = non_empty(token);
    }
    sheets.utc_offset_hours = core.utc_offset_hours;
    state.sheets_config.send_replace(sheets);
    state.core_config.send_replace(core);

    tracing::info!("configuration saved");
    Ok(Json(json!({
        "success": true,
        "message": "Configuration saved successfully",
    })))
}

/// GET /admin/logs: the latest history entries, one per line.
pub async fn logs(State(state): State<AppState>) -> Json<Value> {
    let logs = state
        .dispatcher
        .history()
        .recent(LOG_LINES)
        .await
        .iter()
        .map(|e| {
            format!(
                "{} - {} - {} - {}",
                e.timestamp.to_rfc3339(),
                e.platform,
                e.intent_kind,
                e.query
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    Json(json!({ "logs": logs }))
}

/// POST /admin/logs/clear: drop the interaction history.
pub async fn clear_logs(State(state): State<AppState>) -> Json<Value> {
    state.dispatcher.history().clear().await;
    tracing::info!("interaction history cleared");
    Json(json!({ "success": true, "message": "Logs cleared" }))
}

/// GET /admin/export: history, stats and masked config as a JSON download.
pub async fn export(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let now = Utc::now();
    let history = state.dispatcher.history().all().await;
    let history = serde_json::to_value(&history).map_err(|e| ApiError::Internal(e.to_string()))?;
    let stats = state.dispatcher.status().await;

    let body = json!({
        "exported_at": now,
        "history": history,
        "stats": stats,
        "config": config_view(&state).await,
    });
    let disposition = format!(
        "attachment; filename=\"jdih-bot-data-{}.json\"",
        now.format("%Y-%m-%d")
    );
    Ok(([(header::CONTENT_DISPOSITION, disposition)], Json(body)))
}

#[derive(Debug, Deserialize)]
pub struct TelegramTestRequest {
    #[serde(default)]
    pub token: Option<String>,
}

/// POST /admin/telegram/test: check a bot token against `getMe`.
pub async fn telegram_test(
    State(state): State<AppState>,
    Json(req): Json<TelegramTestRequest>,
) -> ApiResult<Json<Value>> {
    let token = req
        .token
        .and_then(non_empty)
        .ok_or_else(|| ApiError::BadRequest("Telegram token required".into()))?;

    let client = TelegramClient::new(state.telegram_api_base.clone(), token)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    let bot = client.get_me().await.map_err(|e| {
        tracing::warn!(error = %e, "telegram token test failed");
        ApiError::BadGateway(format!("Failed to connect to Telegram: {e}"))
    })?;

    Ok(Json(json!({
        "success": true,
        "bot": bot,
        "message": "Telegram bot connected successfully",
    })))
}

/// POST /admin/sheets/test: read one cell with the saved spreadsheet settings.
pub async fn sheets_test(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let config = state.sheets_config.borrow().clone();
    if !config.is_configured() {
        return Err(ApiError::BadRequest("Google Sheets not configured".into()));
    }

    check_connection(&config).await.map_err(|e| {
        tracing::warn!(error = %e, "sheets connection test failed");
        ApiError::Internal(format!("Failed to connect to Google Sheets: {e}"))
    })?;

    Ok(Json(json!({
        "success": true,
        "message": "Google Sheets connection successful",
    })))
}
