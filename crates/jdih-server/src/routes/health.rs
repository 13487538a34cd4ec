//! Health check endpoint.

use axum::Json;
use axum::extract::State;
use chrono::Utc;
use serde_json::{Value, json};

use crate::state::AppState;

/// GET /health: liveness check plus platform switches.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let platforms = state.platforms.read().await.clone();
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now(),
        "search_history_count": state.dispatcher.history().len().await,
        "platforms": {
            "whatsapp": platforms.whatsapp_enabled,
            "telegram": platforms.telegram_enabled,
        },
    }))
}
