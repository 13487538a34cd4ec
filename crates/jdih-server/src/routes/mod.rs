//! API route definitions and router builder.

pub mod admin;
pub mod health;

use axum::Router;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let admin = Router::new()
        .route("/status", get(admin::status))
        .route("/config", get(admin::get_config))
        .route("/config/save", post(admin::save_config))
        .route("/logs", get(admin::logs))
        .route("/logs/clear", post(admin::clear_logs))
        .route("/export", get(admin::export))
        .route("/telegram/test", post(admin::telegram_test))
        .route("/sheets/test", post(admin::sheets_test));

    Router::new()
        .route("/health", get(health::health))
        .route("/test", post(test::test_message))
        .nest("/admin", admin)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}
