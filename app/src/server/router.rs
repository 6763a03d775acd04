use axum::{
    Router,
    routing::{get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;

use super::{api, assets, websocket};
use crate::app::SharedState;

/// Create the axum router with all routes.
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        // --- Core ---
        .route("/status", get(status_handler))
        .route("/ws", get(websocket::ws_handler))
        // --- Settings ---
        .route("/api/settings", get(api::settings::get_settings).put(api::settings::update_settings))
        .route("/api/settings/reset", post(api::settings::reset_settings))
        .route("/api/settings/status", get(api::settings::get_settings_status))
        // --- Preview ---
        .route("/api/preview", get(api::preview::get_preview))
        .route("/api/preview.png", get(api::preview::get_preview_png))
        // --- Batch job ---
        .route("/api/job", get(api::job::get_job))
        .route("/api/job/start", post(api::job::start_job))
        .route("/api/job/cancel", post(api::job::cancel_job))
        // --- Font ---
        .route("/api/font", get(api::font::get_font_info).post(api::font::upload_font).delete(api::font::delete_font))
        // --- Logs ---
        .route("/api/logs", get(api::logs::get_logs))
        .route("/api/logs/clear", post(api::logs::clear_logs))
        // --- Form UI at / ---
        .route("/", get(assets::form_index))
        .fallback(assets::form_fallback)
        // --- Middleware ---
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .with_state(state)
}

async fn status_handler() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
