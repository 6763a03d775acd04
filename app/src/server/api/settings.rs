//! Settings management API:
//!   GET  /api/settings        – all settings in form order + feature status
//!   PUT  /api/settings        – update settings
//!   POST /api/settings/reset  – reset settings to defaults
//!   GET  /api/settings/status – lightweight feature status

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::app::SharedState;
use crate::config::SettingsManager;

use super::{ApiResult, err_json};

fn settings_payload(sm: &SettingsManager) -> ApiResult {
    let all = sm
        .get_all_settings()
        .map_err(|e| err_json(500, &format!("Failed to get settings: {e}")))?;
    let status = sm
        .check_feature_status()
        .map_err(|e| err_json(500, &format!("Failed to check status: {e}")))?;
    Ok(Json(json!({
        "settings": all,
        "status": status,
    })))
}

/// GET /api/settings
pub async fn get_settings(State(state): State<SharedState>) -> ApiResult {
    settings_payload(state.settings())
}

/// PUT /api/settings
///
/// Every value is validated before any is written.
pub async fn update_settings(
    State(state): State<SharedState>,
    Json(body): Json<BTreeMap<String, String>>,
) -> ApiResult {
    let sm = state.settings();
    sm.set_settings(&body)
        .map_err(|e| err_json(400, &e.to_string()))?;

    state
        .reload_config()
        .await
        .map_err(|e| err_json(500, &format!("Failed to reload config: {e}")))?;
    tracing::info!(count = body.len(), "Settings updated");

    let Json(mut payload) = settings_payload(sm)?;
    payload["success"] = json!(true);
    payload["message"] = json!(format!("Updated {} setting(s) successfully", body.len()));
    Ok(Json(payload))
}

#[derive(Debug, Default, Deserialize)]
pub struct ResetRequest {
    #[serde(default)]
    pub keys: Vec<String>,
}

/// POST /api/settings/reset – empty `keys` resets everything
pub async fn reset_settings(
    State(state): State<SharedState>,
    body: Option<Json<ResetRequest>>,
) -> ApiResult {
    let keys = body.map(|Json(b)| b.keys).unwrap_or_default();
    let reset_count = state
        .settings()
        .reset_settings(&keys)
        .map_err(|e| err_json(400, &e.to_string()))?;

    state
        .reload_config()
        .await
        .map_err(|e| err_json(500, &format!("Failed to reload config: {e}")))?;

    Ok(Json(json!({
        "success": true,
        "message": format!("Reset {reset_count} setting(s) to default values"),
    })))
}

/// GET /api/settings/status
pub async fn get_settings_status(State(state): State<SharedState>) -> ApiResult {
    let status = state
        .settings()
        .check_feature_status()
        .map_err(|e| err_json(500, &format!("Failed to check status: {e}")))?;
    let value: Value =
        serde_json::to_value(status).map_err(|e| err_json(500, &e.to_string()))?;
    Ok(Json(value))
}
