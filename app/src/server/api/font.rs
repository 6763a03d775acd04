//! Label font API.

use axum::Json;
use axum::extract::{Multipart, State};
use serde_json::json;

use crate::app::SharedState;
use crate::services::font::FontError;

use super::{ApiResult, err_json};

/// GET /api/font – uploaded font info
pub async fn get_font_info(State(state): State<SharedState>) -> ApiResult {
    let info = state
        .font_service()
        .get_font_info()
        .map_err(|e| err_json(500, &e.to_string()))?;
    Ok(Json(json!({ "font": info })))
}

/// POST /api/font – upload a TTF/OTF used for labels
pub async fn upload_font(State(state): State<SharedState>, mut multipart: Multipart) -> ApiResult {
    let svc = state.font_service();

    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("font") {
            continue;
        }
        let filename = field.file_name().unwrap_or("font.ttf").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| err_json(400, &e.to_string()))?;
        let info = svc
            .save_custom_font(&filename, &data)
            .map_err(|e| err_json(400, &e.to_string()))?;

        return Ok(Json(json!({ "success": true, "font": info })));
    }

    Err(err_json(400, "No font file provided"))
}

/// DELETE /api/font
pub async fn delete_font(State(state): State<SharedState>) -> ApiResult {
    match state.font_service().delete_custom_font() {
        Ok(()) => Ok(Json(json!({ "success": true, "message": "Font deleted" }))),
        Err(FontError::NoCustomFont) => Err(err_json(404, "No custom font configured")),
        Err(e) => Err(err_json(500, &e.to_string())),
    }
}
