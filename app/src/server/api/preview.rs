//! Preview API: first file name and a PNG render of the first item.

use axum::Json;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use base64::Engine;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::app::SharedState;
use crate::services::preview::{PreviewResult, render_preview};

use super::{ApiResult, err_json};

#[derive(Debug, Default, Deserialize)]
pub struct PreviewQuery {
    pub max_width: Option<u32>,
}

async fn build(
    state: &SharedState,
    max_width: Option<u32>,
) -> Result<PreviewResult, (StatusCode, Json<Value>)> {
    let config = state.config().await.clone();
    let fonts = state.font_service();
    tokio::task::spawn_blocking(move || render_preview(&config, &fonts, max_width))
        .await
        .map_err(|e| err_json(500, &e.to_string()))?
        .map_err(|e| err_json(400, &e.to_string()))
}

/// GET /api/preview – JSON with the image as a base64 data URL
pub async fn get_preview(
    State(state): State<SharedState>,
    Query(q): Query<PreviewQuery>,
) -> ApiResult {
    let preview = build(&state, q.max_width).await?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(&preview.png);
    Ok(Json(json!({
        "file_name": preview.item.file_name,
        "content": preview.item.content,
        "total": preview.item.total,
        "width": preview.width,
        "height": preview.height,
        "has_label": preview.has_label,
        "image": format!("data:image/png;base64,{encoded}"),
    })))
}

/// GET /api/preview.png – raw image
pub async fn get_preview_png(
    State(state): State<SharedState>,
    Query(q): Query<PreviewQuery>,
) -> Result<Response, (StatusCode, Json<Value>)> {
    let preview = build(&state, q.max_width).await?;
    Response::builder()
        .header(header::CONTENT_TYPE, "image/png")
        .header(header::CACHE_CONTROL, "no-store")
        .body(Body::from(preview.png))
        .map_err(|e| err_json(500, &e.to_string()))
}
