//! Batch job API:
//!   GET  /api/job        – current or last job status
//!   POST /api/job/start  – start a job with the saved settings
//!   POST /api/job/cancel – stop the running job after its current item

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::app::SharedState;
use crate::services::batch::JobError;
use qr_batch::BatchError;

use super::{ApiResult, err_json};

fn job_error_status(e: &JobError) -> u16 {
    match e {
        JobError::AlreadyRunning => 409,
        JobError::OutputDirNotSet => 400,
        JobError::Batch(BatchError::OutputDirMissing(_)) => 404,
        _ => 500,
    }
}

/// GET /api/job
pub async fn get_job(State(state): State<SharedState>) -> ApiResult {
    let value: Value = serde_json::to_value(state.batch().status())
        .map_err(|e| err_json(500, &e.to_string()))?;
    Ok(Json(value))
}

/// POST /api/job/start
pub async fn start_job(
    State(state): State<SharedState>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let config = state.config().await.clone();
    let job_id = state
        .batch()
        .start(config, state.font_service(), state.ws_sender().clone())
        .map_err(|e| err_json(job_error_status(&e), &e.to_string()))?;

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "success": true, "job_id": job_id })),
    ))
}

/// POST /api/job/cancel
pub async fn cancel_job(State(state): State<SharedState>) -> ApiResult {
    let cancelled = state.batch().cancel();
    Ok(Json(json!({
        "success": true,
        "cancelled": cancelled,
        "message": if cancelled { "Stopping after the current image" } else { "No job is running" },
    })))
}
