//! `POST /api/v1/runs`: run the pipeline once, now.

use autopost_core::RunResult;
use axum::{extract::State, Extension, Json};

use crate::middleware::RequestId;

use super::{map_pipeline_error, ApiError, ApiResponse, AppState};

pub(super) async fn trigger_run(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<RunResult>>, ApiError> {
    let Some(outcome) = state.try_run().await else {
        return Err(ApiError::new(
            req_id.0,
            "conflict",
            "a run is already in progress",
        ));
    };

    let result = outcome.map_err(|e| map_pipeline_error(&req_id.0, &e))?;
    Ok(Json(ApiResponse::ok(result, req_id.0)))
}
