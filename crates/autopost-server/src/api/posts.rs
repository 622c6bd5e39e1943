//! `POST /api/v1/posts`: publish one row on demand.

use autopost_pipeline::{PostDraft, PostError};
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PublishPostRequest {
    pub row_index: u64,
    #[serde(default)]
    pub description: String,
    /// Comma-separated image URLs.
    pub image_url: Option<String>,
    pub prompt_template: Option<String>,
    pub tags: Option<String>,
    /// Store URL to record the outcome at; the configured one when absent.
    pub source_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PublishPostResponse {
    pub post_id: String,
    pub optimized_content: String,
}

pub(super) async fn publish_post(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<PublishPostRequest>,
) -> Result<Json<ApiResponse<PublishPostResponse>>, ApiError> {
    let rid = req_id.0;

    if body.row_index == 0 {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "rowIndex must be a positive integer",
        ));
    }

    let draft = PostDraft::manual(
        body.row_index,
        &body.description,
        body.image_url.as_deref(),
        body.tags.as_deref(),
        body.prompt_template.as_deref(),
    );

    match state
        .services
        .publish_manual(&draft, body.source_url.as_deref())
        .await
    {
        Ok(post) => Ok(Json(ApiResponse::ok(
            PublishPostResponse {
                post_id: post.post_id,
                optimized_content: post.optimized_content,
            },
            rid,
        ))),
        Err(e) => Err(map_post_error(rid, &e)),
    }
}

fn map_post_error(request_id: String, error: &PostError) -> ApiError {
    match error {
        PostError::InvalidRequest(_) => {
            ApiError::new(request_id, "validation_error", error.to_string())
        }
        PostError::Config(_) => ApiError::new(request_id, "config_error", error.to_string()),
        PostError::Row(e) => {
            tracing::warn!(error = %e, "manual post failed");
            ApiError::new(request_id, "publish_failed", error.to_string())
        }
    }
}
