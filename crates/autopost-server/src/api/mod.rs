mod posts;
mod runs;

use std::sync::Arc;
use std::time::Duration;

use autopost_core::RunResult;
use autopost_pipeline::{PipelineError, Services};
use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::middleware::{
    enforce_rate_limit, request_id, require_bearer_auth, AuthState, RateLimitState, RequestId,
};

#[derive(Clone)]
pub struct AppState {
    pub services: Arc<Services>,
    /// Held for the duration of a run so HTTP and cron triggers never overlap.
    run_lock: Arc<Mutex<()>>,
}

impl AppState {
    #[must_use]
    pub fn new(services: Arc<Services>) -> Self {
        Self {
            services,
            run_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Run the pipeline unless another run is in progress.
    ///
    /// Returns `None` without doing anything when the lock is taken.
    pub async fn try_run(&self) -> Option<Result<RunResult, PipelineError>> {
        let _guard = self.run_lock.try_lock().ok()?;
        Some(self.services.run(Utc::now()).await)
    }
}

/// Success envelope: `success: true`, the payload's fields, and request metadata.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(flatten)]
    pub data: T,
    pub meta: ResponseMeta,
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn ok(data: T, request_id: String) -> Self {
        Self {
            success: true,
            data,
            meta: ResponseMeta::new(request_id),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" | "validation_error" | "config_error" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "source_error" | "publish_failed" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_pipeline_error(request_id: &str, error: &PipelineError) -> ApiError {
    tracing::error!(error = %error, "run aborted");
    match error {
        PipelineError::Config(_) => ApiError::new(request_id, "config_error", error.to_string()),
        PipelineError::Source(_) | PipelineError::SourceFormat(_) => {
            ApiError::new(request_id, "source_error", error.to_string())
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn protected_router(auth: AuthState, rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/runs", post(runs::trigger_run))
        .route("/api/v1/posts", post(posts::publish_post))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    rate_limit,
                    enforce_rate_limit,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    auth,
                    require_bearer_auth,
                )),
        )
}

pub fn build_app(state: AppState, auth: AuthState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(protected_router(auth, rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    Json(ApiResponse::ok(HealthData { status: "ok" }, req_id.0))
}

pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(60, Duration::from_secs(60))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use autopost_core::{AppConfig, Environment};
    use autopost_pipeline::Services;
    use chrono::FixedOffset;

    use super::AppState;

    pub(crate) fn config(sheet_api_url: Option<String>, upstream: &str) -> AppConfig {
        AppConfig {
            env: Environment::Test,
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "info".to_owned(),
            sheet_api_url,
            openai_api_key: "sk-test".to_owned(),
            openai_base_url: format!("{upstream}/v1"),
            openai_model: "gpt-3.5-turbo".to_owned(),
            page_access_token: "page-token".to_owned(),
            page_id: "42".to_owned(),
            graph_api_base_url: format!("{upstream}/v17.0"),
            request_timeout_secs: 5,
            user_agent: "autopost-test".to_owned(),
            source_max_retries: 0,
            source_retry_backoff_base_ms: 0,
            max_posts_per_run: None,
            schedule_utc_offset: FixedOffset::east_opt(0).unwrap(),
            cron: None,
        }
    }

    pub(crate) fn state(sheet_api_url: Option<String>, upstream: &str) -> AppState {
        let services = Services::from_config(&config(sheet_api_url, upstream)).unwrap();
        AppState::new(Arc::new(services))
    }
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    use super::test_support::state;
    use super::*;

    fn app(auth: AuthState) -> Router {
        build_app(
            state(None, "http://127.0.0.1:1"),
            auth,
            default_rate_limit_state(),
        )
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn error_codes_map_to_statuses() {
        let cases = [
            ("validation_error", StatusCode::BAD_REQUEST),
            ("config_error", StatusCode::BAD_REQUEST),
            ("conflict", StatusCode::CONFLICT),
            ("source_error", StatusCode::BAD_GATEWAY),
            ("publish_failed", StatusCode::BAD_GATEWAY),
            ("something_else", StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (code, status) in cases {
            let response = ApiError::new("req-1", code, "x").into_response();
            assert_eq!(response.status(), status, "{code}");
        }
    }

    #[tokio::test]
    async fn health_is_public_and_echoes_request_id() {
        let auth = AuthState::from_keys("secret", false).unwrap();
        let response = app(auth)
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .header("x-request-id", "req-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-request-id"], "req-42");
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["meta"]["request_id"], "req-42");
    }

    #[tokio::test]
    async fn protected_routes_require_bearer_token() {
        let auth = AuthState::from_keys("secret", false).unwrap();
        let response = app(auth)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/runs")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "unauthorized");
    }

    #[tokio::test]
    async fn rate_limit_rejects_after_budget() {
        let auth = AuthState::from_keys("", true).unwrap();
        let app = build_app(
            state(None, "http://127.0.0.1:1"),
            auth,
            RateLimitState::new(1, Duration::from_secs(60)),
        );

        let request = || {
            Request::builder()
                .method("POST")
                .uri("/api/v1/runs")
                .body(Body::empty())
                .unwrap()
        };
        let first = app.clone().oneshot(request()).await.unwrap();
        assert_ne!(first.status(), StatusCode::TOO_MANY_REQUESTS);
        let second = app.oneshot(request()).await.unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
