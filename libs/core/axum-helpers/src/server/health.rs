use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use core_config::AppInfo;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

/// Storage reachability report: `{"ok": true}` or `{"ok": false, "error": ...}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StorageHealthResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StorageHealthResponse {
    pub fn from_result<E: Display>(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self {
                ok: true,
                error: None,
            },
            Err(e) => Self {
                ok: false,
                error: Some(e.to_string()),
            },
        }
    }
}

impl IntoResponse for StorageHealthResponse {
    fn into_response(self) -> Response {
        let status = if self.ok {
            StatusCode::OK
        } else {
            tracing::error!("Storage health check failed: {:?}", self.error);
            StatusCode::INTERNAL_SERVER_ERROR
        };

        (status, Json(self)).into_response()
    }
}

/// Liveness endpoint handler. Performs no I/O.
pub async fn health_handler(State(app): State<AppInfo>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: app.name,
    })
}

/// Creates a router with the /health endpoint.
///
/// # Example
/// ```ignore
/// use axum_helpers::server::health_router;
/// use core_config::app_info;
///
/// let app = Router::new().merge(health_router(app_info!("users-api")));
/// ```
pub fn health_router(app_info: AppInfo) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(app_info)
}
