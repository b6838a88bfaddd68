use axum::response::{IntoResponse, Response};

use super::AppError;

/// Handler for unmatched routes.
///
/// This can be used as a fallback handler in your router.
pub async fn not_found() -> Response {
    AppError::not_found().into_response()
}
