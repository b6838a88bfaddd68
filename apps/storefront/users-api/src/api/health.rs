use axum::extract::State;
use axum_helpers::StorageHealthResponse;
use domain_users::{UserRepository, UserService};
use std::sync::Arc;

/// Pings the user store
#[utoipa::path(
    get,
    path = "/db/health",
    tag = "Health",
    responses(
        (status = 200, description = "Storage reachable", body = StorageHealthResponse),
        (status = 500, description = "Storage unreachable", body = StorageHealthResponse)
    )
)]
pub async fn db_health<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
) -> StorageHealthResponse {
    StorageHealthResponse::from_result(service.ping().await)
}
