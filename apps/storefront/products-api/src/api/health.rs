//! Storage reachability check for the configured product backend.

use axum::extract::State;
use axum_helpers::StorageHealthResponse;
use domain_products::{ProductRepository, ProductService};
use std::sync::Arc;

/// Pings the product store
///
/// `200 {"ok": true}` when reachable, `500 {"ok": false, "error": ...}` otherwise.
#[utoipa::path(
    get,
    path = "/db/health",
    tag = "Health",
    responses(
        (status = 200, description = "Storage reachable", body = StorageHealthResponse),
        (status = 500, description = "Storage unreachable", body = StorageHealthResponse)
    )
)]
pub async fn db_health<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> StorageHealthResponse {
    StorageHealthResponse::from_result(service.ping().await)
}
