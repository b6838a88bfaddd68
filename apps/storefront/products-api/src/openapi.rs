use axum_helpers::{HealthResponse, StorageHealthResponse};
use utoipa::OpenApi;

/// OpenAPI document for the products service
#[derive(OpenApi)]
#[openapi(
    info(title = "Products API", description = "Product catalogue service"),
    paths(crate::api::health::db_health),
    components(schemas(HealthResponse, StorageHealthResponse)),
    nest(
        (path = "/products", api = domain_products::ApiDoc)
    ),
    tags(
        (name = "Health", description = "Liveness and storage checks")
    )
)]
pub struct ApiDoc;
