use axum_helpers::{HealthResponse, StorageHealthResponse};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Users API", description = "User directory service"),
    paths(crate::api::health::db_health),
    components(schemas(HealthResponse, StorageHealthResponse)),
    nest(
        (path = "/users", api = domain_users::ApiDoc)
    ),
    tags(
        (name = "Health", description = "Liveness and storage checks")
    )
)]
pub struct ApiDoc;
