use axum::{Router, routing::get};
use axum_helpers::health_router;
use core_config::AppInfo;
use domain_products::{ProductRepository, ProductService, handlers};
use std::sync::Arc;

pub mod health;

/// Creates the API routes: the products resource, `/db/health` and `/health`.
///
/// Returns a stateless Router; pass it to `create_router` for the
/// OpenAPI, tracing and CORS layers.
pub fn routes<R: ProductRepository + 'static>(
    service: ProductService<R>,
    app_info: AppInfo,
) -> Router {
    let db_health = Router::new()
        .route("/db/health", get(health::db_health::<R>))
        .with_state(Arc::new(service.clone()));

    Router::new()
        .nest("/products", handlers::router(service))
        .merge(db_health)
        .merge(health_router(app_info))
}
