use axum::{Router, routing::get};
use axum_helpers::health_router;
use core_config::AppInfo;
use domain_users::{UserRepository, UserService, handlers};
use std::sync::Arc;

pub mod health;

/// Creates the API routes: `/users`, `/db/health` and `/health`.
pub fn routes<R: UserRepository + 'static>(service: UserService<R>, app_info: AppInfo) -> Router {
    let db_health = Router::new()
        .route("/db/health", get(health::db_health::<R>))
        .with_state(Arc::new(service.clone()));

    Router::new()
        .nest("/users", handlers::router(service))
        .merge(db_health)
        .merge(health_router(app_info))
}
