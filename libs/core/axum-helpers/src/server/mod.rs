//! Server infrastructure module.
//!
//! This module provides:
//! - Router setup with OpenAPI documentation, tracing and CORS
//! - Liveness and storage health responses
//! - Graceful shutdown followed by bounded cleanup
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::server::{create_app, create_router, health_router};
//! use core_config::{server::ServerConfig, app_info};
//!
//! let router = create_router::<ApiDoc>(api_routes)?
//!     .merge(health_router(app_info!("products-api")));
//!
//! create_app(router, &ServerConfig::default(), Duration::from_secs(30), async {}).await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{OPENAPI_PATH, create_app, create_router, serve_with_cleanup};
pub use health::{HealthResponse, StorageHealthResponse, health_handler, health_router};
pub use shutdown::shutdown_signal;
