//! # Axum Helpers
//!
//! Shared HTTP plumbing for the storefront services.
//!
//! ## Modules
//!
//! - **[`server`]**: Router setup, health responses, graceful shutdown
//! - **[`http`]**: CORS configuration
//! - **[`errors`]**: `AppError` and the `{error, detail?}` response body
//! - **[`extractors`]**: Path id and lenient JSON body extractors
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_app, create_router};
//! use core_config::server::ServerConfig;
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api_routes = Router::new(); // Add your routes
//!     let router = create_router::<ApiDoc>(api_routes)?;
//!
//!     let config = ServerConfig::default();
//!     create_app(router, &config, Duration::from_secs(30), async {}).await?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

// Re-export server types
pub use server::{
    HealthResponse, StorageHealthResponse, create_app, create_router, health_router,
    shutdown_signal,
};

// Re-export HTTP middleware
pub use http::{cors_layer_from_env, create_cors_layer, create_permissive_cors_layer};

// Re-export error types
pub use errors::{AppError, ErrorResponse};

// Re-export extractors
pub use extractors::{IdPath, JsonPayload, PathId};
