use axum::http::{HeaderValue, Method};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

/// Creates a CORS layer restricted to the given origins.
///
/// - Methods: GET, POST, PUT, DELETE, OPTIONS
/// - Headers: Content-Type, Accept
/// - 1 hour max age
pub fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .max_age(Duration::from_secs(3600))
}

/// Creates a permissive CORS layer that allows any origin.
pub fn create_permissive_cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}

/// Builds the CORS layer from `CORS_ALLOWED_ORIGIN`.
///
/// The variable holds comma-separated origins. When it is unset or blank every
/// origin is allowed.
pub fn cors_layer_from_env() -> io::Result<CorsLayer> {
    let origins_str = std::env::var("CORS_ALLOWED_ORIGIN").unwrap_or_default();

    let allowed_origins: Vec<HeaderValue> = origins_str
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid CORS_ALLOWED_ORIGIN value: {}", e),
            )
        })?;

    if allowed_origins.is_empty() {
        info!("CORS_ALLOWED_ORIGIN not set, allowing any origin");
        return Ok(create_permissive_cors_layer());
    }

    info!("CORS configured with allowed origins: {}", origins_str);
    Ok(create_cors_layer(allowed_origins))
}
