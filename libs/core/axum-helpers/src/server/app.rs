use super::shutdown::shutdown_signal;
use crate::errors::handlers::not_found;
use crate::http::cors_layer_from_env;
use axum::{Json, Router, routing::get};
use core_config::server::ServerConfig;
use std::future::Future;
use std::io;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

/// Path the OpenAPI document is served on.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Creates a configured Axum router with common middleware and documentation.
///
/// This function sets up:
/// - The OpenAPI document at [`OPENAPI_PATH`] and a Scalar viewer at `/scalar`
/// - Request tracing and CORS (see [`cors_layer_from_env`])
/// - A JSON `404 {"error": "not found"}` fallback
///
/// `apis` is merged at the root; domain routers carry their own state and
/// prefixes.
///
/// # Errors
/// Returns an error if `CORS_ALLOWED_ORIGIN` contains invalid values.
///
/// # Example
/// ```ignore
/// let api_routes = Router::new().nest("/products", handlers::router(service));
/// let router = create_router::<ApiDoc>(api_routes)?;
/// ```
pub fn create_router<T>(apis: Router) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    let openapi = T::openapi();
    let document = openapi.clone();

    let router = Router::new()
        .route(
            OPENAPI_PATH,
            get(move || {
                let document = document.clone();
                async move { Json(document) }
            }),
        )
        .merge(Scalar::with_url("/scalar", openapi))
        .merge(apis)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer_from_env()?);

    Ok(router)
}

/// Starts the Axum server with graceful shutdown, then runs `cleanup`.
///
/// The server stops accepting connections on SIGINT/SIGTERM and drains
/// in-flight requests. `cleanup` (closing pools and the like) gets at most
/// `shutdown_timeout` before the function returns anyway.
///
/// # Errors
/// Returns an error if:
/// - The TCP listener fails to bind to the configured address
/// - The server encounters an error during operation
///
/// # Example
/// ```ignore
/// let cleanup = async move {
///     db.close().await.ok();
/// };
///
/// create_app(router, &config, Duration::from_secs(30), cleanup).await?;
/// ```
pub async fn create_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(server_config.address()).await?;
    serve_with_cleanup(listener, router, shutdown_signal(), shutdown_timeout, cleanup).await
}

/// Serves `router` on an already bound listener until `signal` completes.
///
/// Split out of [`create_app`] so tests can drive shutdown themselves.
pub async fn serve_with_cleanup<S, F>(
    listener: TcpListener,
    router: Router,
    signal: S,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    S: Future<Output = ()> + Send + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    info!("Server starting on {}", listener.local_addr()?);

    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(signal)
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        });

    info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
    match tokio::time::timeout(shutdown_timeout, cleanup).await {
        Ok(()) => info!("Cleanup completed successfully"),
        Err(_) => tracing::warn!(
            "Cleanup exceeded timeout of {:?}, forcing shutdown",
            shutdown_timeout
        ),
    }

    serve_result
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    #[derive(OpenApi)]
    #[openapi(info(title = "test"))]
    struct TestDoc;

    #[tokio::test]
    async fn test_unmatched_route_is_json_404() {
        let router = temp_env::with_var_unset("CORS_ALLOWED_ORIGIN", || {
            create_router::<TestDoc>(Router::new()).unwrap()
        });

        let response = router
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "not found" }));
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let router = temp_env::with_var_unset("CORS_ALLOWED_ORIGIN", || {
            create_router::<TestDoc>(Router::new()).unwrap()
        });

        let response = router
            .oneshot(Request::get(OPENAPI_PATH).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["info"]["title"], "test");
    }

    #[tokio::test]
    async fn test_cleanup_runs_after_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let cleaned = Arc::new(AtomicBool::new(false));
        let flag = cleaned.clone();

        serve_with_cleanup(
            listener,
            Router::new(),
            async {},
            Duration::from_secs(1),
            async move { flag.store(true, Ordering::SeqCst) },
        )
        .await
        .unwrap();

        assert!(cleaned.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_slow_cleanup_is_cut_off() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();

        let started = std::time::Instant::now();
        serve_with_cleanup(
            listener,
            Router::new(),
            async {},
            Duration::from_millis(50),
            tokio::time::sleep(Duration::from_secs(30)),
        )
        .await
        .unwrap();

        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
