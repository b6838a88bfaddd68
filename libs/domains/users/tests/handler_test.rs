//! Handler tests for Users domain over the in-memory repository

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_users::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()

fn app() -> Router {
    let service = UserService::new(InMemoryUserRepository::new());
    Router::new().nest("/users", handlers::router(service))
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> axum::response::Response {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    app.clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap()
}

async fn user_count(app: &Router) -> usize {
    let body = json_body(call(app, "GET", "/users", None).await).await;
    body.as_array().unwrap().len()
}

#[tokio::test]
async fn test_create_normalizes_and_returns_201() {
    let app = app();

    let response = call(
        &app,
        "POST",
        "/users",
        Some(json!({ "name": "  Alice ", "email": " Alice@Example.com " })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        json_body(response).await,
        json!({ "id": 1, "name": "Alice", "email": "alice@example.com" })
    );
}

#[tokio::test]
async fn test_create_requires_name_and_email() {
    let app = app();

    let response = call(&app, "POST", "/users", Some(json!({ "name": "Alice" }))).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await, json!({ "error": "name & email required" }));
}

#[tokio::test]
async fn test_duplicate_email_is_409_and_nothing_is_added() {
    let app = app();
    call(&app, "POST", "/users", Some(json!({ "name": "A", "email": "a@example.com" }))).await;

    // Same address after normalization
    let response = call(
        &app,
        "POST",
        "/users",
        Some(json!({ "name": "B", "email": "A@EXAMPLE.COM" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = json_body(response).await;
    assert_eq!(body["error"], "email already exists");
    assert!(body["detail"].is_string());

    let response = call(&app, "GET", "/users", None).await;
    assert_eq!(json_body(response).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_email_conflict_is_409() {
    let app = app();
    call(&app, "POST", "/users", Some(json!({ "name": "A", "email": "a@example.com" }))).await;
    call(&app, "POST", "/users", Some(json!({ "name": "B", "email": "b@example.com" }))).await;

    let response = call(&app, "PUT", "/users/2", Some(json!({ "email": "a@example.com" }))).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(json_body(response).await["error"], "email already exists");
}

#[tokio::test]
async fn test_partial_update() {
    let app = app();
    call(&app, "POST", "/users", Some(json!({ "name": "A", "email": "a@example.com" }))).await;

    let response = call(&app, "PUT", "/users/1", Some(json!({ "name": " Ann " }))).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "id": 1, "name": "Ann", "email": "a@example.com" })
    );

    let stored = json_body(call(&app, "GET", "/users/1", None).await).await;
    assert_eq!(stored, json!({ "id": 1, "name": "Ann", "email": "a@example.com" }));
}

#[tokio::test]
async fn test_update_nothing_is_400() {
    let app = app();

    let response = call(&app, "PUT", "/users/1", Some(json!({ "age": 3 }))).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "nothing to update");
}

#[tokio::test]
async fn test_get_and_delete_lifecycle() {
    let app = app();
    call(&app, "POST", "/users", Some(json!({ "name": "A", "email": "a@example.com" }))).await;

    let first = json_body(call(&app, "GET", "/users/1", None).await).await;
    let second = json_body(call(&app, "GET", "/users/1", None).await).await;
    assert_eq!(first, second);

    let response = call(&app, "DELETE", "/users/1", None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = call(&app, "DELETE", "/users/1", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await, json!({ "error": "not found" }));
}

#[tokio::test]
async fn test_invalid_id_is_400() {
    let app = app();

    for uri in ["/users/0", "/users/x", "/users/-1"] {
        let response = call(&app, "GET", uri, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
    }
}

#[tokio::test]
async fn test_delete_missing_id_leaves_collection_unchanged() {
    let app = app();
    call(&app, "POST", "/users", Some(json!({ "name": "A", "email": "a@example.com" }))).await;

    let response = call(&app, "DELETE", "/users/42", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(user_count(&app).await, 1);
}

#[tokio::test]
async fn test_non_object_bodies_are_400() {
    let app = app();

    let response = call(&app, "POST", "/users", Some(json!(["Alice", "a@example.com"]))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "name & email required");

    let response = call(&app, "POST", "/users", Some(json!("Alice"))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "invalid JSON body");

    assert_eq!(user_count(&app).await, 0);
}
