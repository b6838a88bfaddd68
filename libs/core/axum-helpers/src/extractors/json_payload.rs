//! Lenient JSON body extractor.

use crate::errors::{AppError, ErrorResponse};
use axum::{
    Json,
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// JSON body extractor that tolerates a missing body.
///
/// Unlike `axum::Json` it does not insist on a `Content-Type` header, and an
/// empty body is read as `{}` so that field-level validation can report what
/// is missing. A top-level array carries no named fields and is read as `{}`
/// too; any other non-object value is rejected. Malformed JSON is a `400`
/// carrying the parser message as `detail`.
///
/// # Example
/// ```ignore
/// use axum_helpers::extractors::JsonPayload;
///
/// async fn create(JsonPayload(payload): JsonPayload<CreateProduct>) { /* ... */ }
/// ```
pub struct JsonPayload<T>(pub T);

fn invalid_body(detail: impl Into<String>) -> Response {
    let detail = detail.into();
    tracing::info!("Rejected JSON body: {}", detail);
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::with_detail("invalid JSON body", detail)),
    )
        .into_response()
}

impl<T, S> FromRequest<S> for JsonPayload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()).into_response())?;

        let value = if bytes.iter().all(u8::is_ascii_whitespace) {
            Value::Object(Map::new())
        } else {
            serde_json::from_slice::<Value>(&bytes).map_err(|e| invalid_body(e.to_string()))?
        };

        let fields = match value {
            Value::Object(fields) => fields,
            Value::Array(_) => Map::new(),
            other => {
                return Err(invalid_body(format!(
                    "expected a JSON object, found {}",
                    kind(&other)
                )));
            }
        };

        serde_json::from_value(Value::Object(fields))
            .map(JsonPayload)
            .map_err(|e| invalid_body(e.to_string()))
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, routing::post};
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize)]
    struct Named {
        name: Option<String>,
    }

    async fn handler(JsonPayload(body): JsonPayload<Named>) -> String {
        body.name.unwrap_or_else(|| "<none>".to_string())
    }

    async fn call(body: &'static str) -> (StatusCode, Vec<u8>) {
        use http_body_util::BodyExt;

        let app = Router::new().route("/", post(handler));
        let response = app
            .oneshot(Request::post("/").body(Body::from(body)).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_empty_body_reads_as_empty_object() {
        let (status, body) = call("").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"<none>");
    }

    #[tokio::test]
    async fn test_missing_content_type_is_accepted() {
        let (status, body) = call(r#"{"name":"Widget"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"Widget");
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let (status, body) = call("{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "invalid JSON body");
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn test_array_body_carries_no_fields() {
        let (status, body) = call(r#"["Widget"]"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"<none>");
    }

    #[tokio::test]
    async fn test_scalar_body_is_bad_request() {
        for raw in [r#""Widget""#, "42", "true", "null"] {
            let (status, body) = call(raw).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{raw}");
            let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(body["error"], "invalid JSON body");
            assert!(body["detail"].as_str().unwrap().contains("expected a JSON object"));
        }
    }
}
