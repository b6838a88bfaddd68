//! Identifier path parameter extractor with automatic validation.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Response},
};

/// Message returned for any path id that fails to parse.
pub const INVALID_ID: &str = "invalid id";

/// An identifier that can be parsed out of a URL path segment.
///
/// Each storage backend has its own id format; the extractor only needs to
/// know whether a raw segment is acceptable.
pub trait PathId: Sized {
    fn parse_path_id(raw: &str) -> Option<Self>;
}

/// Relational and in-memory stores hand out positive integers only.
impl PathId for i64 {
    fn parse_path_id(raw: &str) -> Option<Self> {
        raw.parse::<i64>().ok().filter(|id| *id > 0)
    }
}

/// Extractor for identifier path parameters.
///
/// Rejects malformed ids with `400 {"error": "invalid id"}` before the
/// handler (and therefore storage) is reached.
///
/// # Example
/// ```ignore
/// use axum::Router;
/// use axum::routing::get;
/// use axum_helpers::extractors::IdPath;
///
/// async fn get_product(IdPath(id): IdPath<i64>) -> String {
///     format!("Product ID: {}", id)
/// }
///
/// let app = Router::new().route("/products/{id}", get(get_product));
/// ```
pub struct IdPath<I>(pub I);

impl<I, S> FromRequestParts<S> for IdPath<I>
where
    I: PathId,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::BadRequest(INVALID_ID.to_string()).into_response())?;

        I::parse_path_id(raw.trim())
            .map(IdPath)
            .ok_or_else(|| AppError::BadRequest(INVALID_ID.to_string()).into_response())
    }
}
