//! Reusable OpenAPI response types for consistent API documentation.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Bad Request - missing or invalid field",
    content_type = "application/json",
    example = json!({ "error": "name & price required" })
)]
pub struct BadRequestResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - path id is not a valid identifier",
    content_type = "application/json",
    example = json!({ "error": "invalid id" })
)]
pub struct InvalidIdResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({ "error": "not found" })
)]
pub struct NotFoundResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Conflict - unique value already taken",
    content_type = "application/json",
    example = json!({
        "error": "email already exists",
        "detail": "duplicate key value violates unique constraint \"users_email_key\""
    })
)]
pub struct ConflictResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Storage failure",
    content_type = "application/json",
    example = json!({ "error": "query failed", "detail": "connection refused" })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Gateway - composite request could not be assembled",
    content_type = "application/json",
    example = json!({ "error": "failed to fetch data", "detail": "connection refused" })
)]
pub struct BadGatewayResponse(pub ErrorResponse);
