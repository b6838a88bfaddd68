pub mod handlers;
pub mod responses;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Standard error response structure.
///
/// Every failed request renders this body. `detail` carries the underlying
/// cause for storage and upstream failures and is omitted otherwise.
///
/// # JSON Example
///
/// ```json
/// { "error": "query failed", "detail": "connection refused" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
    /// Underlying cause, when one exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detail: None,
        }
    }

    pub fn with_detail(error: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detail: Some(detail.into()),
        }
    }
}

/// Application error type that can be converted to HTTP responses.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {message}")]
    Conflict {
        message: String,
        detail: Option<String>,
    },

    #[error("Internal Server Error: {message}")]
    InternalServerError {
        message: String,
        detail: Option<String>,
    },

    #[error("Bad Gateway: {message}")]
    BadGateway {
        message: String,
        detail: Option<String>,
    },
}

impl AppError {
    pub fn not_found() -> Self {
        AppError::NotFound("not found".to_string())
    }

    pub fn conflict(message: impl Into<String>, detail: impl Display) -> Self {
        AppError::Conflict {
            message: message.into(),
            detail: Some(detail.to_string()),
        }
    }

    pub fn internal(message: impl Into<String>, detail: impl Display) -> Self {
        AppError::InternalServerError {
            message: message.into(),
            detail: Some(detail.to_string()),
        }
    }

    pub fn bad_gateway(message: impl Into<String>, detail: impl Display) -> Self {
        AppError::BadGateway {
            message: message.into(),
            detail: Some(detail.to_string()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::InternalServerError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadGateway { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Picks one message out of a validator report.
///
/// Fields are visited in name order so a request failing several rules always
/// gets the same answer.
pub fn first_validation_message(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.iter().collect();
    fields.sort_by(|(a, _), (b, _)| a.cmp(b));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| {
                err.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .next()
        .unwrap_or_else(|| "validation failed".to_string())
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            AppError::BadRequest(msg) => {
                tracing::info!("Bad request: {}", msg);
                ErrorResponse::new(msg)
            }
            AppError::ValidationError(e) => {
                let msg = first_validation_message(&e);
                tracing::info!("Validation error: {}", msg);
                ErrorResponse::new(msg)
            }
            AppError::NotFound(msg) => {
                tracing::info!("Not found: {}", msg);
                ErrorResponse::new(msg)
            }
            AppError::Conflict { message, detail } => {
                tracing::info!(detail = ?detail, "Conflict: {}", message);
                ErrorResponse { error: message, detail }
            }
            AppError::InternalServerError { message, detail } => {
                tracing::error!(detail = ?detail, "Internal server error: {}", message);
                ErrorResponse { error: message, detail }
            }
            AppError::BadGateway { message, detail } => {
                tracing::error!(detail = ?detail, "Bad gateway: {}", message);
                ErrorResponse { error: message, detail }
            }
        };

        (status, Json(body)).into_response()
    }
}
