use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use strum::Display;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum StorageOp {
    #[strum(serialize = "insert failed")]
    Insert,
    #[strum(serialize = "query failed")]
    Query,
    #[strum(serialize = "update failed")]
    Update,
    #[strum(serialize = "delete failed")]
    Delete,
}

#[derive(Debug, Error)]
pub enum UserError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    Invalid(#[from] ValidationErrors),

    #[error("not found")]
    NotFound,

    /// Another user already holds this email
    #[error("email already exists: {0}")]
    EmailTaken(String),

    #[error("{op}: {detail}")]
    Storage { op: StorageOp, detail: String },

    #[error("{0}")]
    Unavailable(String),
}

impl UserError {
    pub fn storage(op: StorageOp, detail: impl ToString) -> Self {
        UserError::Storage {
            op,
            detail: detail.to_string(),
        }
    }
}

pub type UserResult<T> = Result<T, UserError>;

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Validation(msg) => AppError::BadRequest(msg),
            UserError::Invalid(errors) => AppError::ValidationError(errors),
            UserError::NotFound => AppError::not_found(),
            UserError::EmailTaken(detail) => AppError::conflict("email already exists", detail),
            UserError::Storage { op, detail } => AppError::internal(op.to_string(), detail),
            UserError::Unavailable(msg) => AppError::internal("query failed", msg),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
