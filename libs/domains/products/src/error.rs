use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use strum::Display;
use thiserror::Error;
use validator::ValidationErrors;

/// Storage operation that failed, rendered as the public error message.
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
pub enum ProductError {
    /// Input rejected before reaching storage
    #[error("{0}")]
    Validation(String),

    /// Range checks on normalized input
    #[error("Invalid input: {0}")]
    Invalid(#[from] ValidationErrors),

    #[error("not found")]
    NotFound,

    #[error("{op}: {detail}")]
    Storage { op: StorageOp, detail: String },

    /// Store unreachable (health checks)
    #[error("{0}")]
    Unavailable(String),

    /// Local listing failed inside the composite endpoint
    #[error("failed to fetch data: {0}")]
    Composite(String),

    /// In-memory snapshot could not be read or written
    #[error("Snapshot error: {0}")]
    Snapshot(String),
}

impl ProductError {
    pub fn storage(op: StorageOp, detail: impl ToString) -> Self {
        ProductError::Storage {
            op,
            detail: detail.to_string(),
        }
    }

    /// The detail of a storage failure, for wrapping into another error.
    pub fn into_detail(self) -> String {
        match self {
            ProductError::Storage { detail, .. } => detail,
            other => other.to_string(),
        }
    }
}

pub type ProductResult<T> = Result<T, ProductError>;

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::Validation(msg) => AppError::BadRequest(msg),
            ProductError::Invalid(errors) => AppError::ValidationError(errors),
            ProductError::NotFound => AppError::not_found(),
            ProductError::Storage { op, detail } => AppError::internal(op.to_string(), detail),
            ProductError::Unavailable(msg) => AppError::internal("query failed", msg),
            ProductError::Composite(detail) => AppError::bad_gateway("failed to fetch data", detail),
            ProductError::Snapshot(msg) => AppError::internal("snapshot failed", msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
