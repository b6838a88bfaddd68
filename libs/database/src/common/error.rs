/// Unified database error type for connector and health operations
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// PostgreSQL-specific errors (SeaORM)
    #[cfg(feature = "postgres")]
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sea_orm::DbErr),

    /// MongoDB driver errors
    #[cfg(feature = "mongodb")]
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// Connection could not be established
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Health check failed
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;
