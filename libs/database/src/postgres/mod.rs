//! PostgreSQL database connector and utilities
//!
//! Provides connection management, health checks and error classification.

mod config;
mod connector;
mod health;

pub use config::{DEFAULT_DATABASE_URL, PostgresConfig};
pub use connector::{connect, connect_from_config, connect_with_options};
pub use health::check_health;

// Re-export SeaORM types for convenience
pub use sea_orm::{ConnectOptions, DatabaseConnection, DbErr};

use sea_orm::SqlErr;

/// True when `err` is a unique-constraint violation reported by the server.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
