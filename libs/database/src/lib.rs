//! Database library providing connectors and utilities for PostgreSQL and MongoDB
//!
//! # Features
//!
//! - `postgres` (default) - PostgreSQL support with SeaORM
//! - `mongodb` - MongoDB support
//! - `config` - Configuration support with `core_config::FromEnv`
//! - `all` - All of the above
//!
//! # Examples
//!
//! ## PostgreSQL
//!
//! ```ignore
//! use database::postgres::{self, PostgresConfig};
//! use core_config::FromEnv;
//!
//! let db = postgres::connect_from_config(PostgresConfig::from_env()?).await?;
//! postgres::check_health(&db).await?;
//! ```
//!
//! ## MongoDB
//!
//! ```ignore
//! use database::mongodb::{self, MongoConfig};
//!
//! let db = mongodb::connect_from_config(&MongoConfig::from_env()?).await?;
//! let collection = db.collection::<Document>("products");
//! ```

// Always available modules
pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(feature = "mongodb")]
pub mod mongodb;

// Re-exports for convenience
pub use common::{DatabaseError, DatabaseResult};
