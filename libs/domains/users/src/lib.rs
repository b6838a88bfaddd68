//! Users Domain
//!
//! User directory with a unique, normalized email per user.
//!
//! ```text
//! Handlers  →  UserService  →  UserRepository (Postgres | in-memory)
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{InMemoryUserRepository, UserService, handlers};
//!
//! let service = UserService::new(InMemoryUserRepository::new());
//! let router = axum::Router::new().nest("/users", handlers::router(service));
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod validation;

pub use error::{StorageOp, UserError, UserResult};
pub use handlers::ApiDoc;
pub use models::{NewUser, User, UserChanges, UserPayload};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
