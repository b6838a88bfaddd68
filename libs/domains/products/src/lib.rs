//! Products Domain
//!
//! Product catalogue with interchangeable storage backends (PostgreSQL,
//! MongoDB, in-memory) and a composite listing that also asks the users
//! service how many users exist.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, id parsing
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐     ┌──────────────┐
//! │   Service   │ ──► │ Users client │  ← GET {USERS_API_URL}/users
//! └──────┬──────┘     └──────────────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← trait + Postgres / MongoDB / in-memory
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Product, payloads, validation
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_products::{
//!     handlers, HttpUsersClient, InMemoryProductRepository, ProductService,
//!     UsersClientConfig,
//! };
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let users = HttpUsersClient::new(&UsersClientConfig::default())?;
//! let service = ProductService::new(InMemoryProductRepository::new(), Arc::new(users));
//!
//! let router = axum::Router::new().nest("/products", handlers::router(service));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod users_client;
pub mod validation;

// Re-export commonly used types
pub use error::{ProductError, ProductResult, StorageOp};
pub use handlers::ApiDoc;
pub use models::{NewProduct, Product, ProductChanges, ProductPayload, ProductsWithUsers};
pub use mongodb::{DocumentId, MongoProductRepository};
pub use postgres::PgProductRepository;
pub use repository::{InMemoryProductRepository, ProductKey, ProductRepository};
pub use service::ProductService;
pub use users_client::{HttpUsersClient, UserCounter, UsersClientConfig};
