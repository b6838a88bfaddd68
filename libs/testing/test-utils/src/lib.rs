//! Shared test utilities for domain testing
//!
//! - `TestDatabase`: PostgreSQL container with automatic cleanup (feature: "postgres")
//! - `TestMongo`: MongoDB container with automatic cleanup (feature: "mongodb")
//! - `TestDataBuilder`: Deterministic test data generation (always available)
//! - `assertions`: Custom assertion helpers (always available)
//!
//! Container-backed tests need Docker and are marked `#[ignore]` in the
//! domain crates; run them with `cargo test -- --ignored`.
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! #[ignore = "requires Docker"]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_postgres_test");
//!
//!     let email = builder.email("alice");
//! }
//! ```

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "mongodb")]
mod mongodb;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

#[cfg(feature = "mongodb")]
pub use mongodb::TestMongo;

/// Builder for test data with deterministic randomization
///
/// Values derive from a seed, so a test sees the same data on every run while
/// different tests sharing one store do not collide.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_user");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// A name unique to this builder, e.g. `test-product-12345-main`
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// A lower-case email address unique to this builder
    pub fn email(&self, local: &str) -> String {
        format!("{}.{}@example.com", local.to_lowercase(), self.seed)
    }

    /// A price in `[0, 1000)` with two decimals
    pub fn price(&self, salt: u64) -> f64 {
        let cents = self.seed.wrapping_add(salt.wrapping_mul(7919)) % 100_000;
        cents as f64 / 100.0
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert that a price survived a round trip through NUMERIC(12,2)
    pub fn assert_price_eq(actual: f64, expected: f64, context: &str) {
        assert!(
            (actual - expected).abs() < 0.005,
            "{}: expected price {}, got {}",
            context,
            expected,
            actual
        );
    }
}
