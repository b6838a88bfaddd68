use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Largest price the catalogue accepts; matches the `NUMERIC(12,2)` column.
pub const PRICE_MAX: f64 = 9_999_999_999.99;
pub const PRICE_TOO_LARGE: &str = "price must be <= 9999999999.99";

fn price_within_limit(price: f64) -> Result<(), ValidationError> {
    if price > PRICE_MAX {
        return Err(ValidationError::new("price_too_large").with_message(PRICE_TOO_LARGE.into()));
    }
    Ok(())
}

/// A product as stored and returned by the API.
///
/// `Id` is whatever the backing store hands out: a serial integer for
/// PostgreSQL and the in-memory store, an ObjectId for MongoDB.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product<Id = i64> {
    pub id: Id,
    pub name: String,
    pub price: f64,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
}

/// Raw create/update body.
///
/// Fields are kept as loose JSON so that `"9.99"` and `9.99` are both
/// accepted; [`crate::validation`] turns this into typed input.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ProductPayload {
    #[schema(value_type = Option<String>, example = "Widget")]
    #[serde(default)]
    pub name: Option<Value>,
    /// Number or numeric string, `>= 0`
    #[schema(value_type = Option<f64>, example = 9.99)]
    #[serde(default)]
    pub price: Option<Value>,
    /// Integer or numeric string, `>= 0`
    #[schema(value_type = Option<i32>, example = 3)]
    #[serde(default)]
    pub stock: Option<Value>,
}

/// Validated input for creating a product.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NewProduct {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(
        range(min = 0.0, message = "price must be >= 0"),
        custom(function = "price_within_limit")
    )]
    pub price: f64,
    #[validate(range(min = 0, message = "stock must be >= 0"))]
    pub stock: i32,
}

/// Validated partial update. Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct ProductChanges {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(
        range(min = 0.0, message = "price must be >= 0"),
        custom(function = "price_within_limit")
    )]
    pub price: Option<f64>,
    #[validate(range(min = 0, message = "stock must be >= 0"))]
    pub stock: Option<i32>,
}

impl ProductChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.stock.is_none()
    }
}

impl<Id> Product<Id> {
    /// Applies `changes` in place, leaving absent fields untouched.
    pub fn apply(&mut self, changes: ProductChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(stock) = changes.stock {
            self.stock = stock;
        }
    }
}

/// Body of `GET /products/with-users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductsWithUsers<Id = i64> {
    pub products: Vec<Product<Id>>,
    pub users_count: u64,
}
