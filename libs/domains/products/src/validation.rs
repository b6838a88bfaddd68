//! Turns loose request bodies into [`NewProduct`] / [`ProductChanges`].
//!
//! Parsing comes first: presence, then the JSON type of each field. Ranges
//! and emptiness live on the `Validate` derive of the typed input, whose
//! report is read in field order (name, price, stock), so clients always see
//! the same message for the same body.

use serde_json::Value;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{NewProduct, ProductChanges, ProductPayload};

pub const NAME_AND_PRICE_REQUIRED: &str = "name & price required";
pub const NAME_NOT_EMPTY: &str = "name must not be empty";
pub const NAME_NOT_TEXT: &str = "name must be a string";
pub const PRICE_RANGE: &str = "price must be >= 0";
pub const STOCK_RANGE: &str = "stock must be >= 0";
pub const STOCK_NOT_INTEGER: &str = "stock must be an integer";
pub const NOTHING_TO_UPDATE: &str = "nothing to update";

fn reject<T>(message: &str) -> ProductResult<T> {
    Err(ProductError::Validation(message.to_string()))
}

/// JSON `null` counts as absent.
fn present(value: Option<Value>) -> Option<Value> {
    value.filter(|v| !v.is_null())
}

/// Strings are trimmed; numbers are accepted and rendered as text.
fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A JSON number or a numeric string. Non-finite values are refused.
pub fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                s.parse::<f64>().ok()
            }
        }
        _ => None,
    };

    parsed.filter(|n| n.is_finite())
}

fn price(value: &Value) -> ProductResult<f64> {
    match number(value) {
        Some(p) => Ok(p),
        None => reject(PRICE_RANGE),
    }
}

fn stock(value: &Value) -> ProductResult<i32> {
    let Some(s) = number(value) else {
        return reject(STOCK_RANGE);
    };

    if s.fract() != 0.0 {
        return reject(STOCK_NOT_INTEGER);
    }
    if s < f64::from(i32::MIN) {
        return reject(STOCK_RANGE);
    }
    if s > f64::from(i32::MAX) {
        return reject(STOCK_NOT_INTEGER);
    }

    Ok(s as i32)
}

fn name(value: &Value) -> ProductResult<String> {
    match text(value) {
        Some(n) => Ok(n),
        None => reject(NAME_NOT_TEXT),
    }
}

/// Validates a create body. `stock` defaults to 0.
pub fn new_product(payload: ProductPayload) -> ProductResult<NewProduct> {
    let name = present(payload.name)
        .as_ref()
        .and_then(text)
        .filter(|n| !n.is_empty());
    let raw_price = present(payload.price);

    let (Some(name), Some(raw_price)) = (name, raw_price) else {
        return reject(NAME_AND_PRICE_REQUIRED);
    };

    let input = NewProduct {
        name,
        price: price(&raw_price)?,
        stock: match present(payload.stock) {
            Some(v) => stock(&v)?,
            None => 0,
        },
    };

    input.validate()?;
    Ok(input)
}

/// Validates an update body. At least one field must be supplied.
pub fn product_changes(payload: ProductPayload) -> ProductResult<ProductChanges> {
    let changes = ProductChanges {
        name: present(payload.name).as_ref().map(name).transpose()?,
        price: present(payload.price).as_ref().map(price).transpose()?,
        stock: present(payload.stock).as_ref().map(stock).transpose()?,
    };

    if changes.is_empty() {
        return reject(NOTHING_TO_UPDATE);
    }

    changes.validate()?;
    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PRICE_TOO_LARGE;
    use axum_helpers::errors::first_validation_message;
    use serde_json::json;

    fn payload(body: Value) -> ProductPayload {
        serde_json::from_value(body).unwrap()
    }

    fn message(err: ProductError) -> String {
        match err {
            ProductError::Validation(msg) => msg,
            ProductError::Invalid(errors) => first_validation_message(&errors),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_create_defaults_stock_and_trims_name() {
        let input = new_product(payload(json!({ "name": "  Widget ", "price": 9.99 }))).unwrap();
        assert_eq!(
            input,
            NewProduct {
                name: "Widget".to_string(),
                price: 9.99,
                stock: 0,
            }
        );
    }

    #[test]
    fn test_create_accepts_numeric_strings() {
        let input =
            new_product(payload(json!({ "name": "Gadget", "price": "12.50", "stock": "4" })))
                .unwrap();
        assert_eq!(input.price, 12.5);
        assert_eq!(input.stock, 4);
    }

    #[test]
    fn test_create_requires_name_and_price() {
        for body in [
            json!({ "price": 1 }),
            json!({ "name": "Widget" }),
            json!({ "name": "", "price": 1 }),
            json!({ "name": "   ", "price": 1 }),
            json!({ "name": "Widget", "price": null }),
            json!({}),
        ] {
            let err = new_product(payload(body.clone())).unwrap_err();
            assert_eq!(message(err), NAME_AND_PRICE_REQUIRED, "body: {body}");
        }
    }

    #[test]
    fn test_create_rejects_bad_price() {
        for price in [json!(-1), json!("abc"), json!(""), json!("-0.5"), json!(true)] {
            let err = new_product(payload(json!({ "name": "Widget", "price": price }))).unwrap_err();
            assert_eq!(message(err), PRICE_RANGE);
        }
    }

    #[test]
    fn test_create_rejects_bad_stock() {
        let err = new_product(payload(json!({ "name": "W", "price": 1, "stock": -2 }))).unwrap_err();
        assert_eq!(message(err), STOCK_RANGE);

        let err =
            new_product(payload(json!({ "name": "W", "price": 1, "stock": "lots" }))).unwrap_err();
        assert_eq!(message(err), STOCK_RANGE);

        let err = new_product(payload(json!({ "name": "W", "price": 1, "stock": 1.5 }))).unwrap_err();
        assert_eq!(message(err), STOCK_NOT_INTEGER);
    }

    #[test]
    fn test_price_above_column_limit_is_rejected() {
        let err = new_product(payload(json!({ "name": "W", "price": 1e12 }))).unwrap_err();
        assert_eq!(message(err), PRICE_TOO_LARGE);

        let err = product_changes(payload(json!({ "price": "10000000000" }))).unwrap_err();
        assert_eq!(message(err), PRICE_TOO_LARGE);

        let input = new_product(payload(json!({ "name": "W", "price": 9_999_999_999.99 }))).unwrap();
        assert_eq!(input.price, 9_999_999_999.99);
    }

    #[test]
    fn test_type_errors_reported_before_ranges() {
        let err =
            new_product(payload(json!({ "name": "W", "price": -1, "stock": 1.5 }))).unwrap_err();
        assert_eq!(message(err), STOCK_NOT_INTEGER);
    }

    #[test]
    fn test_price_checked_before_stock() {
        let err =
            new_product(payload(json!({ "name": "W", "price": -1, "stock": -1 }))).unwrap_err();
        assert_eq!(message(err), PRICE_RANGE);
    }

    #[test]
    fn test_update_keeps_only_supplied_fields() {
        let changes = product_changes(payload(json!({ "stock": 5 }))).unwrap();
        assert_eq!(
            changes,
            ProductChanges {
                stock: Some(5),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_update_treats_null_as_absent() {
        let err = product_changes(payload(json!({ "name": null, "price": null }))).unwrap_err();
        assert_eq!(message(err), NOTHING_TO_UPDATE);
    }

    #[test]
    fn test_update_rejects_blank_name() {
        let err = product_changes(payload(json!({ "name": "  " }))).unwrap_err();
        assert_eq!(message(err), NAME_NOT_EMPTY);

        let err = product_changes(payload(json!({ "name": ["x"] }))).unwrap_err();
        assert_eq!(message(err), NAME_NOT_TEXT);
    }

    #[test]
    fn test_update_rejects_negative_values() {
        let err = product_changes(payload(json!({ "price": -3 }))).unwrap_err();
        assert_eq!(message(err), PRICE_RANGE);

        let err = product_changes(payload(json!({ "stock": -3 }))).unwrap_err();
        assert_eq!(message(err), STOCK_RANGE);
    }

    #[test]
    fn test_number_parsing() {
        assert_eq!(number(&json!(3)), Some(3.0));
        assert_eq!(number(&json!(" 2.5 ")), Some(2.5));
        assert_eq!(number(&json!("inf")), None);
        assert_eq!(number(&json!(null)), None);
        assert_eq!(number(&json!({})), None);
    }

    #[test]
    fn test_range_failures_come_from_field_rules() {
        let err = product_changes(payload(json!({ "name": "", "stock": -1 }))).unwrap_err();
        assert!(matches!(err, ProductError::Invalid(_)));
        assert_eq!(message(err), NAME_NOT_EMPTY);
    }
}
