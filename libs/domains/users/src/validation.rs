//! Normalizes user bodies: names are trimmed, emails trimmed and lower-cased.
//!
//! Type problems are reported here; emptiness is checked by the `Validate`
//! derive on [`NewUser`] / [`UserChanges`].

use serde_json::Value;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{NewUser, UserChanges, UserPayload};

pub const NAME_AND_EMAIL_REQUIRED: &str = "name & email required";
pub const NAME_NOT_EMPTY: &str = "name must not be empty";
pub const EMAIL_NOT_EMPTY: &str = "email must not be empty";
pub const NAME_NOT_TEXT: &str = "name must be a string";
pub const EMAIL_NOT_TEXT: &str = "email must be a string";
pub const NOTHING_TO_UPDATE: &str = "nothing to update";

fn reject<T>(message: &str) -> UserResult<T> {
    Err(UserError::Validation(message.to_string()))
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

/// An optional text field; anything but a string or number is rejected.
fn optional_text(value: Option<Value>, not_text: &str) -> UserResult<Option<String>> {
    match present(value) {
        Some(v) => match text(&v) {
            Some(t) => Ok(Some(t)),
            None => reject(not_text),
        },
        None => Ok(None),
    }
}

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn new_user(payload: UserPayload) -> UserResult<NewUser> {
    let name = present(payload.name)
        .as_ref()
        .and_then(text)
        .filter(|n| !n.is_empty());
    let email = present(payload.email)
        .as_ref()
        .and_then(text)
        .map(|e| normalize_email(&e))
        .filter(|e| !e.is_empty());

    let (Some(name), Some(email)) = (name, email) else {
        return reject(NAME_AND_EMAIL_REQUIRED);
    };

    let input = NewUser { name, email };
    input.validate()?;
    Ok(input)
}

pub fn user_changes(payload: UserPayload) -> UserResult<UserChanges> {
    let changes = UserChanges {
        name: optional_text(payload.name, NAME_NOT_TEXT)?,
        email: optional_text(payload.email, EMAIL_NOT_TEXT)?.map(|e| normalize_email(&e)),
    };

    if changes.is_empty() {
        return reject(NOTHING_TO_UPDATE);
    }

    changes.validate()?;
    Ok(changes)
}
