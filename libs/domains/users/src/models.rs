use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

/// A user as stored and returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Alice")]
    pub name: String,
    /// Always trimmed and lower-case
    #[schema(example = "alice@example.com")]
    pub email: String,
}

/// Raw create/update body, checked by [`crate::validation`]
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UserPayload {
    #[schema(value_type = Option<String>, example = "Alice")]
    #[serde(default)]
    pub name: Option<Value>,
    #[schema(value_type = Option<String>, example = "Alice@Example.com")]
    #[serde(default)]
    pub email: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "email must not be empty"))]
    pub email: String,
}

/// Partial update; only `Some` fields are written
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct UserChanges {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "email must not be empty"))]
    pub email: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

impl User {
    pub fn apply(&mut self, changes: UserChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
    }
}
