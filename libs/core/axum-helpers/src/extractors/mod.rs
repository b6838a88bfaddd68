//! Custom extractors for Axum handlers.
//!
//! This module provides reusable extractors that reduce boilerplate
//! and standardize error handling across your API.

pub mod id_path;
pub mod json_payload;

pub use id_path::{IdPath, PathId};
pub use json_payload::JsonPayload;
