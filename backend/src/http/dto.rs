//! Data Transfer Objects for the HTTP API.
//!
//! Products themselves are serialized straight from [`crate::api::Product`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use crate::api::Product;

pub const SERVICE_NAME: &str = "product-api";
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "healthy"
    pub status: String,
    /// Current UTC time, ISO-8601
    pub timestamp: String,
    pub version: String,
    pub service: String,
}

/// Response for product creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductResponse {
    pub message: String,
    #[serde(rename = "productId")]
    pub product_id: i64,
}

/// Plain confirmation message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `{"error": "..."}` body used for 404 and 500 responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// 400 body listing every failing field: `{"message": {"price": "..."}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldErrorResponse {
    pub message: BTreeMap<String, String>,
}
