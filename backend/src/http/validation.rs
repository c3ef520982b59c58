//! Typed request-body validation.
//!
//! Each validator takes the decoded JSON body and returns either the parsed
//! domain struct or every field error found, before any handler logic runs.
//!
//! Accepted field types:
//! - `name`: JSON string.
//! - `price`: JSON number, or a string holding a finite decimal number
//!   (`"9.99"`). Non-finite values are rejected.
//!
//! `null` counts as "not supplied".

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use crate::api::{NewProduct, ProductChanges};

const MISSING: &str = "Missing required parameter in the JSON body";

/// Field name to error message, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Validate a `POST /api/products` body.
pub fn validate_create(body: &Value) -> Result<NewProduct, FieldErrors> {
    let empty = Map::new();
    let fields = body.as_object().unwrap_or(&empty);
    let mut errors = FieldErrors::new();

    let name = match parse_name(fields) {
        Ok(Some(name)) => Some(name),
        Ok(None) => {
            errors.add("name", MISSING);
            None
        }
        Err(msg) => {
            errors.add("name", msg);
            None
        }
    };

    let price = match parse_price(fields) {
        Ok(Some(price)) => Some(price),
        Ok(None) => {
            errors.add("price", MISSING);
            None
        }
        Err(msg) => {
            errors.add("price", msg);
            None
        }
    };

    match (name, price) {
        (Some(name), Some(price)) => Ok(NewProduct { name, price }),
        _ => Err(errors),
    }
}

/// Validate a `PATCH /api/products/{id}` body.
///
/// Only truthy values are kept: an empty `name` or a zero `price` is
/// dropped as if it had not been sent.
pub fn validate_patch(body: &Value) -> Result<ProductChanges, FieldErrors> {
    let empty = Map::new();
    let fields = body.as_object().unwrap_or(&empty);
    let mut errors = FieldErrors::new();

    let name = parse_name(fields).unwrap_or_else(|msg| {
        errors.add("name", msg);
        None
    });
    let price = parse_price(fields).unwrap_or_else(|msg| {
        errors.add("price", msg);
        None
    });

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ProductChanges {
        name: name.filter(|n| !n.is_empty()),
        price: price.filter(|p| *p != 0.0),
    })
}

fn parse_name(fields: &Map<String, Value>) -> Result<Option<String>, String> {
    match fields.get("name") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(format!(
            "Invalid value for name: expected a string, got {}",
            json_type(other)
        )),
    }
}

fn parse_price(fields: &Map<String, Value>) -> Result<Option<f64>, String> {
    let price = match fields.get("price") {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(other) => {
            return Err(format!(
                "Invalid value for price: expected a number, got {}",
                json_type(other)
            ))
        }
    };

    match price {
        Some(p) if p.is_finite() => Ok(Some(p)),
        _ => Err("Invalid value for price: expected a finite number".to_string()),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_valid() {
        let product = validate_create(&json!({"name": "Widget", "price": 9.99})).unwrap();
        assert_eq!(product.name, "Widget");
        assert_eq!(product.price, 9.99);
    }

    #[test]
    fn test_create_accepts_integer_and_numeric_string_price() {
        assert_eq!(
            validate_create(&json!({"name": "A", "price": 3})).unwrap().price,
            3.0
        );
        assert_eq!(
            validate_create(&json!({"name": "A", "price": "4.5"}))
                .unwrap()
                .price,
            4.5
        );
    }

    #[test]
    fn test_create_missing_price() {
        let errors = validate_create(&json!({"name": "Widget"})).unwrap_err();
        assert_eq!(errors.get("price"), Some(MISSING));
        assert!(errors.get("name").is_none());
    }

    #[test]
    fn test_create_reports_every_field() {
        let errors = validate_create(&json!({})).unwrap_err();
        assert!(errors.get("name").is_some());
        assert!(errors.get("price").is_some());
    }

    #[test]
    fn test_create_wrong_types() {
        let errors = validate_create(&json!({"name": 12, "price": "cheap"})).unwrap_err();
        assert!(errors.get("name").unwrap().contains("expected a string"));
        assert!(errors.get("price").unwrap().contains("finite number"));

        let errors = validate_create(&json!({"name": "A", "price": true})).unwrap_err();
        assert!(errors.get("price").unwrap().contains("boolean"));
    }

    #[test]
    fn test_create_null_is_missing() {
        let errors = validate_create(&json!({"name": null, "price": 1.0})).unwrap_err();
        assert_eq!(errors.get("name"), Some(MISSING));
    }

    #[test]
    fn test_create_non_object_body() {
        let errors = validate_create(&json!([1, 2])).unwrap_err();
        assert!(errors.get("name").is_some());
        assert!(errors.get("price").is_some());
    }

    #[test]
    fn test_create_rejects_non_finite_string_price() {
        let errors = validate_create(&json!({"name": "A", "price": "inf"})).unwrap_err();
        assert!(errors.get("price").is_some());
    }

    #[test]
    fn test_patch_partial() {
        let changes = validate_patch(&json!({"price": 15.0})).unwrap();
        assert_eq!(changes.name, None);
        assert_eq!(changes.price, Some(15.0));
    }

    #[test]
    fn test_patch_drops_falsy_values() {
        let changes = validate_patch(&json!({"name": "", "price": 0})).unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn test_patch_empty_body() {
        assert!(validate_patch(&json!({})).unwrap().is_empty());
        assert!(validate_patch(&Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_patch_wrong_type() {
        let errors = validate_patch(&json!({"name": ["x"]})).unwrap_err();
        assert!(errors.get("name").unwrap().contains("array"));
    }

    #[test]
    fn test_field_errors_display() {
        let mut errors = FieldErrors::new();
        errors.add("price", "bad");
        errors.add("name", "worse");
        assert_eq!(errors.to_string(), "name: worse; price: bad");
    }
}
