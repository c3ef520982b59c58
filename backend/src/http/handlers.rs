//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates persistence to
//! the service layer in [`crate::db::services`].

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};

use super::dto::{
    CreateProductResponse, HealthResponse, MessageResponse, Product, SERVICE_NAME,
    SERVICE_VERSION,
};
use super::error::AppError;
use super::state::AppState;
use super::validation::{validate_create, validate_patch};
use crate::api::ProductId;
use crate::db::services as db_services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Liveness probe. Does not touch the repository and never fails.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        version: SERVICE_VERSION.to_string(),
        service: SERVICE_NAME.to_string(),
    })
}

// =============================================================================
// Product collection
// =============================================================================

/// GET /api/products
pub async fn list_products(State(state): State<AppState>) -> HandlerResult<Vec<Product>> {
    let products = db_services::list_products(state.repository.as_ref()).await?;
    Ok(Json(products))
}

/// POST /api/products
///
/// Body `{name: string, price: number}`; both required.
pub async fn create_product(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreateProductResponse>), AppError> {
    let new_product = validate_create(&decode_body(&body)?)?;
    let product = db_services::create_product(state.repository.as_ref(), &new_product).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateProductResponse {
            message: "Product added successfully.".to_string(),
            product_id: product.id.value(),
        }),
    ))
}

// =============================================================================
// Single product
// =============================================================================

/// GET /api/products/{product_id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> HandlerResult<Product> {
    let product = require_product(&state, ProductId::new(product_id)).await?;
    Ok(Json(product))
}

/// PATCH /api/products/{product_id}
///
/// The product is looked up before the body is read, so an unknown id is a
/// 404 whatever the body contains.
pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
    body: Bytes,
) -> HandlerResult<MessageResponse> {
    let product_id = ProductId::new(product_id);
    require_product(&state, product_id).await?;

    let changes = validate_patch(&decode_body(&body)?)?;
    db_services::update_product(state.repository.as_ref(), product_id, &changes).await?;

    Ok(Json(MessageResponse::new("Product updated successfully.")))
}

/// DELETE /api/products/{product_id}
pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> HandlerResult<MessageResponse> {
    let product_id = ProductId::new(product_id);
    require_product(&state, product_id).await?;

    db_services::delete_product(state.repository.as_ref(), product_id).await?;

    Ok(Json(MessageResponse::new("Product deleted.")))
}

async fn require_product(state: &AppState, product_id: ProductId) -> Result<Product, AppError> {
    db_services::get_product(state.repository.as_ref(), product_id)
        .await?
        .ok_or_else(AppError::product_not_found)
}

/// An empty body decodes to `{}`.
fn decode_body(body: &Bytes) -> Result<Value, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Failed to decode JSON object: {}", e)))
}
