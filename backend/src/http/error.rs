//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use super::dto::{ErrorResponse, FieldErrorResponse, MessageResponse};
use super::validation::FieldErrors;
use crate::db::repository::RepositoryError;

pub const PRODUCT_NOT_FOUND: &str = "Product not found.";

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// One or more body fields missing or mistyped (400)
    Validation(FieldErrors),
    /// Body is not decodable JSON (400)
    BadRequest(String),
    /// Resource not found (404)
    NotFound(String),
    /// Storage failure (500)
    Repository(RepositoryError),
}

impl AppError {
    pub fn product_not_found() -> Self {
        AppError::NotFound(PRODUCT_NOT_FOUND.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => {
                tracing::debug!("Rejected request body: {}", errors);
                let body = FieldErrorResponse {
                    message: errors.into_map(),
                };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(MessageResponse::new(msg))).into_response()
            }
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(ErrorResponse { error: msg })).into_response()
            }
            AppError::Repository(err) => {
                tracing::error!("Repository failure: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Internal server error.".to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        // A row that disappears between lookup and write is still a 404.
        if err.is_not_found() {
            AppError::product_not_found()
        } else {
            AppError::Repository(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let mut errors = FieldErrors::new();
        errors.add("price", "missing");
        assert_eq!(
            AppError::Validation(errors).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::product_not_found().into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Repository(RepositoryError::query("boom"))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_bad_request_body_is_message_object() {
        let response = AppError::BadRequest("Failed to decode JSON object".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({"message": "Failed to decode JSON object"}));
    }

    #[test]
    fn test_repository_not_found_maps_to_404() {
        let err: AppError = RepositoryError::not_found("gone").into();
        assert!(matches!(err, AppError::NotFound(ref m) if m == PRODUCT_NOT_FOUND));
    }
}
