use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::error::AppError;

impl AppError {
    /// HTTP status this error maps to at the request boundary.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) | AppError::InvalidCategories { .. } => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API-specific error wrapper that converts AppError into HTTP responses.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(%status, "request failed: {}", self);
        } else {
            tracing::warn!(%status, "request rejected: {}", self);
        }

        let body = match self {
            AppError::Validation(errors) => json!({ "errors": errors }),
            AppError::InvalidCategories { valid } => json!({
                "error": "None of the requested categories exist",
                "validCategories": valid,
            }),
            AppError::NotFound(msg) | AppError::BadRequest(msg) | AppError::Conflict(msg) => {
                json!({ "error": msg })
            }
            AppError::Database(msg) => json!({ "error": format!("Database error: {}", msg) }),
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Malformed or non-JSON request bodies are reported as plain bad requests.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_renders_errors_array() {
        let response =
            AppError::Validation(vec!["title is required".to_string()]).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["errors"][0], "title is required");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_invalid_categories_lists_valid_set() {
        let response = AppError::InvalidCategories {
            valid: vec!["mongodb".to_string(), "rust".to_string()],
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["validCategories"], json!(["mongodb", "rust"]));
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_status_mapping() {
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Database("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_database_error_body() {
        let body = body_json(AppError::Database("connection refused".into()).into_response()).await;
        assert_eq!(body["error"], "Database error: connection refused");
    }
}
