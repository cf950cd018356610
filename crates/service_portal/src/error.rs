//! JSON error responses of the `/api` routes.

use adapter_backend::BackendError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use serde_json::Value;

/// Body of an error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// Present on routes whose success body also carries `success`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    /// Short description of what failed
    pub error: String,
    /// Underlying cause
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Request context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Error returned by an API handler.
#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    /// Error with a status and a short description
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                success: None,
                error: error.into(),
                message: None,
                details: None,
            },
        }
    }

    /// 400 Bad Request
    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    /// 401 Unauthorized
    pub fn unauthorized(error: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, error)
    }

    /// 404 Not Found
    pub fn not_found(error: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, error)
    }

    /// 500 with `error` and the cause in `message`
    pub fn upstream(error: impl Into<String>, cause: &BackendError) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error).with_message(cause.to_string())
    }

    /// Set `message`
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.body.message = Some(message.into());
        self
    }

    /// Set `success: false`
    pub fn with_success_flag(mut self) -> Self {
        self.body.success = Some(false);
        self
    }

    /// Set `details`
    pub fn with_details(mut self, details: Value) -> Self {
        self.body.details = Some(details);
        self
    }

    /// Response status
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response body
    pub fn body(&self) -> &ErrorBody {
        &self.body
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_body() {
        let err = ApiError::not_found("Product not found");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            serde_json::to_value(err.body()).unwrap(),
            json!({ "error": "Product not found" })
        );
    }

    #[test]
    fn test_upstream_body() {
        let err = ApiError::upstream("Failed to fetch product", &BackendError::MissingToken)
            .with_success_flag()
            .with_details(json!({ "isin": "FR1" }));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            serde_json::to_value(err.body()).unwrap(),
            json!({
                "success": false,
                "error": "Failed to fetch product",
                "message": "No access token",
                "details": { "isin": "FR1" }
            })
        );
    }

    #[tokio::test]
    async fn test_into_response() {
        let response = ApiError::bad_request("ISIN parameter is required").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "ISIN parameter is required");
    }
}
