// HTTP API Error Types
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};

use crate::auth::AuthError;
use crate::database::models::PayloadError;
use crate::database::DatabaseError;

/// HTTP API error rendered as `{"success": false, "error": <status>, "message": ...}`
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest,

    // 404 Not Found
    NotFound,

    // 405 Method Not Allowed
    MethodNotAllowed,

    // 422 Unprocessable Entity
    Unprocessable,

    // 400/401/403/500 depending on the rejection
    Auth(AuthError),

    // 500 Internal Server Error
    InternalServerError,

    // 503 Service Unavailable
    ServiceUnavailable,
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Auth(err) => err.status(),
            ApiError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> String {
        match self {
            ApiError::BadRequest => "bad request".to_string(),
            ApiError::NotFound => "resource not found".to_string(),
            ApiError::MethodNotAllowed => "Method Not Allowed".to_string(),
            ApiError::Unprocessable => "unprocessable".to_string(),
            ApiError::Auth(err) => err.to_string(),
            ApiError::InternalServerError => "Internal server error".to_string(),
            ApiError::ServiceUnavailable => "Service unavailable".to_string(),
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({
            "success": false,
            "error": self.status_code().as_u16(),
            "message": self.message()
        })
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}

impl From<PayloadError> for ApiError {
    fn from(err: PayloadError) -> Self {
        match err {
            PayloadError::MissingField => ApiError::BadRequest,
            PayloadError::Malformed(msg) => {
                tracing::debug!("Rejected drink payload: {}", msg);
                ApiError::Unprocessable
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        ApiError::BadRequest
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Conflict(msg) => {
                tracing::debug!("Write conflict: {}", msg);
                ApiError::Unprocessable
            }
            err if err.is_unavailable() => {
                tracing::error!("Database unavailable: {}", err);
                ApiError::ServiceUnavailable
            }
            err => {
                // Log the real error but return generic message
                tracing::error!("Database error: {}", err);
                ApiError::InternalServerError
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
