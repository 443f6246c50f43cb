use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

/// Wrapper for API responses that adds `"success": true` beside the body's fields
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with 200 status
    pub fn success(data: T) -> Self {
        Self { data }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return crate::error::ApiError::InternalServerError.into_response();
            }
        };

        // Object bodies are flattened into the envelope; anything else goes under "data"
        let envelope = match data_value {
            Value::Object(mut map) => {
                map.insert("success".to_string(), Value::Bool(true));
                Value::Object(map)
            }
            other => json!({ "success": true, "data": other }),
        };

        (StatusCode::OK, Json(envelope)).into_response()
    }
}

/// `{"drinks": [...]}`
#[derive(Debug, Serialize)]
pub struct Drinks<T: Serialize> {
    pub drinks: Vec<T>,
}

impl<T: Serialize> Drinks<T> {
    pub fn new(drinks: Vec<T>) -> Self {
        Self { drinks }
    }

    pub fn one(drink: T) -> Self {
        Self { drinks: vec![drink] }
    }
}

/// `{"delete": id}`
#[derive(Debug, Serialize)]
pub struct Deleted {
    pub delete: i32,
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
