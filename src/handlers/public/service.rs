use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;

/// GET / - service description
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Coffee Shop API",
            "version": version,
            "endpoints": {
                "drinks": "GET /drinks (public)",
                "drinks_detail": "GET /drinks-detail (get:drinks-details)",
                "create": "POST /drinks (create:drinks)",
                "update": "PATCH /drinks/:id (update:drinks)",
                "delete": "DELETE /drinks/:id (delete:drinks)",
                "health": "GET /health (public)"
            }
        }
    }))
}

/// GET /health - database liveness
pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    if let Err(e) = state.drinks.ping().await {
        tracing::error!("Health check failed: {}", e);
        return Err(ApiError::ServiceUnavailable);
    }

    Ok(Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now(),
            "database": "ok"
        }
    })))
}
