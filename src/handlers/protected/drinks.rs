use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use tracing::info;

use crate::app::AppState;
use crate::auth::Claims;
use crate::database::models::{Drink, DrinkLong, DrinkPayload};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Deleted, Drinks};

/// Ids are integers; anything else names no drink
fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>().map_err(|_| ApiError::NotFound)
}

/// GET /drinks-detail - every drink with its full recipe
pub async fn detail(State(state): State<AppState>) -> ApiResult<Drinks<DrinkLong>> {
    let drinks = state.drinks.list().await?;
    Ok(ApiResponse::success(Drinks::new(
        drinks.iter().map(Drink::long).collect(),
    )))
}

/// POST /drinks - add a drink, returning it as a one-element list
pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<DrinkPayload>, JsonRejection>,
) -> ApiResult<Drinks<DrinkLong>> {
    let Json(payload) = payload?;
    let drink = payload.validate()?;

    let created = state.drinks.insert(drink).await?;
    info!("Drink {} '{}' created by {}", created.id, created.title, claims.sub);

    Ok(ApiResponse::success(Drinks::one(created.long())))
}

/// PATCH /drinks/:id - replace title and recipe of an existing drink
pub async fn update(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    payload: Result<Json<DrinkPayload>, JsonRejection>,
) -> ApiResult<Drinks<DrinkLong>> {
    let id = parse_id(&id)?;

    // Existence is checked before the body is looked at
    if state.drinks.get(id).await?.is_none() {
        return Err(ApiError::NotFound);
    }

    let Json(payload) = payload?;
    let drink = payload.validate()?;

    let updated = state.drinks.update(id, drink).await?.ok_or(ApiError::NotFound)?;
    info!("Drink {} updated by {}", updated.id, claims.sub);

    Ok(ApiResponse::success(Drinks::one(updated.long())))
}

/// DELETE /drinks/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> ApiResult<Deleted> {
    let id = parse_id(&id)?;

    if !state.drinks.delete(id).await? {
        return Err(ApiError::NotFound);
    }
    info!("Drink {} deleted by {}", id, claims.sub);

    Ok(ApiResponse::success(Deleted { delete: id }))
}
