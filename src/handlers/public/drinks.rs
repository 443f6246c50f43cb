use axum::extract::State;

use crate::app::AppState;
use crate::database::models::{Drink, DrinkShort};
use crate::middleware::{ApiResponse, ApiResult, Drinks};

/// GET /drinks - the public menu, recipes without quantities
pub async fn list(State(state): State<AppState>) -> ApiResult<Drinks<DrinkShort>> {
    let drinks = state.drinks.list().await?;
    Ok(ApiResponse::success(Drinks::new(
        drinks.iter().map(Drink::short).collect(),
    )))
}
