use axum::extract::State;
use axum::routing::get;
use axum::{Extension, Json, Router};
use nutrition_core::models::foods::Food;

use super::HttpResponse;
use crate::AppState;
use crate::error::AppError;
use crate::models::users::User;

pub fn food_routes() -> Router<AppState> {
    Router::new().route("/", get(available_foods))
}

/// The food names a serving can be logged against, for the entry form.
async fn available_foods(
    State(state): State<AppState>,
    Extension(_user): Extension<User>,
) -> Result<Json<HttpResponse<Vec<String>>>, AppError> {
    let mut conn = state.db.acquire().await?;
    let names = Food::available_names(conn.as_mut()).await?;
    Ok(Json(names.into()))
}
