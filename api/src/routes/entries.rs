use axum::extract::{Path, State};
use axum::routing::put;
use axum::{Extension, Json, Router};
use serde::Deserialize;
use sqlx::types::Uuid;
use validator::Validate;

use super::HttpResponse;
use crate::error::AppError;
use crate::models::food_entries::FoodEntry;
use crate::models::users::User;
use crate::{AppState, handlers};

pub fn entry_routes() -> Router<AppState> {
    Router::new().route("/{id}", put(edit_entry).delete(delete_entry))
}

#[derive(Debug, Deserialize, Validate)]
struct EditGramsPayload {
    #[validate(range(min = 1.0))]
    grams: f64,
}

async fn edit_entry(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EditGramsPayload>,
) -> Result<Json<HttpResponse<FoodEntry>>, AppError> {
    payload.validate()?;
    let entry = handlers::entries::edit_grams(state, user, id, payload.grams).await?;
    Ok(Json(entry.into()))
}

async fn delete_entry(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
) -> Result<Json<HttpResponse<bool>>, AppError> {
    handlers::entries::delete(state, user, id).await?;
    Ok(Json(true.into()))
}
