use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use validator::Validate;

use super::HttpResponse;
use crate::error::AppError;
use crate::handlers::auth::AuthSuccess;
use crate::{AppState, handlers};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[derive(Debug, Deserialize, Validate)]
struct RegisterPayload {
    #[validate(length(min = 1, max = 100))]
    username: String,
    #[validate(length(min = 8))]
    password: String,
}

#[derive(Debug, Deserialize, Validate)]
struct LoginPayload {
    #[validate(length(min = 1))]
    username: String,
    #[validate(length(min = 1))]
    password: String,
}

async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<Json<HttpResponse<AuthSuccess>>, AppError> {
    payload.validate()?;
    let success = handlers::auth::register(state, &payload.username, &payload.password).await?;
    Ok(Json(success.into()))
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<HttpResponse<AuthSuccess>>, AppError> {
    payload.validate()?;
    let success = handlers::auth::login(state, &payload.username, &payload.password).await?;
    Ok(Json(success.into()))
}
