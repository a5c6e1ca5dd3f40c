use axum::extract::State;
use axum::routing::get;
use axum::{Extension, Json, Router};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use validator::Validate;

use super::HttpResponse;
use crate::error::AppError;
use crate::handlers::dashboard::{DashboardData, LoggedServing};
use crate::models::users::User;
use crate::{AppState, handlers};

pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/", get(dashboard).post(log_serving))
}

#[derive(Debug, Deserialize, Validate)]
struct ServingPayload {
    /// Defaults to today when the form leaves it out.
    date: Option<NaiveDate>,
    #[validate(length(min = 1))]
    name: String,
    #[validate(range(min = 1.0))]
    grams: f64,
}

async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<HttpResponse<DashboardData>>, AppError> {
    let data = handlers::dashboard::view(state, user).await?;
    Ok(Json(data.into()))
}

async fn log_serving(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<ServingPayload>,
) -> Result<Json<HttpResponse<LoggedServing>>, AppError> {
    payload.validate()?;

    let consumed_on = payload.date.unwrap_or_else(|| Utc::now().date_naive());
    let logged = handlers::dashboard::log_serving(
        state,
        user,
        consumed_on,
        &payload.name,
        payload.grams,
    )
    .await?;

    Ok(Json(logged.into()))
}
