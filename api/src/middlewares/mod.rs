use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::AppError;
use crate::{AppState, models};

/// Resolve the bearer token to a live user and attach it to the request.
#[tracing::instrument(skip_all)]
pub async fn attach_user(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers())
        .map(ToOwned::to_owned)
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?;

    let claims = state.auth.verify_token(&token)?;

    let user = models::users::User::find_active(&state.db, claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("unknown user".to_string()))?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
