use serde::Serialize;

use crate::AppState;
use crate::error::AppError;
use crate::models::users::User;

#[derive(Debug, Serialize)]
pub struct AuthSuccess {
    pub user: User,
    pub token: String,
}

#[tracing::instrument(skip_all)]
pub async fn register(
    state: AppState,
    username: &str,
    password: &str,
) -> Result<AuthSuccess, AppError> {
    if User::find_by_username(&state.db, username).await?.is_some() {
        return Err(AppError::Conflict("Username already exists.".to_string()));
    }

    let password_hash = state.auth.hash_password(password)?;
    let user = User::create(&state.db, username, &password_hash).await?;
    let token = state.auth.issue_token(user.id)?;

    tracing::info!("registered user {}", user.username);
    Ok(AuthSuccess { user, token })
}

#[tracing::instrument(skip_all)]
pub async fn login(state: AppState, username: &str, password: &str) -> Result<AuthSuccess, AppError> {
    let user = User::find_by_username(&state.db, username)
        .await?
        .ok_or_else(|| AppError::Unauthorized("invalid username or password".to_string()))?;

    if !state.auth.verify_password(&user.password_hash, password)? {
        return Err(AppError::Unauthorized(
            "invalid username or password".to_string(),
        ));
    }

    let token = state.auth.issue_token(user.id)?;
    Ok(AuthSuccess { user, token })
}
