mod error;
mod handlers;
mod middlewares;
mod models;
mod routes;
mod services;

use axum::Router;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::middleware::from_fn_with_state;
use axum::response::Redirect;
use axum::routing::get;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::middlewares::attach_user;
use crate::services::auth::AuthService;

const DEFAULT_TOKEN_TTL_SECS: i64 = 60 * 60 * 24;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub auth: AuthService,
}

async fn db_connect() -> sqlx::Result<PgPool> {
    let database_url = dotenvy::var("DATABASE_URL").expect("DATABASE_URL env var must be set");

    let db = PgPoolOptions::new()
        .max_connections(20)
        .connect(&database_url)
        .await
        .expect("failed to connect to DATABASE_URL");

    sqlx::migrate!().run(&db).await?;

    Ok(db)
}

/// Root redirect: authenticated clients go to the dashboard, everyone else to
/// the login endpoint.
async fn index(State(state): State<AppState>, headers: HeaderMap) -> Redirect {
    let authenticated = middlewares::bearer_token(&headers)
        .is_some_and(|token| state.auth.verify_token(token).is_ok());

    if authenticated {
        Redirect::to("/dashboard")
    } else {
        Redirect::to("/auth/login")
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port = dotenvy::var("PORT").expect("PORT env var must be set");
    let auth_secret = dotenvy::var("AUTH_SECRET").expect("AUTH_SECRET env var must be set");
    let token_ttl_secs = dotenvy::var("TOKEN_TTL_SECS")
        .ok()
        .and_then(|ttl| ttl.parse().ok())
        .unwrap_or(DEFAULT_TOKEN_TTL_SECS);

    let db = db_connect().await?;
    let auth = AuthService::new(auth_secret, token_ttl_secs);

    let state = AppState { db, auth };

    let protected_routes = Router::new()
        .nest("/dashboard", routes::dashboard::dashboard_routes())
        .nest("/entries", routes::entries::entry_routes())
        .nest("/foods", routes::foods::food_routes())
        .layer(from_fn_with_state(state.clone(), attach_user));

    let app = Router::<AppState>::new()
        .route("/", get(index))
        .nest("/auth", routes::auth::auth_routes())
        .merge(protected_routes)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    tracing::info!("listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await?;

    Ok(())
}
