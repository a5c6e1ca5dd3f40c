use std::path::Path;

use sqlx::postgres::PgPoolOptions;
use sqlx::types::Uuid;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let username = std::env::args()
        .nth(1)
        .expect("usage: nutrient-report <username> [output.html]");
    let html_path = std::env::args()
        .nth(2)
        .unwrap_or_else(|| "dashboard.html".to_string());

    let database_url = dotenvy::var("DATABASE_URL").expect("DATABASE_URL env var must be set");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    let user_id = sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM users WHERE username = $1 AND is_deleted = FALSE",
    )
    .bind(&username)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| anyhow::anyhow!("no such user: {username}"))?;

    nutrition_core::report::generate_report(
        &pool,
        user_id,
        Path::new("nutrient_intake.png"),
        Path::new(&html_path),
    )
    .await?;

    Ok(())
}
