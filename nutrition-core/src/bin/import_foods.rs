use std::path::Path;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let path = std::env::args()
        .nth(1)
        .expect("usage: import-foods <spreadsheet.csv>");
    let database_url = dotenvy::var("DATABASE_URL").expect("DATABASE_URL env var must be set");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    let summary = nutrition_core::import::import_food_csv(&pool, Path::new(&path)).await?;

    tracing::info!(
        "import finished: {} rows read, {} inserted, {} duplicates skipped",
        summary.rows_read,
        summary.inserted,
        summary.skipped_duplicates,
    );
    if !summary.error_rows.is_empty() {
        tracing::warn!("rows skipped for errors: {:?}", summary.error_rows);
    }

    Ok(())
}
