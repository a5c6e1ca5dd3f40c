use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use sqlx::prelude::FromRow;
use sqlx::types::Uuid;

#[derive(Debug, FromRow)]
pub struct Food {
    pub id: Uuid,
    pub name: String,
    pub protein_per_100g: Option<f64>,
    pub carbs_per_100g: Option<f64>,
    pub fat_per_100g: Option<f64>,
    pub cholesterol_per_100g: Option<f64>,
    pub energy_kcal_per_100g: Option<f64>,
    pub variant: Option<String>,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
}

#[derive(Debug)]
pub struct CreateFoodPayload<'data> {
    pub name: &'data str,
    pub protein_per_100g: f64,
    pub carbs_per_100g: f64,
    pub fat_per_100g: f64,
    pub cholesterol_per_100g: f64,
    pub energy_kcal_per_100g: f64,
}

impl Food {
    pub async fn find_by_name(
        executor: &mut PgConnection,
        name: &str,
    ) -> sqlx::Result<Option<Food>> {
        sqlx::query_as::<_, Food>("SELECT * FROM foods WHERE name = $1 AND is_deleted = FALSE")
            .bind(name)
            .fetch_optional(executor)
            .await
    }

    /// Names of every food a serving can be logged against.
    pub async fn available_names(executor: &mut PgConnection) -> sqlx::Result<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT name FROM foods WHERE is_deleted = FALSE ORDER BY name",
        )
        .fetch_all(executor)
        .await
    }

    pub async fn existing_names(executor: &mut PgConnection) -> sqlx::Result<Vec<String>> {
        sqlx::query_scalar::<_, String>("SELECT name FROM foods")
            .fetch_all(executor)
            .await
    }

    pub async fn create(
        executor: &mut PgConnection,
        payload: CreateFoodPayload<'_>,
    ) -> sqlx::Result<Food> {
        sqlx::query_as::<_, Food>(
            r#"
            INSERT INTO foods
                (name, protein_per_100g, carbs_per_100g, fat_per_100g,
                 cholesterol_per_100g, energy_kcal_per_100g)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *;
            "#,
        )
        .bind(payload.name)
        .bind(payload.protein_per_100g)
        .bind(payload.carbs_per_100g)
        .bind(payload.fat_per_100g)
        .bind(payload.cholesterol_per_100g)
        .bind(payload.energy_kcal_per_100g)
        .fetch_one(executor)
        .await
    }
}
