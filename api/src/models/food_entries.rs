use chrono::NaiveDate;
use nutrition_core::{DatedRecord, NutrientRecord, NutrientTotals};
use serde::Serialize;
use sqlx::PgPool;
use sqlx::prelude::FromRow;
use sqlx::types::Uuid;
use sqlx::types::chrono::{DateTime, Utc};

/// One logged serving with its snapshotted nutrient values.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FoodEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub food_id: Option<Uuid>,
    pub food_name: String,
    pub grams: f64,
    pub protein: f64,
    pub carbohydrates: f64,
    pub fat: f64,
    pub cholesterol: f64,
    pub energy_kcal: f64,
    pub consumed_on: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub is_deleted: bool,
}

impl NutrientRecord for FoodEntry {
    fn protein(&self) -> Option<f64> {
        Some(self.protein)
    }

    fn carbohydrates(&self) -> Option<f64> {
        Some(self.carbohydrates)
    }

    fn fat(&self) -> Option<f64> {
        Some(self.fat)
    }

    fn cholesterol(&self) -> Option<f64> {
        Some(self.cholesterol)
    }

    fn energy_kcal(&self) -> Option<f64> {
        Some(self.energy_kcal)
    }
}

impl DatedRecord for FoodEntry {
    fn consumed_on(&self) -> NaiveDate {
        self.consumed_on
    }
}

#[derive(Debug)]
pub struct CreateFoodEntryPayload<'data> {
    pub user_id: Uuid,
    pub food_id: Option<Uuid>,
    pub food_name: &'data str,
    pub grams: f64,
    pub serving: NutrientTotals,
    pub consumed_on: NaiveDate,
}

impl FoodEntry {
    pub async fn create(
        pool: &PgPool,
        payload: CreateFoodEntryPayload<'_>,
    ) -> sqlx::Result<FoodEntry> {
        sqlx::query_as::<_, FoodEntry>(
            r#"
            INSERT INTO food_entries
                (user_id, food_id, food_name, grams, protein, carbohydrates,
                 fat, cholesterol, energy_kcal, consumed_on)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *;
            "#,
        )
        .bind(payload.user_id)
        .bind(payload.food_id)
        .bind(payload.food_name)
        .bind(payload.grams)
        .bind(payload.serving.protein)
        .bind(payload.serving.carbohydrates)
        .bind(payload.serving.fat)
        .bind(payload.serving.cholesterol)
        .bind(payload.serving.energy_kcal)
        .bind(payload.consumed_on)
        .fetch_one(pool)
        .await
    }

    pub async fn find_for_user(pool: &PgPool, id: Uuid, user_id: Uuid) -> sqlx::Result<Option<FoodEntry>> {
        sqlx::query_as::<_, FoodEntry>(
            r#"
            SELECT * FROM food_entries
            WHERE id = $1 AND user_id = $2 AND is_deleted = FALSE
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Every live entry of a user, oldest day first, for the history view.
    pub async fn for_user(pool: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<FoodEntry>> {
        sqlx::query_as::<_, FoodEntry>(
            r#"
            SELECT * FROM food_entries
            WHERE user_id = $1 AND is_deleted = FALSE
            ORDER BY consumed_on ASC, created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn for_user_on(
        pool: &PgPool,
        user_id: Uuid,
        date: NaiveDate,
    ) -> sqlx::Result<Vec<FoodEntry>> {
        sqlx::query_as::<_, FoodEntry>(
            r#"
            SELECT * FROM food_entries
            WHERE user_id = $1 AND consumed_on = $2 AND is_deleted = FALSE
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(pool)
        .await
    }

    /// Rewrite grams and the scaled nutrient snapshot in one statement.
    pub async fn update_serving(
        pool: &PgPool,
        id: Uuid,
        grams: f64,
        serving: NutrientTotals,
    ) -> sqlx::Result<FoodEntry> {
        sqlx::query_as::<_, FoodEntry>(
            r#"
            UPDATE food_entries
            SET grams = $2, protein = $3, carbohydrates = $4, fat = $5,
                cholesterol = $6, energy_kcal = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING *;
            "#,
        )
        .bind(id)
        .bind(grams)
        .bind(serving.protein)
        .bind(serving.carbohydrates)
        .bind(serving.fat)
        .bind(serving.cholesterol)
        .bind(serving.energy_kcal)
        .fetch_one(pool)
        .await
    }

    pub async fn soft_delete(pool: &PgPool, id: Uuid) -> sqlx::Result<()> {
        sqlx::query("UPDATE food_entries SET is_deleted = TRUE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }
}
