use chrono::NaiveDate;
use nutrition_core::{NutrientTotals, compute_nutrients};
use serde::Serialize;
use sqlx::PgPool;
use sqlx::prelude::FromRow;
use sqlx::types::Uuid;
use sqlx::types::chrono::{DateTime, Utc};

use crate::models::food_entries::FoodEntry;

/// Per-user, per-date rollup. At most one row per (user_id, date).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DailyNutrient {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    pub total_cholesterol: f64,
    pub total_energy_kcal: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub is_deleted: bool,
}

impl DailyNutrient {
    pub fn totals(&self) -> NutrientTotals {
        NutrientTotals {
            protein: self.total_protein,
            carbohydrates: self.total_carbs,
            fat: self.total_fat,
            cholesterol: self.total_cholesterol,
            energy_kcal: self.total_energy_kcal,
        }
    }

    pub async fn upsert(
        pool: &PgPool,
        user_id: Uuid,
        date: NaiveDate,
        totals: &NutrientTotals,
    ) -> sqlx::Result<DailyNutrient> {
        sqlx::query_as::<_, DailyNutrient>(
            r#"
            INSERT INTO daily_nutrients
                (user_id, date, total_protein, total_carbs, total_fat,
                 total_cholesterol, total_energy_kcal)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id, date) DO UPDATE SET
                total_protein = EXCLUDED.total_protein,
                total_carbs = EXCLUDED.total_carbs,
                total_fat = EXCLUDED.total_fat,
                total_cholesterol = EXCLUDED.total_cholesterol,
                total_energy_kcal = EXCLUDED.total_energy_kcal,
                is_deleted = FALSE,
                updated_at = NOW()
            RETURNING *;
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(totals.protein)
        .bind(totals.carbohydrates)
        .bind(totals.fat)
        .bind(totals.cholesterol)
        .bind(totals.energy_kcal)
        .fetch_one(pool)
        .await
    }

    /// Recompute the rollup for one day from its live entries and upsert it.
    pub async fn refresh(
        pool: &PgPool,
        user_id: Uuid,
        date: NaiveDate,
    ) -> anyhow::Result<DailyNutrient> {
        let entries = FoodEntry::for_user_on(pool, user_id, date).await?;
        let totals = compute_nutrients(&entries)?;
        let rollup = DailyNutrient::upsert(pool, user_id, date, &totals).await?;
        Ok(rollup)
    }
}
