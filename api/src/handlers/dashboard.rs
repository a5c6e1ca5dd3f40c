use chrono::{NaiveDate, Utc};
use nutrition_core::models::foods::Food;
use nutrition_core::{DayBucket, NutrientTotals, compute_nutrients, group_entries_by_date, scale_per_100g};
use serde::Serialize;

use crate::AppState;
use crate::error::AppError;
use crate::models::daily_nutrients::DailyNutrient;
use crate::models::food_entries::{CreateFoodEntryPayload, FoodEntry};
use crate::models::users::User;

#[derive(Debug, Serialize)]
pub struct DashboardData {
    pub today: NutrientTotals,
    pub history: Vec<DayBucket<FoodEntry>>,
}

#[derive(Debug, Serialize)]
pub struct LoggedServing {
    pub entry: FoodEntry,
    pub day_totals: NutrientTotals,
}

/// Today's totals plus the capped date-bucketed history.
#[tracing::instrument(skip_all, fields(user = %user.username))]
pub async fn view(state: AppState, user: User) -> Result<DashboardData, AppError> {
    let today_entries =
        FoodEntry::for_user_on(&state.db, user.id, Utc::now().date_naive()).await?;
    let today = compute_nutrients(&today_entries)?;

    let entries = FoodEntry::for_user(&state.db, user.id).await?;
    let history = group_entries_by_date(entries)?;

    Ok(DashboardData { today, history })
}

/// Resolve the food by name, snapshot its reference values scaled to the
/// serving, insert the entry, and refresh that day's rollup.
#[tracing::instrument(skip_all, fields(user = %user.username, food = %food_name))]
pub async fn log_serving(
    state: AppState,
    user: User,
    consumed_on: NaiveDate,
    food_name: &str,
    grams: f64,
) -> Result<LoggedServing, AppError> {
    let mut conn = state.db.acquire().await?;
    let food = Food::find_by_name(conn.as_mut(), food_name)
        .await?
        .ok_or_else(|| AppError::NotFound("Food not found in the database".to_string()))?;

    let serving = scale_serving(&food, grams)?;

    let entry = FoodEntry::create(
        &state.db,
        CreateFoodEntryPayload {
            user_id: user.id,
            food_id: Some(food.id),
            food_name,
            grams,
            serving,
            consumed_on,
        },
    )
    .await?;

    let rollup = DailyNutrient::refresh(&state.db, user.id, consumed_on).await?;

    Ok(LoggedServing {
        entry,
        day_totals: rollup.totals(),
    })
}

/// Scale a food's per-100g reference to one serving. A null reference value
/// is a lookup failure, never a default.
fn scale_serving(food: &Food, grams: f64) -> Result<NutrientTotals, AppError> {
    let reference = |value: Option<f64>, field: &str| {
        value.ok_or_else(|| {
            AppError::NotFound(format!("food `{}` has no {field} reference", food.name))
        })
    };

    Ok(NutrientTotals {
        protein: scale_per_100g(reference(food.protein_per_100g, "protein")?, grams),
        carbohydrates: scale_per_100g(reference(food.carbs_per_100g, "carbohydrates")?, grams),
        fat: scale_per_100g(reference(food.fat_per_100g, "fat")?, grams),
        cholesterol: scale_per_100g(reference(food.cholesterol_per_100g, "cholesterol")?, grams),
        energy_kcal: scale_per_100g(reference(food.energy_kcal_per_100g, "energy")?, grams),
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sqlx::types::Uuid;

    use super::*;

    fn food(protein: Option<f64>) -> Food {
        Food {
            id: Uuid::new_v4(),
            name: "wheat".to_string(),
            protein_per_100g: protein,
            carbs_per_100g: Some(72.2),
            fat_per_100g: Some(10.6),
            cholesterol_per_100g: Some(1.0),
            energy_kcal_per_100g: Some(337.0),
            variant: None,
            user_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            is_deleted: false,
        }
    }

    #[test]
    fn scales_each_reference_to_the_serving() {
        let serving = scale_serving(&food(Some(10.0)), 250.0).unwrap();

        assert!((serving.protein - 25.0).abs() < 1e-9);
        assert!((serving.carbohydrates - 180.5).abs() < 1e-9);
        assert!((serving.fat - 26.5).abs() < 1e-9);
        assert!((serving.cholesterol - 2.5).abs() < 1e-9);
        assert!((serving.energy_kcal - 842.5).abs() < 1e-9);
    }

    #[test]
    fn null_reference_aborts_with_lookup_failure() {
        let err = scale_serving(&food(None), 100.0).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(err.to_string().contains("protein"));
    }
}
