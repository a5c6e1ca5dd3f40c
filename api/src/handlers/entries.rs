use nutrition_core::NutrientTotals;
use sqlx::types::Uuid;

use crate::AppState;
use crate::error::AppError;
use crate::models::daily_nutrients::DailyNutrient;
use crate::models::food_entries::FoodEntry;
use crate::models::users::User;

/// Change the gram amount of an entry, rescaling its nutrient snapshot
/// proportionally, then refresh that day's rollup.
#[tracing::instrument(skip_all, fields(user = %user.username, entry = %id))]
pub async fn edit_grams(
    state: AppState,
    user: User,
    id: Uuid,
    new_grams: f64,
) -> Result<FoodEntry, AppError> {
    let entry = FoodEntry::find_for_user(&state.db, id, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("entry not found".to_string()))?;

    let serving = rescale_serving(&entry, new_grams)?;
    let updated = FoodEntry::update_serving(&state.db, entry.id, new_grams, serving).await?;

    DailyNutrient::refresh(&state.db, user.id, entry.consumed_on).await?;

    Ok(updated)
}

/// Soft-delete an entry and refresh that day's rollup.
#[tracing::instrument(skip_all, fields(user = %user.username, entry = %id))]
pub async fn delete(state: AppState, user: User, id: Uuid) -> Result<(), AppError> {
    let entry = FoodEntry::find_for_user(&state.db, id, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("entry not found".to_string()))?;

    FoodEntry::soft_delete(&state.db, entry.id).await?;
    DailyNutrient::refresh(&state.db, user.id, entry.consumed_on).await?;

    Ok(())
}

/// Rescale an entry's snapshotted nutrients from its own gram basis. The
/// snapshot stays authoritative: later edits to the Food reference must not
/// leak into existing entries.
fn rescale_serving(entry: &FoodEntry, new_grams: f64) -> Result<NutrientTotals, AppError> {
    if entry.grams <= 0.0 {
        return Err(AppError::Validation(
            "entry has no gram basis to rescale from".to_string(),
        ));
    }

    let factor = new_grams / entry.grams;
    Ok(NutrientTotals {
        protein: entry.protein * factor,
        carbohydrates: entry.carbohydrates * factor,
        fat: entry.fat * factor,
        cholesterol: entry.cholesterol * factor,
        energy_kcal: entry.energy_kcal * factor,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use super::*;

    fn entry(grams: f64) -> FoodEntry {
        FoodEntry {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            food_id: None,
            food_name: "rice".to_string(),
            grams,
            protein: 6.8,
            carbohydrates: 74.3,
            fat: 2.7,
            cholesterol: 1.0,
            energy_kcal: 353.0,
            consumed_on: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            is_deleted: false,
        }
    }

    #[test]
    fn doubling_grams_doubles_every_nutrient() {
        let serving = rescale_serving(&entry(100.0), 200.0).unwrap();

        assert!((serving.protein - 13.6).abs() < 1e-9);
        assert!((serving.carbohydrates - 148.6).abs() < 1e-9);
        assert!((serving.fat - 5.4).abs() < 1e-9);
        assert!((serving.cholesterol - 2.0).abs() < 1e-9);
        assert!((serving.energy_kcal - 706.0).abs() < 1e-9);
    }

    #[test]
    fn zero_gram_basis_is_rejected() {
        let err = rescale_serving(&entry(0.0), 150.0).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
