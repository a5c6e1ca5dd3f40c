use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NutrientError {
    #[error("entry is missing required field `{0}`")]
    MissingField(&'static str),
}

/// Totals for the five tracked nutrients. Protein, carbohydrates and fat are
/// grams, cholesterol is milligrams, energy is kcal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutrientTotals {
    pub protein: f64,
    pub carbohydrates: f64,
    pub fat: f64,
    pub cholesterol: f64,
    pub energy_kcal: f64,
}

impl NutrientTotals {
    pub fn add(&mut self, other: &NutrientTotals) {
        self.protein += other.protein;
        self.carbohydrates += other.carbohydrates;
        self.fat += other.fat;
        self.cholesterol += other.cholesterol;
        self.energy_kcal += other.energy_kcal;
    }
}

/// Anything that carries the five nutrient fields of one logged serving.
/// Stored rows always have all five; ad-hoc records (import rows, test
/// fixtures) may not, which `compute_nutrients` treats as an error.
pub trait NutrientRecord {
    fn protein(&self) -> Option<f64>;
    fn carbohydrates(&self) -> Option<f64>;
    fn fat(&self) -> Option<f64>;
    fn cholesterol(&self) -> Option<f64>;
    fn energy_kcal(&self) -> Option<f64>;
}

/// Scale a per-100g reference value to a serving of `grams`.
pub fn scale_per_100g(reference: f64, grams: f64) -> f64 {
    reference * grams / 100.0
}

/// Sum the five nutrient fields over a collection of records. An empty
/// collection yields all-zero totals; a record missing any required field
/// aborts with the name of the offending field.
pub fn compute_nutrients<R: NutrientRecord>(entries: &[R]) -> Result<NutrientTotals, NutrientError> {
    let mut totals = NutrientTotals::default();

    for entry in entries {
        totals.add(&record_totals(entry)?);
    }

    Ok(totals)
}

pub(crate) fn record_totals<R: NutrientRecord>(entry: &R) -> Result<NutrientTotals, NutrientError> {
    Ok(NutrientTotals {
        protein: entry
            .protein()
            .ok_or(NutrientError::MissingField("protein"))?,
        carbohydrates: entry
            .carbohydrates()
            .ok_or(NutrientError::MissingField("carbohydrates"))?,
        fat: entry.fat().ok_or(NutrientError::MissingField("fat"))?,
        cholesterol: entry
            .cholesterol()
            .ok_or(NutrientError::MissingField("cholesterol"))?,
        energy_kcal: entry
            .energy_kcal()
            .ok_or(NutrientError::MissingField("energy_kcal"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Record {
        protein: Option<f64>,
        carbohydrates: Option<f64>,
        fat: Option<f64>,
        cholesterol: Option<f64>,
        energy_kcal: Option<f64>,
    }

    impl Record {
        fn full(protein: f64, carbohydrates: f64, fat: f64, cholesterol: f64, energy: f64) -> Self {
            Self {
                protein: Some(protein),
                carbohydrates: Some(carbohydrates),
                fat: Some(fat),
                cholesterol: Some(cholesterol),
                energy_kcal: Some(energy),
            }
        }
    }

    impl NutrientRecord for Record {
        fn protein(&self) -> Option<f64> {
            self.protein
        }

        fn carbohydrates(&self) -> Option<f64> {
            self.carbohydrates
        }

        fn fat(&self) -> Option<f64> {
            self.fat
        }

        fn cholesterol(&self) -> Option<f64> {
            self.cholesterol
        }

        fn energy_kcal(&self) -> Option<f64> {
            self.energy_kcal
        }
    }

    #[test]
    fn scales_reference_values_to_serving_size() {
        assert!((scale_per_100g(10.0, 250.0) - 25.0).abs() < f64::EPSILON);
        assert!((scale_per_100g(4.4, 50.0) - 2.2).abs() < 1e-9);
        assert!(scale_per_100g(0.0, 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_collection_sums_to_zero() {
        let totals = compute_nutrients::<Record>(&[]).unwrap();
        assert_eq!(totals, NutrientTotals::default());
    }

    #[test]
    fn sums_all_five_fields() {
        let entries = [
            Record::full(10.0, 20.0, 5.0, 1.0, 150.0),
            Record::full(2.5, 30.0, 0.5, 0.0, 120.0),
        ];

        let totals = compute_nutrients(&entries).unwrap();
        assert!((totals.protein - 12.5).abs() < 1e-9);
        assert!((totals.carbohydrates - 50.0).abs() < 1e-9);
        assert!((totals.fat - 5.5).abs() < 1e-9);
        assert!((totals.cholesterol - 1.0).abs() < 1e-9);
        assert!((totals.energy_kcal - 270.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_record_missing_a_field() {
        let mut entry = Record::full(10.0, 20.0, 5.0, 1.0, 150.0);
        entry.fat = None;

        let err = compute_nutrients(&[entry]).unwrap_err();
        assert_eq!(err, NutrientError::MissingField("fat"));
    }
}
