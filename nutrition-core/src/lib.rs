pub mod history;
pub mod import;
pub mod models;
pub mod nutrients;
pub mod report;

pub use history::{DayBucket, DatedRecord, HISTORY_DAYS, group_entries_by_date};
pub use nutrients::{
    NutrientError, NutrientRecord, NutrientTotals, compute_nutrients, scale_per_100g,
};
