use chrono::NaiveDate;
use serde::Serialize;

use crate::nutrients::{NutrientError, NutrientRecord, NutrientTotals, record_totals};

/// History never shows more than this many distinct days.
pub const HISTORY_DAYS: usize = 10;

/// A record that belongs to a calendar day.
pub trait DatedRecord {
    fn consumed_on(&self) -> NaiveDate;
}

/// One day of logged servings with its running totals.
#[derive(Debug, Serialize)]
pub struct DayBucket<R> {
    pub date: String,
    pub totals: NutrientTotals,
    pub entries: Vec<R>,
}

/// Bucket entries by calendar day (keyed `YYYY-MM-DD`), capping history at
/// [`HISTORY_DAYS`] buckets. Introducing a date beyond the cap evicts the
/// earliest-inserted bucket, so callers control retention through the order
/// they feed entries in.
pub fn group_entries_by_date<R>(entries: Vec<R>) -> Result<Vec<DayBucket<R>>, NutrientError>
where
    R: NutrientRecord + DatedRecord,
{
    let mut buckets: Vec<DayBucket<R>> = Vec::new();

    for entry in entries {
        let date = entry.consumed_on().format("%Y-%m-%d").to_string();
        let entry_totals = record_totals(&entry)?;

        match buckets.iter().position(|bucket| bucket.date == date) {
            Some(idx) => {
                buckets[idx].totals.add(&entry_totals);
                buckets[idx].entries.push(entry);
            }
            None => {
                if buckets.len() >= HISTORY_DAYS {
                    buckets.remove(0);
                }
                buckets.push(DayBucket {
                    date,
                    totals: entry_totals,
                    entries: vec![entry],
                });
            }
        }
    }

    Ok(buckets)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    struct Entry {
        date: NaiveDate,
        protein: f64,
        energy: f64,
    }

    impl Entry {
        fn on(year: i32, month: u32, day: u32, protein: f64, energy: f64) -> Self {
            Self {
                date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
                protein,
                energy,
            }
        }
    }

    impl NutrientRecord for Entry {
        fn protein(&self) -> Option<f64> {
            Some(self.protein)
        }

        fn carbohydrates(&self) -> Option<f64> {
            Some(0.0)
        }

        fn fat(&self) -> Option<f64> {
            Some(0.0)
        }

        fn cholesterol(&self) -> Option<f64> {
            Some(0.0)
        }

        fn energy_kcal(&self) -> Option<f64> {
            Some(self.energy)
        }
    }

    impl DatedRecord for Entry {
        fn consumed_on(&self) -> NaiveDate {
            self.date
        }
    }

    #[test]
    fn groups_entries_of_the_same_day_into_one_bucket() {
        let entries = vec![
            Entry::on(2024, 3, 1, 10.0, 100.0),
            Entry::on(2024, 3, 1, 5.0, 50.0),
            Entry::on(2024, 3, 2, 2.0, 20.0),
        ];

        let buckets = group_entries_by_date(entries).unwrap();
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].date, "2024-03-01");
        assert_eq!(buckets[0].entries.len(), 2);
        assert!((buckets[0].totals.protein - 15.0).abs() < 1e-9);
        assert!((buckets[0].totals.energy_kcal - 150.0).abs() < 1e-9);
        assert_eq!(buckets[1].date, "2024-03-02");
    }

    #[test]
    fn never_retains_more_than_ten_buckets() {
        let entries: Vec<Entry> = (1..=14)
            .map(|day| Entry::on(2024, 3, day, 1.0, 10.0))
            .collect();

        let buckets = group_entries_by_date(entries).unwrap();
        assert_eq!(buckets.len(), HISTORY_DAYS);
    }

    #[test]
    fn eleventh_date_evicts_the_earliest_inserted_bucket() {
        let entries: Vec<Entry> = (1..=11)
            .map(|day| Entry::on(2024, 3, day, 1.0, 10.0))
            .collect();

        let buckets = group_entries_by_date(entries).unwrap();
        assert_eq!(buckets.len(), 10);
        assert_eq!(buckets[0].date, "2024-03-02");
        assert_eq!(buckets[9].date, "2024-03-11");
    }

    #[test]
    fn later_entries_for_a_retained_day_still_accumulate() {
        let mut entries: Vec<Entry> = (1..=10)
            .map(|day| Entry::on(2024, 3, day, 1.0, 10.0))
            .collect();
        entries.push(Entry::on(2024, 3, 5, 4.0, 40.0));

        let buckets = group_entries_by_date(entries).unwrap();
        assert_eq!(buckets.len(), 10);
        let day5 = buckets.iter().find(|b| b.date == "2024-03-05").unwrap();
        assert!((day5.totals.protein - 5.0).abs() < 1e-9);
    }
}
