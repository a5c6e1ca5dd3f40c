use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use sqlx::PgPool;

use crate::models::foods::{CreateFoodPayload, Food};

/// A single reference food parsed from the spreadsheet, per 100 g.
#[derive(Debug, Clone)]
pub struct FoodCsvRow {
    pub name: String,
    pub energy_kcal: f64,
    pub protein: f64,
    pub fat: f64,
    pub cholesterol: f64,
    pub carbohydrates: f64,
}

/// Parse output: rows that survived, plus the 1-based indices of rows that
/// were dropped for missing fields or record-level parse errors.
#[derive(Debug)]
pub struct ParsedFoodCsv {
    pub rows: Vec<FoodCsvRow>,
    pub error_rows: Vec<usize>,
}

/// Summary of what an import run did.
#[derive(Debug)]
pub struct ImportSummary {
    pub rows_read: usize,
    pub inserted: usize,
    pub skipped_duplicates: usize,
    pub error_rows: Vec<usize>,
}

/// Parse a numeric spreadsheet cell. Accepts plain numbers and comma-grouped
/// ones like `1,234`; anything unparseable falls back to 0.0.
pub fn convert_to_float(raw: &str) -> f64 {
    raw.trim().replace(',', "").parse().unwrap_or(0.0)
}

/// Parse the reference food spreadsheet from any reader.
///
/// Expected header: `name,energy,protein,fat,cholesterol,carbohydrates`
/// (case-insensitive, order-independent). A missing header column aborts the
/// whole run; a bad row is logged with its index and skipped.
pub fn parse_food_csv<R: Read>(reader: R) -> Result<ParsedFoodCsv> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().context("failed to read CSV headers")?.clone();

    let col = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .with_context(|| format!("missing required column: {name}"))
    };

    let idx_name = col("name")?;
    let idx_energy = col("energy")?;
    let idx_protein = col("protein")?;
    let idx_fat = col("fat")?;
    let idx_cholesterol = col("cholesterol")?;
    let idx_carbs = col("carbohydrates")?;

    let mut rows = Vec::new();
    let mut error_rows = Vec::new();

    for (line, result) in rdr.records().enumerate() {
        let row_index = line + 1;

        let record = match result {
            Ok(record) => record,
            Err(err) => {
                tracing::error!("error at row {row_index}: {err}");
                error_rows.push(row_index);
                continue;
            }
        };

        let name = match record.get(idx_name) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                tracing::error!("error at row {row_index}: missing food name");
                error_rows.push(row_index);
                continue;
            }
        };

        let cell = |idx: usize| -> Option<f64> { record.get(idx).map(convert_to_float) };

        let (Some(energy_kcal), Some(protein), Some(fat), Some(cholesterol), Some(carbohydrates)) = (
            cell(idx_energy),
            cell(idx_protein),
            cell(idx_fat),
            cell(idx_cholesterol),
            cell(idx_carbs),
        ) else {
            tracing::error!("error at row {row_index}: missing nutrient field");
            error_rows.push(row_index);
            continue;
        };

        rows.push(FoodCsvRow {
            name,
            energy_kcal,
            protein,
            fat,
            cholesterol,
            carbohydrates,
        });
    }

    Ok(ParsedFoodCsv { rows, error_rows })
}

/// Drop rows whose food name is already known, keeping first-seen rows.
/// `existing` is extended with the names that will be inserted, so duplicates
/// within the spreadsheet itself are also collapsed.
pub fn partition_new_foods(
    rows: Vec<FoodCsvRow>,
    existing: &mut HashSet<String>,
) -> (Vec<FoodCsvRow>, usize) {
    let mut skipped = 0;
    let mut to_insert = Vec::new();

    for row in rows {
        if existing.contains(&row.name) {
            skipped += 1;
            continue;
        }
        existing.insert(row.name.clone());
        to_insert.push(row);
    }

    (to_insert, skipped)
}

/// Import the reference food spreadsheet at `path` into the database. Rows
/// naming an already-known food are no-ops; bad rows are skipped and reported
/// in the summary. Only a read failure of the file itself aborts the run.
pub async fn import_food_csv(pool: &PgPool, path: &Path) -> Result<ImportSummary> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to read spreadsheet {}", path.display()))?;

    let parsed = parse_food_csv(file)?;
    let rows_read = parsed.rows.len() + parsed.error_rows.len();

    if rows_read == 0 {
        bail!("spreadsheet {} contains no data rows", path.display());
    }

    let mut conn = pool.acquire().await?;
    let mut existing: HashSet<String> = Food::existing_names(conn.as_mut())
        .await?
        .into_iter()
        .collect();

    let (to_insert, skipped_duplicates) = partition_new_foods(parsed.rows, &mut existing);

    let mut inserted = 0;
    for row in &to_insert {
        Food::create(
            conn.as_mut(),
            CreateFoodPayload {
                name: &row.name,
                protein_per_100g: row.protein,
                carbs_per_100g: row.carbohydrates,
                fat_per_100g: row.fat,
                cholesterol_per_100g: row.cholesterol,
                energy_kcal_per_100g: row.energy_kcal,
            },
        )
        .await?;
        tracing::info!("added food: {}", row.name);
        inserted += 1;
    }

    Ok(ImportSummary {
        rows_read,
        inserted,
        skipped_duplicates,
        error_rows: parsed.error_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
name,energy,protein,fat,cholesterol,carbohydrates
wheat,337,10.6,10.6,1,72.2
white bread,264,9.3,4.4,1,46.7
udon,270,6.1,0.8,1,56
rice,\"1,353\",6.8,2.7,1,74.3
";

    #[test]
    fn converts_plain_and_comma_grouped_numbers() {
        assert!((convert_to_float("10.6") - 10.6).abs() < f64::EPSILON);
        assert!((convert_to_float("1,234") - 1234.0).abs() < f64::EPSILON);
        assert!((convert_to_float(" 270 ") - 270.0).abs() < f64::EPSILON);
        assert!(convert_to_float("n/a").abs() < f64::EPSILON);
        assert!(convert_to_float("").abs() < f64::EPSILON);
    }

    #[test]
    fn parses_all_rows() {
        let parsed = parse_food_csv(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(parsed.rows.len(), 4);
        assert!(parsed.error_rows.is_empty());

        assert_eq!(parsed.rows[0].name, "wheat");
        assert!((parsed.rows[0].energy_kcal - 337.0).abs() < f64::EPSILON);
        assert!((parsed.rows[0].protein - 10.6).abs() < f64::EPSILON);
        assert!((parsed.rows[3].energy_kcal - 1353.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_header_column_aborts() {
        let csv = "name,energy,protein\nwheat,337,10.6\n";
        let err = parse_food_csv(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("fat"));
    }

    #[test]
    fn bad_rows_are_skipped_and_indexed() {
        let csv = "\
name,energy,protein,fat,cholesterol,carbohydrates
wheat,337,10.6,10.6,1,72.2
,264,9.3,4.4,1,46.7
udon,270
rice,353,6.8,2.7,1,74.3
";
        let parsed = parse_food_csv(csv.as_bytes()).unwrap();
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.error_rows, vec![2, 3]);
    }

    #[test]
    fn unparseable_cells_fall_back_to_zero() {
        let csv = "\
name,energy,protein,fat,cholesterol,carbohydrates
mystery,unknown,10,2,0,30
";
        let parsed = parse_food_csv(csv.as_bytes()).unwrap();
        assert_eq!(parsed.rows.len(), 1);
        assert!(parsed.rows[0].energy_kcal.abs() < f64::EPSILON);
        assert!((parsed.rows[0].protein - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn duplicate_names_are_no_ops() {
        let parsed = parse_food_csv(SAMPLE_CSV.as_bytes()).unwrap();

        let mut existing: HashSet<String> = HashSet::from(["udon".to_string()]);
        let (to_insert, skipped) = partition_new_foods(parsed.rows, &mut existing);

        assert_eq!(skipped, 1);
        assert_eq!(to_insert.len(), 3);
        assert!(to_insert.iter().all(|row| row.name != "udon"));
    }

    #[test]
    fn duplicates_within_the_spreadsheet_collapse() {
        let csv = "\
name,energy,protein,fat,cholesterol,carbohydrates
wheat,337,10.6,10.6,1,72.2
wheat,999,1,1,1,1
";
        let parsed = parse_food_csv(csv.as_bytes()).unwrap();

        let mut existing = HashSet::new();
        let (to_insert, skipped) = partition_new_foods(parsed.rows, &mut existing);

        assert_eq!(to_insert.len(), 1);
        assert_eq!(skipped, 1);
        assert!((to_insert[0].energy_kcal - 337.0).abs() < f64::EPSILON);
    }
}
