use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::NaiveDate;
use plotters::prelude::*;
use sqlx::PgPool;
use sqlx::prelude::FromRow;
use sqlx::types::Uuid;

/// Per-day nutrient sums for one user, as charted.
#[derive(Debug, FromRow)]
pub struct DailyIntake {
    pub day: NaiveDate,
    pub protein: f64,
    pub carbohydrates: f64,
    pub fat: f64,
    pub cholesterol: f64,
    pub energy_kcal: f64,
}

/// Sum nutrient intake per calendar day over all live entries of a user.
pub async fn fetch_daily_intake(pool: &PgPool, user_id: Uuid) -> Result<Vec<DailyIntake>> {
    let rows = sqlx::query_as::<_, DailyIntake>(
        r#"
        SELECT
            consumed_on AS day,
            COALESCE(SUM(protein), 0) AS protein,
            COALESCE(SUM(carbohydrates), 0) AS carbohydrates,
            COALESCE(SUM(fat), 0) AS fat,
            COALESCE(SUM(cholesterol), 0) AS cholesterol,
            COALESCE(SUM(energy_kcal), 0) AS energy_kcal
        FROM food_entries
        WHERE user_id = $1 AND is_deleted = FALSE
        GROUP BY consumed_on
        ORDER BY consumed_on;
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Plot the five nutrient series over time into a PNG at `png_path`.
pub fn render_chart(intake: &[DailyIntake], png_path: &Path) -> Result<()> {
    if intake.is_empty() {
        bail!("no food entries to chart");
    }

    let dates: Vec<String> = intake
        .iter()
        .map(|row| row.day.format("%Y-%m-%d").to_string())
        .collect();

    let y_max = intake
        .iter()
        .flat_map(|row| {
            [
                row.protein,
                row.carbohydrates,
                row.fat,
                row.cholesterol,
                row.energy_kcal,
            ]
        })
        .fold(1.0_f64, f64::max)
        * 1.1;

    let x_max = (intake.len() as i32 - 1).max(1);

    let root = BitMapBackend::new(png_path, (960, 540)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| anyhow!("chart rendering failed: {e}"))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Nutrient Intake Over Time", ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(64)
        .y_label_area_size(64)
        .build_cartesian_2d(0..x_max, 0.0..y_max)
        .map_err(|e| anyhow!("chart rendering failed: {e}"))?;

    chart
        .configure_mesh()
        .x_labels(dates.len().min(10))
        .x_label_formatter(&|idx| {
            dates
                .get(*idx as usize)
                .cloned()
                .unwrap_or_default()
        })
        .y_desc("Intake")
        .x_desc("Date")
        .draw()
        .map_err(|e| anyhow!("chart rendering failed: {e}"))?;

    let series: [(&str, &RGBColor, fn(&DailyIntake) -> f64); 5] = [
        ("Protein (g)", &RED, |row| row.protein),
        ("Energy (kcal)", &BLUE, |row| row.energy_kcal),
        ("Fat (g)", &GREEN, |row| row.fat),
        ("Cholesterol (mg)", &MAGENTA, |row| row.cholesterol),
        ("Carbohydrates (g)", &CYAN, |row| row.carbohydrates),
    ];

    for (label, color, value) in series {
        chart
            .draw_series(LineSeries::new(
                intake
                    .iter()
                    .enumerate()
                    .map(|(idx, row)| (idx as i32, value(row))),
                color,
            ))
            .map_err(|e| anyhow!("chart rendering failed: {e}"))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| anyhow!("chart rendering failed: {e}"))?;

    root.present()
        .map_err(|e| anyhow!("chart rendering failed: {e}"))?;

    Ok(())
}

/// A minimal standalone page with the chart embedded as a data URI.
pub fn embed_chart_html(encoded_png: &str) -> String {
    format!(
        r#"<html>
<body>
<img src="data:image/png;base64,{encoded_png}" alt="Nutrient Intake Graph">
</body>
</html>
"#
    )
}

/// Base64-encode the PNG at `png_path` and write the standalone HTML report.
pub fn write_report_html(png_path: &Path, html_path: &Path) -> Result<()> {
    let image = std::fs::read(png_path)
        .with_context(|| format!("failed to read chart image {}", png_path.display()))?;
    let encoded = STANDARD.encode(image);

    std::fs::write(html_path, embed_chart_html(&encoded))
        .with_context(|| format!("failed to write report {}", html_path.display()))?;

    Ok(())
}

/// Full report pipeline: query, plot, encode, emit HTML.
pub async fn generate_report(
    pool: &PgPool,
    user_id: Uuid,
    png_path: &Path,
    html_path: &Path,
) -> Result<()> {
    let intake = fetch_daily_intake(pool, user_id).await?;
    render_chart(&intake, png_path)?;
    write_report_html(png_path, html_path)?;
    tracing::info!("report written to {}", html_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_encoded_image_as_data_uri() {
        let html = embed_chart_html("aGVsbG8=");
        assert!(html.contains("data:image/png;base64,aGVsbG8="));
        assert!(html.contains("<img "));
    }
}
