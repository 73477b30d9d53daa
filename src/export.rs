use crate::error::AppError;
use crate::types::{EvaluationRow, LegendRow, Report, SummaryStats};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

pub const EVALUATION_FILE: &str = "evaluation_by_technology.csv";
pub const JUSTIFICATION_FILE: &str = "tier_justification.csv";
pub const SUMMARY_FILE: &str = "summary.json";

/// Paths written by [`export_report`].
#[derive(Debug, Clone)]
pub struct ExportedFiles {
    pub evaluation: PathBuf,
    pub justification: PathBuf,
    pub summary: PathBuf,
}

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), AppError> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn evaluation_rows(report: &Report) -> Vec<EvaluationRow> {
    report
        .lines
        .iter()
        .map(|l| EvaluationRow {
            technology: l.name.clone(),
            quantity: l.quantity,
            tier: l.tier,
            range: l.tier_label.clone(),
            base_price: l.base_price,
            score: l.score,
            monthly_cost: l.monthly_cost,
            monthly_client_price: l.monthly_client_price,
            monthly_margin: l.monthly_margin,
        })
        .collect()
}

pub fn summary(report: &Report) -> SummaryStats {
    SummaryStats {
        generated_at: chrono::Local::now().to_rfc3339(),
        technologies_used: report.charted_lines().count(),
        global_tier: report.global_tier,
        global_label: report.global_label.clone(),
        margin_rate: report.margin_rate,
        totals: report.totals.clone(),
    }
}

/// Write the evaluation sheet, the tier justification sheet and the JSON
/// summary into `dir`, creating it if needed.
pub fn export_report(
    dir: &Path,
    report: &Report,
    legend: &[LegendRow],
) -> Result<ExportedFiles, AppError> {
    std::fs::create_dir_all(dir)?;
    let files = ExportedFiles {
        evaluation: dir.join(EVALUATION_FILE),
        justification: dir.join(JUSTIFICATION_FILE),
        summary: dir.join(SUMMARY_FILE),
    };
    write_csv(&files.evaluation, &evaluation_rows(report))?;
    write_csv(&files.justification, legend)?;
    write_json(&files.summary, &summary(report))?;
    info!(dir = %dir.display(), rows = report.lines.len(), "exported report");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::evaluate;
    use crate::loader::load_quantities;
    use crate::types::{LineInput, PricingConfig};

    fn sample(config: &PricingConfig) -> Report {
        let input: LineInput = [
            ("Storage".to_string(), 2),
            ("Database".to_string(), 1),
            ("Security & Identity, Compliance".to_string(), 4),
        ]
        .into_iter()
        .collect();
        evaluate(config, &input).unwrap()
    }

    #[test]
    fn writes_both_sheets_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        let config = PricingConfig::default();
        let report = sample(&config);
        let files = export_report(dir.path(), &report, &config.tier_legend()).unwrap();

        let mut rdr = csv::Reader::from_path(&files.evaluation).unwrap();
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(&headers[0], "Technology");
        assert_eq!(&headers[8], "MonthlyMargin");
        assert_eq!(rdr.records().count(), 25);

        let mut rdr = csv::Reader::from_path(&files.justification).unwrap();
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "0 - 30");
        assert_eq!(&rows[2][1], "🔴 Nivel 3 - Alto");

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&files.summary).unwrap()).unwrap();
        assert_eq!(json["total_score"], 17);
        assert_eq!(json["global_tier"], 1);
        assert_eq!(json["technologies_used"], 3);
    }

    #[test]
    fn exported_sheet_loads_back_as_quantities() {
        let dir = tempfile::tempdir().unwrap();
        let config = PricingConfig::default();
        let report = sample(&config);
        let files = export_report(dir.path(), &report, &config.tier_legend()).unwrap();

        let (quantities, load) = load_quantities(&files.evaluation, &config.catalog()).unwrap();
        assert_eq!(load.parse_errors, 0);
        assert_eq!(load.loaded_rows, 25);
        assert_eq!(evaluate(&config, &quantities).unwrap(), report);
    }

    #[test]
    fn export_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("run1");
        let config = PricingConfig::default();
        let files = export_report(&nested, &sample(&config), &config.tier_legend()).unwrap();
        assert!(files.summary.exists());
    }
}
