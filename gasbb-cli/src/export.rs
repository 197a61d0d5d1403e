//! Balance-table export: CSV for spreadsheets, JSON for scripts.

use std::path::Path;

use anyhow::{Context, Result};
use gasbb_core::{GasModel, ModelRow};

/// Render the daily balance as CSV.
///
/// Columns: Date, Available Supply (TJ), Demand (TJ), Shortfall (TJ).
/// Unknown values are written as empty cells.
pub fn balance_csv(days: &[ModelRow]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "Date",
        "Available Supply (TJ)",
        "Demand (TJ)",
        "Shortfall (TJ)",
    ])?;

    for row in days {
        wtr.write_record([
            row.gas_day.format("%Y-%m-%d").to_string(),
            optional(row.tj_available),
            format!("{:.3}", row.tj_demand),
            optional(row.shortfall),
        ])?;
    }

    let bytes = wtr.into_inner().context("failed to flush balance CSV")?;
    String::from_utf8(bytes).context("balance CSV is not valid UTF-8")
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.3}")).unwrap_or_default()
}

/// Write the balance CSV to `path`.
pub fn write_balance_csv(days: &[ModelRow], path: &Path) -> Result<()> {
    let csv = balance_csv(days)?;
    std::fs::write(path, csv).with_context(|| format!("failed to write {}", path.display()))
}

/// Serialize the full model (supply rows and daily balance) as pretty JSON.
pub fn model_json(model: &GasModel) -> Result<String> {
    serde_json::to_string_pretty(model).context("failed to serialize model to JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rows() -> Vec<ModelRow> {
        vec![
            ModelRow {
                gas_day: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                tj_available: Some(80.0),
                tj_demand: 70.0,
                shortfall: Some(10.0),
            },
            ModelRow {
                gas_day: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                tj_available: None,
                tj_demand: 20.5,
                shortfall: None,
            },
        ]
    }

    #[test]
    fn csv_has_header_and_blank_unknowns() {
        let csv = balance_csv(&rows()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "Date,Available Supply (TJ),Demand (TJ),Shortfall (TJ)"
        );
        assert_eq!(lines[1], "2024-01-01,80.000,70.000,10.000");
        assert_eq!(lines[2], "2024-01-02,,20.500,");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn empty_model_is_header_only() {
        let csv = balance_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("balance.csv");
        write_balance_csv(&rows(), &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Date,"));
    }

    #[test]
    fn json_carries_both_tables() {
        let model = GasModel {
            supply: vec![],
            days: rows(),
        };
        let json = model_json(&model).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["days"].as_array().unwrap().len(), 2);
        assert!(value["days"][1]["tj_available"].is_null());
        assert_eq!(value["days"][0]["gas_day"], "2024-01-01");
    }
}
