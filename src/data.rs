//! Bar data loading
//!
//! Loads OHLC data from CSV files for the replay front-end. Expected
//! columns: `datetime,open,high,low,close[,volume]`; the optional
//! volume column is ignored.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::warn;

use crate::Bar;

/// One CSV row: a finalized bar with its timestamp
#[derive(Debug, Clone)]
pub struct BarRecord {
    pub datetime: DateTime<Utc>,
    pub bar: Bar,
}

/// Load chronological bar records from a CSV file
///
/// Rows failing bar validation are rejected with their row number;
/// out-of-order timestamps only warn, since the engine cares about
/// delivery order rather than wall-clock spacing.
pub fn load_csv(path: impl AsRef<Path>) -> Result<Vec<BarRecord>> {
    let mut reader = csv::Reader::from_path(path.as_ref()).context("Failed to open CSV file")?;

    let mut records: Vec<BarRecord> = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        let record = result.context(format!("Failed to read row {}", row_idx + 1))?;

        let dt_str = record.get(0).context("Missing datetime column")?;
        let datetime = dt_str
            .parse::<DateTime<Utc>>()
            .or_else(|_| {
                // Try parsing without timezone and assume UTC
                chrono::NaiveDateTime::parse_from_str(dt_str, "%Y-%m-%d %H:%M:%S")
                    .map(|ndt| DateTime::<Utc>::from_naive_utc_and_offset(ndt, Utc))
            })
            .context(format!("Failed to parse datetime: {}", dt_str))?;

        let open: f64 = record
            .get(1)
            .context("Missing open column")?
            .parse()
            .context("Failed to parse open")?;
        let high: f64 = record
            .get(2)
            .context("Missing high column")?
            .parse()
            .context("Failed to parse high")?;
        let low: f64 = record
            .get(3)
            .context("Missing low column")?
            .parse()
            .context("Failed to parse low")?;
        let close: f64 = record
            .get(4)
            .context("Missing close column")?
            .parse()
            .context("Failed to parse close")?;

        let bar = Bar::new(open, high, low, close)
            .with_context(|| format!("Invalid bar at row {}", row_idx + 1))?;

        if let Some(last) = records.last() {
            if datetime <= last.datetime {
                warn!(
                    "Row {}: timestamp {} is not after the previous row",
                    row_idx + 1,
                    datetime
                );
            }
        }

        records.push(BarRecord { datetime, bar });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_csv(contents: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "possibility_engine_test_{}_{}.csv",
            std::process::id(),
            contents.len()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_csv() {
        let path = write_temp_csv(
            "datetime,open,high,low,close,volume\n\
             2024-01-01 00:00:00,100.0,105.0,95.0,102.0,1000\n\
             2024-01-02 00:00:00,102.0,108.0,101.0,107.0,1200\n",
        );

        let records = load_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].bar.close, 102.0);
        assert_eq!(records[1].bar.open, 102.0);
        assert!(records[1].datetime > records[0].datetime);
    }

    #[test]
    fn test_load_csv_rejects_invalid_bar() {
        let path = write_temp_csv(
            "datetime,open,high,low,close\n\
             2024-01-01 00:00:00,100.0,90.0,95.0,92.0\n",
        );

        let result = load_csv(&path);
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }
}
