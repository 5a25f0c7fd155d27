//! CSV file price data adapter.
//!
//! One file per ticker, `<ticker>.csv`, with a header row. The date column
//! is the one named `date` or, failing that, the first column; prices are
//! read from the `close` column. An empty close cell is a missing price.

use crate::domain::error::RebalancerError;
use crate::domain::price_series::{AssetSeries, PricePoint};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}

impl DataPort for CsvAdapter {
    fn fetch_closes(&self, ticker: &str) -> Result<AssetSeries, RebalancerError> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path).map_err(|e| RebalancerError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| RebalancerError::Data {
                reason: format!("{}: CSV header error: {}", path.display(), e),
            })?
            .clone();

        let date_col = column_index(&headers, "date").unwrap_or(0);
        let close_col = column_index(&headers, "close").ok_or_else(|| RebalancerError::Data {
            reason: format!("{}: missing close column", path.display()),
        })?;

        let mut points = Vec::new();
        for (line, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| RebalancerError::Data {
                reason: format!("{}: CSV parse error: {}", path.display(), e),
            })?;

            let date_str = record.get(date_col).ok_or_else(|| RebalancerError::Data {
                reason: format!("{}: row {} has no date", path.display(), line + 2),
            })?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
                RebalancerError::Data {
                    reason: format!(
                        "{}: invalid date '{}' on row {}: {}",
                        path.display(),
                        date_str,
                        line + 2,
                        e
                    ),
                }
            })?;

            let close = match record.get(close_col).map(str::trim) {
                None | Some("") => None,
                Some(raw) => Some(raw.parse::<f64>().map_err(|e| RebalancerError::Data {
                    reason: format!(
                        "{}: invalid close '{}' on row {}: {}",
                        path.display(),
                        raw,
                        line + 2,
                        e
                    ),
                })?),
            };

            points.push(PricePoint { date, close });
        }

        tracing::debug!(ticker, rows = points.len(), path = %path.display(), "loaded price file");
        Ok(AssetSeries::new(ticker, points))
    }

    fn list_tickers(&self) -> Result<Vec<String>, RebalancerError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| RebalancerError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut tickers = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| RebalancerError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(ticker) = name_str.strip_suffix(".csv") {
                tickers.push(ticker.to_string());
            }
        }

        tickers.sort();
        Ok(tickers)
    }
}
