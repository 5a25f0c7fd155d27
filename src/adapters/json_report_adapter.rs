//! JSON report adapter.

use crate::domain::analysis::PortfolioAnalysis;
use crate::domain::error::RebalancerError;
use crate::ports::report_port::ReportPort;
use chrono::NaiveDate;
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub assets: Vec<AllocationEntry>,
    pub strategy: String,
    pub analysis_period: PeriodEntry,
    pub metrics: MetricsEntry,
    pub values: Vec<SeriesEntry>,
    pub drawdowns: Vec<SeriesEntry>,
}

#[derive(Debug, Serialize)]
pub struct AllocationEntry {
    pub ticker: String,
    pub weight: f64,
}

#[derive(Debug, Serialize)]
pub struct PeriodEntry {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct MetricsEntry {
    pub cagr: f64,
    pub mdd: f64,
    pub total_return: f64,
    pub years: f64,
    pub final_value: f64,
    pub drawdown_peak: NaiveDate,
    pub drawdown_trough: NaiveDate,
    pub max_drawdown_duration: usize,
}

#[derive(Debug, Serialize)]
pub struct SeriesEntry {
    pub date: NaiveDate,
    pub value: f64,
}

impl From<&PortfolioAnalysis> for JsonReport {
    fn from(analysis: &PortfolioAnalysis) -> Self {
        let m = &analysis.metrics;
        JsonReport {
            assets: analysis
                .assets
                .iter()
                .zip(analysis.weights.as_slice())
                .map(|(ticker, &weight)| AllocationEntry {
                    ticker: ticker.clone(),
                    weight,
                })
                .collect(),
            strategy: analysis.strategy.clone(),
            analysis_period: PeriodEntry {
                start: analysis.analysis_period.0,
                end: analysis.analysis_period.1,
            },
            metrics: MetricsEntry {
                cagr: m.cagr,
                mdd: m.max_drawdown,
                total_return: m.total_return,
                years: m.years,
                final_value: m.final_value,
                drawdown_peak: m.drawdown_peak,
                drawdown_trough: m.drawdown_trough,
                max_drawdown_duration: m.max_drawdown_duration,
            },
            values: analysis
                .values
                .points()
                .iter()
                .map(|p| SeriesEntry {
                    date: p.date,
                    value: p.value,
                })
                .collect(),
            drawdowns: analysis
                .drawdowns
                .points()
                .iter()
                .map(|p| SeriesEntry {
                    date: p.date,
                    value: p.drawdown,
                })
                .collect(),
        }
    }
}

pub fn to_json(analysis: &PortfolioAnalysis) -> Result<String, RebalancerError> {
    serde_json::to_string_pretty(&JsonReport::from(analysis)).map_err(|e| RebalancerError::Data {
        reason: format!("failed to serialize report: {}", e),
    })
}

pub struct JsonReportAdapter;

impl ReportPort for JsonReportAdapter {
    fn write(
        &self,
        analysis: &PortfolioAnalysis,
        output_path: &Path,
    ) -> Result<(), RebalancerError> {
        fs::write(output_path, to_json(analysis)?)?;
        tracing::info!(path = %output_path.display(), "wrote JSON report");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::{analyze, AnalysisRequest};
    use crate::domain::price_series::AssetSeries;
    use crate::domain::rebalance::FullRebalance;
    use crate::domain::weights::WeightVector;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sample() -> PortfolioAnalysis {
        let closes = [
            (d(2022, 1, 28), 100.0),
            (d(2022, 2, 28), 110.0),
            (d(2022, 3, 31), 99.0),
        ];
        let a = AssetSeries::from_closes("A", &closes);
        let b = AssetSeries::from_closes("B", &closes);
        let request = AnalysisRequest::new(WeightVector::new(vec![0.6, 0.4]).unwrap());
        analyze(&[a, b], &request, &FullRebalance).unwrap()
    }

    #[test]
    fn json_has_expected_shape() {
        let json = to_json(&sample()).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(v["assets"][0]["ticker"], "A");
        assert_eq!(v["assets"][1]["weight"], 0.4);
        assert_eq!(v["strategy"], "full");
        assert_eq!(v["analysis_period"]["start"], "2022-01-28");
        assert_eq!(v["analysis_period"]["end"], "2022-03-31");
        assert_eq!(v["values"].as_array().unwrap().len(), 3);
        assert_eq!(v["values"][0]["date"], "2022-01-31");
        assert_eq!(v["values"][0]["value"], 1.0);
        assert_eq!(v["drawdowns"].as_array().unwrap().len(), 3);
        assert!(v["metrics"]["mdd"].as_f64().unwrap() < 0.0);
    }

    #[test]
    fn adapter_writes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("report.json");
        JsonReportAdapter.write(&sample(), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"cagr\""));
    }
}
