//! Plain-text summary of an analysis.

use crate::domain::analysis::PortfolioAnalysis;
use crate::domain::error::RebalancerError;
use crate::ports::report_port::ReportPort;
use chrono::NaiveDate;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// `YYYY-MM ~ YYYY-MM`.
pub fn format_analysis_period(period: (NaiveDate, NaiveDate)) -> String {
    format!(
        "{} ~ {}",
        period.0.format("%Y-%m"),
        period.1.format("%Y-%m")
    )
}

pub fn render_summary(analysis: &PortfolioAnalysis) -> String {
    let m = &analysis.metrics;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Analysis Period: {}",
        format_analysis_period(analysis.analysis_period)
    );
    let _ = writeln!(out, "CAGR: {:.2}%", m.cagr * 100.0);
    let _ = writeln!(out, "MDD: {:.2}%", m.max_drawdown * 100.0);
    let _ = writeln!(out);
    let _ = writeln!(out, "Final Value:      {:.4}", m.final_value);
    let _ = writeln!(out, "Total Return:     {:.2}%", m.total_return * 100.0);
    let _ = writeln!(out, "Years:            {:.2}", m.years);
    let _ = writeln!(
        out,
        "Drawdown:         {} to {} ({} periods underwater)",
        m.drawdown_peak, m.drawdown_trough, m.max_drawdown_duration
    );
    let _ = writeln!(out, "Rebalancing:      {}", analysis.strategy);

    let _ = writeln!(out, "\nAllocation:");
    for (asset, weight) in analysis.assets.iter().zip(analysis.weights.as_slice()) {
        let _ = writeln!(out, "  {:<12} {:>6.1}%", asset, weight * 100.0);
    }
    out
}

/// Writes the text summary to a file.
pub struct ConsoleReportAdapter;

impl ReportPort for ConsoleReportAdapter {
    fn write(
        &self,
        analysis: &PortfolioAnalysis,
        output_path: &Path,
    ) -> Result<(), RebalancerError> {
        fs::write(output_path, render_summary(analysis))?;
        Ok(())
    }
}
