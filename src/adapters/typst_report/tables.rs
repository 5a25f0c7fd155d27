//! Typst table markup for the report: summary, allocation, period-returns
//! heatmap and the full value history.

use crate::adapters::console_report::format_analysis_period;
use crate::domain::analysis::PortfolioAnalysis;
use crate::domain::metrics::DrawdownSeries;
use crate::domain::portfolio::PortfolioValueSeries;
use chrono::Datelike;
use std::collections::BTreeMap;

pub struct PeriodReturn {
    pub year: i32,
    pub month: u32,
    pub return_pct: f64,
}

/// Portfolio return of each period, labelled by the month its period ends in.
/// The anchor point has no predecessor and contributes nothing.
pub fn compute_period_returns(series: &PortfolioValueSeries) -> Vec<PeriodReturn> {
    series
        .points()
        .windows(2)
        .map(|w| PeriodReturn {
            year: w[1].date.year(),
            month: w[1].date.month(),
            return_pct: if w[0].value > 0.0 {
                w[1].value / w[0].value - 1.0
            } else {
                0.0
            },
        })
        .collect()
}

pub fn format_returns_heatmap(returns: &[PeriodReturn]) -> String {
    if returns.is_empty() {
        return "_Insufficient data for period returns._\n".to_string();
    }

    let mut years: BTreeMap<i32, [Option<f64>; 12]> = BTreeMap::new();
    for r in returns {
        let entry = years.entry(r.year).or_insert([None; 12]);
        entry[(r.month - 1) as usize] = Some(r.return_pct);
    }

    let mut output = String::new();
    output.push_str("#table(\n");
    output.push_str("  columns: 14,\n");
    output.push_str("  [*Year*], [*Jan*], [*Feb*], [*Mar*], [*Apr*], [*May*], [*Jun*], ");
    output.push_str("[*Jul*], [*Aug*], [*Sep*], [*Oct*], [*Nov*], [*Dec*], [*YTD*],\n");

    for (year, months) in years.iter() {
        output.push_str(&format!("  [{}],", year));

        let mut ytd = 1.0_f64;
        for cell in months.iter() {
            match cell {
                Some(ret) => {
                    ytd *= 1.0 + ret;
                    output.push_str(&format!(" {},", format_heatmap_cell(*ret)));
                }
                None => output.push_str(" [-],"),
            }
        }
        output.push_str(&format!(" {},\n", format_heatmap_cell(ytd - 1.0)));
    }

    output.push_str(")\n");
    output
}

/// Returns (fill_color, needs_white_text) for a given return value.
fn return_color(ret: f64) -> (&'static str, bool) {
    if ret >= 0.10 {
        ("rgb(\"#006400\")", true)
    } else if ret >= 0.05 {
        ("rgb(\"#228B22\")", true)
    } else if ret >= 0.02 {
        ("rgb(\"#90EE90\")", false)
    } else if ret > 0.0 {
        ("rgb(\"#E0FFE0\")", false)
    } else if ret == 0.0 {
        ("rgb(\"#FFFFFF\")", false)
    } else if ret > -0.02 {
        ("rgb(\"#FFE0E0\")", false)
    } else if ret > -0.05 {
        ("rgb(\"#FF9090\")", false)
    } else if ret > -0.10 {
        ("rgb(\"#FF4444\")", true)
    } else {
        ("rgb(\"#8B0000\")", true)
    }
}

fn format_pct(value: f64) -> String {
    format!("{:+.1}%", value * 100.0)
}

fn format_heatmap_cell(ret: f64) -> String {
    let (color, white_text) = return_color(ret);
    let formatted = format_pct(ret);
    if white_text {
        format!("table.cell(fill: {}, text(fill: white, [{}]))", color, formatted)
    } else {
        format!("table.cell(fill: {}, [{}])", color, formatted)
    }
}

pub fn render_summary_table(analysis: &PortfolioAnalysis) -> String {
    let m = &analysis.metrics;
    let rows = [
        (
            "Analysis Period",
            format_analysis_period(analysis.analysis_period),
        ),
        ("CAGR", format!("{:.2}%", m.cagr * 100.0)),
        ("MDD", format!("{:.2}%", m.max_drawdown * 100.0)),
        ("Total Return", format!("{:.2}%", m.total_return * 100.0)),
        ("Final Value", format!("{:.4}", m.final_value)),
        ("Years", format!("{:.2}", m.years)),
        (
            "Deepest Drawdown",
            format!("{} to {}", m.drawdown_peak, m.drawdown_trough),
        ),
        (
            "Longest Drawdown",
            format!("{} periods", m.max_drawdown_duration),
        ),
        ("Rebalancing", analysis.strategy.clone()),
    ];

    let mut output = String::from("#table(\n  columns: 2,\n  align: (left, right),\n");
    output.push_str("  [*Metric*], [*Value*],\n");
    for (label, value) in rows {
        output.push_str(&format!("  [{}], [{}],\n", label, value));
    }
    output.push_str(")\n");
    output
}

pub fn render_allocation_table(assets: &[String], weights: &[f64]) -> String {
    let mut output = String::from("#table(\n  columns: 2,\n  align: (left, right),\n");
    output.push_str("  [*Ticker*], [*Weight*],\n");
    for (asset, weight) in assets.iter().zip(weights) {
        output.push_str(&format!("  [{}], [{:.1}%],\n", asset, weight * 100.0));
    }
    output.push_str(&format!(
        "  [*Total*], [*{:.1}%*],\n",
        weights.iter().sum::<f64>() * 100.0
    ));
    output.push_str(")\n");
    output
}

pub fn render_value_table(values: &PortfolioValueSeries, drawdowns: &DrawdownSeries) -> String {
    let mut output = String::from("#table(\n  columns: 3,\n  align: (left, right, right),\n");
    output.push_str("  [*Period End*], [*Value*], [*Drawdown*],\n");
    for (v, dd) in values.points().iter().zip(drawdowns.points()) {
        output.push_str(&format!(
            "  [{}], [{:.4}], [{:.2}%],\n",
            v.date.format("%Y-%m-%d"),
            v.value,
            dd.drawdown * 100.0
        ));
    }
    output.push_str(")\n");
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::drawdown_series;
    use crate::domain::portfolio::ValuePoint;
    use chrono::NaiveDate;

    fn make_series(values: &[(i32, u32, u32, f64)]) -> PortfolioValueSeries {
        PortfolioValueSeries::new(
            values
                .iter()
                .map(|(y, m, d, v)| ValuePoint {
                    date: NaiveDate::from_ymd_opt(*y, *m, *d).unwrap(),
                    value: *v,
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn period_returns_skip_anchor() {
        let series = make_series(&[
            (2024, 1, 31, 100.0),
            (2024, 2, 29, 110.0),
            (2024, 3, 31, 104.0),
        ]);
        let returns = compute_period_returns(&series);

        assert_eq!(returns.len(), 2);
        assert_eq!((returns[0].year, returns[0].month), (2024, 2));
        assert!((returns[0].return_pct - 0.10).abs() < 1e-9);
        assert_eq!((returns[1].year, returns[1].month), (2024, 3));
        assert!((returns[1].return_pct - (-6.0 / 110.0)).abs() < 1e-9);
    }

    #[test]
    fn period_returns_single_point_is_empty() {
        let series = make_series(&[(2024, 1, 31, 100.0)]);
        assert!(compute_period_returns(&series).is_empty());
    }

    #[test]
    fn heatmap_empty() {
        let output = format_returns_heatmap(&[]);
        assert!(output.contains("Insufficient data"));
    }

    #[test]
    fn heatmap_with_data() {
        let returns = vec![
            PeriodReturn {
                year: 2024,
                month: 1,
                return_pct: 0.05,
            },
            PeriodReturn {
                year: 2024,
                month: 2,
                return_pct: -0.02,
            },
            PeriodReturn {
                year: 2025,
                month: 1,
                return_pct: 0.0,
            },
        ];
        let output = format_returns_heatmap(&returns);

        assert!(output.contains("#table"));
        assert!(output.contains("[*YTD*]"));
        assert!(output.contains("[2024]"));
        assert!(output.contains("[2025]"));
        assert!(output.contains("+5.0%"));
        assert!(output.contains("-2.0%"));
        // 1.05 * 0.98 - 1
        assert!(output.contains("+2.9%"));
    }

    #[test]
    fn return_color_buckets() {
        assert!(return_color(0.15).0.contains("006400"));
        assert!(return_color(0.03).0.contains("90EE90"));
        assert!(return_color(0.0).0.contains("FFFFFF"));
        assert!(return_color(-0.03).0.contains("FF9090"));
        assert!(return_color(-0.15).0.contains("8B0000"));
        assert!(return_color(-0.15).1);
        assert!(!return_color(-0.01).1);
    }

    #[test]
    fn allocation_table_lists_weights_and_total() {
        let assets = vec!["379800".to_string(), "308620".to_string()];
        let output = render_allocation_table(&assets, &[0.6, 0.3]);

        assert!(output.contains("[379800], [60.0%]"));
        assert!(output.contains("[308620], [30.0%]"));
        assert!(output.contains("[*90.0%*]"));
    }

    #[test]
    fn value_table_has_row_per_point() {
        let series = make_series(&[
            (2024, 1, 31, 1.0),
            (2024, 2, 29, 1.1),
            (2024, 3, 31, 0.99),
        ]);
        let output = render_value_table(&series, &drawdown_series(&series));

        assert!(output.contains("[2024-01-31], [1.0000], [0.00%]"));
        assert!(output.contains("[2024-03-31], [0.9900], [-10.00%]"));
        assert_eq!(output.matches("[2024-").count(), 3);
    }
}
