//! Performance metrics: CAGR, drawdowns and maximum drawdown.

use super::portfolio::PortfolioValueSeries;
use crate::domain::error::RebalancerError;
use chrono::NaiveDate;

pub const DAYS_PER_YEAR: f64 = 365.25;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawdownPoint {
    pub date: NaiveDate,
    pub drawdown: f64,
}

/// Fractional decline from the running peak, indexed like the value series.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawdownSeries {
    points: Vec<DrawdownPoint>,
}

impl DrawdownSeries {
    pub fn points(&self) -> &[DrawdownPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceMetrics {
    pub cagr: f64,
    pub max_drawdown: f64,
    pub total_return: f64,
    pub years: f64,
    pub final_value: f64,
    /// Date of the running peak preceding the deepest trough.
    pub drawdown_peak: NaiveDate,
    pub drawdown_trough: NaiveDate,
    /// Longest run of consecutive periods spent below a prior peak.
    pub max_drawdown_duration: usize,
}

impl PerformanceMetrics {
    /// `drawdowns` must be `drawdown_series(series)`.
    pub fn compute(
        series: &PortfolioValueSeries,
        drawdowns: &DrawdownSeries,
    ) -> Result<Self, RebalancerError> {
        let cagr = cagr(series)?;
        let (drawdown_peak, drawdown_trough) = drawdown_extent(series, drawdowns);

        let first = series.first();
        let last = series.last();

        Ok(PerformanceMetrics {
            cagr,
            max_drawdown: max_drawdown(drawdowns),
            total_return: last.value / first.value - 1.0,
            years: years_between(first.date, last.date),
            final_value: last.value,
            drawdown_peak,
            drawdown_trough,
            max_drawdown_duration: max_drawdown_duration(drawdowns),
        })
    }
}

pub fn years_between(start: NaiveDate, end: NaiveDate) -> f64 {
    (end - start).num_days() as f64 / DAYS_PER_YEAR
}

/// `(V_n / V_0)^(1 / years) - 1` over the series' calendar span.
pub fn cagr(series: &PortfolioValueSeries) -> Result<f64, RebalancerError> {
    let first = series.first();
    let last = series.last();
    let years = years_between(first.date, last.date);
    if years <= 0.0 {
        return Err(RebalancerError::DegenerateTimeRange { date: first.date });
    }
    let rate = (last.value / first.value).powf(1.0 / years) - 1.0;
    if !rate.is_finite() {
        return Err(RebalancerError::NonFiniteValue {
            asset: "portfolio".into(),
            date: last.date,
        });
    }
    Ok(rate)
}

/// `(value - running_max) / running_max`; the running max only looks back.
pub fn drawdown_series(series: &PortfolioValueSeries) -> DrawdownSeries {
    let points = series
        .points()
        .iter()
        .scan(f64::NEG_INFINITY, |peak, point| {
            *peak = peak.max(point.value);
            let drawdown = if *peak > 0.0 {
                (point.value - *peak) / *peak
            } else {
                0.0
            };
            Some(DrawdownPoint {
                date: point.date,
                drawdown,
            })
        })
        .collect();
    DrawdownSeries { points }
}

/// Most negative drawdown; 0 for a non-decreasing series.
pub fn max_drawdown(drawdowns: &DrawdownSeries) -> f64 {
    drawdowns
        .points
        .iter()
        .map(|p| p.drawdown)
        .fold(0.0, f64::min)
}

fn drawdown_extent(
    series: &PortfolioValueSeries,
    drawdowns: &DrawdownSeries,
) -> (NaiveDate, NaiveDate) {
    let points = series.points();
    let mut trough = 0usize;
    for (i, p) in drawdowns.points.iter().enumerate() {
        if p.drawdown < drawdowns.points[trough].drawdown {
            trough = i;
        }
    }

    let mut peak = 0usize;
    for (i, p) in points[..=trough].iter().enumerate() {
        if p.value >= points[peak].value {
            peak = i;
        }
    }

    (points[peak].date, points[trough].date)
}

fn max_drawdown_duration(drawdowns: &DrawdownSeries) -> usize {
    let mut longest = 0usize;
    let mut current = 0usize;
    for p in &drawdowns.points {
        if p.drawdown < 0.0 {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}
