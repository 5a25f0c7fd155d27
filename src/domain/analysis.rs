//! End-to-end portfolio analysis: align, resample, simulate, measure.

use crate::domain::alignment::align_prices;
use crate::domain::error::RebalancerError;
use crate::domain::metrics::{drawdown_series, DrawdownSeries, PerformanceMetrics};
use crate::domain::portfolio::PortfolioValueSeries;
use crate::domain::price_series::AssetSeries;
use crate::domain::rebalance::{simulate, RebalanceStrategy, DEFAULT_INITIAL_CAPITAL};
use crate::domain::resample::{resample_returns, GapPolicy, Period, ReturnTable};
use crate::domain::weights::{WeightCheck, WeightVector};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub weights: WeightVector,
    pub start_date: Option<NaiveDate>,
    pub initial_capital: f64,
    pub period: Period,
    pub gap_policy: GapPolicy,
    pub weight_check: WeightCheck,
}

impl AnalysisRequest {
    pub fn new(weights: WeightVector) -> Self {
        Self {
            weights,
            start_date: None,
            initial_capital: DEFAULT_INITIAL_CAPITAL,
            period: Period::default(),
            gap_policy: GapPolicy::default(),
            weight_check: WeightCheck::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioAnalysis {
    pub assets: Vec<String>,
    pub weights: WeightVector,
    pub strategy: String,
    /// First and last aligned trading dates.
    pub analysis_period: (NaiveDate, NaiveDate),
    pub returns: ReturnTable,
    pub values: PortfolioValueSeries,
    pub drawdowns: DrawdownSeries,
    pub metrics: PerformanceMetrics,
}

/// Run the whole pipeline over already-fetched price series.
pub fn analyze(
    series: &[AssetSeries],
    request: &AnalysisRequest,
    strategy: &dyn RebalanceStrategy,
) -> Result<PortfolioAnalysis, RebalancerError> {
    request
        .weights
        .validate(series.len(), request.weight_check)?;

    let aligned = align_prices(series, request.start_date)?;
    let analysis_period = aligned
        .date_range()
        .ok_or_else(|| RebalancerError::EmptyResult {
            reason: "aligned table is empty".into(),
        })?;

    let returns = resample_returns(&aligned, request.period, request.gap_policy)?;
    let values = simulate(
        &returns,
        &request.weights,
        request.initial_capital,
        strategy,
    )?;
    let drawdowns = drawdown_series(&values);
    let metrics = PerformanceMetrics::compute(&values, &drawdowns)?;

    Ok(PortfolioAnalysis {
        assets: aligned.assets().to_vec(),
        weights: request.weights.clone(),
        strategy: strategy.name().to_string(),
        analysis_period,
        returns,
        values,
        drawdowns,
        metrics,
    })
}
