//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for rebalancer.
#[derive(Debug, thiserror::Error)]
pub enum RebalancerError {
    #[error("empty result: {reason}")]
    EmptyResult { reason: String },

    #[error("insufficient data: have {periods} periods, need {minimum}")]
    InsufficientData { periods: usize, minimum: usize },

    #[error("non-finite value for {asset} on {date}")]
    NonFiniteValue { asset: String, date: NaiveDate },

    #[error("non-positive price {value} for {asset} on {date}")]
    NonPositivePrice {
        asset: String,
        date: NaiveDate,
        value: f64,
    },

    #[error("degenerate time range: series starts and ends on {date}")]
    DegenerateTimeRange { date: NaiveDate },

    #[error("weights sum to {sum}, expected 1 within {tolerance}")]
    WeightSum { sum: f64, tolerance: f64 },

    #[error("got {weights} weights for {assets} assets")]
    WeightCount { weights: usize, assets: usize },

    #[error("invalid weight at position {index}: {value}")]
    InvalidWeight { index: usize, value: f64 },

    #[error("initial capital must be positive and finite, got {value}")]
    InvalidCapital { value: f64 },

    #[error("no observation in period ending {period_end}")]
    PeriodGap { period_end: NaiveDate },

    #[error("dates out of order at {date}")]
    UnorderedDates { date: NaiveDate },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&RebalancerError> for std::process::ExitCode {
    fn from(err: &RebalancerError) -> Self {
        let code: u8 = match err {
            RebalancerError::Io(_) => 1,
            RebalancerError::ConfigParse { .. }
            | RebalancerError::ConfigMissing { .. }
            | RebalancerError::ConfigInvalid { .. } => 2,
            RebalancerError::Data { .. } => 3,
            RebalancerError::WeightSum { .. }
            | RebalancerError::WeightCount { .. }
            | RebalancerError::InvalidWeight { .. }
            | RebalancerError::InvalidCapital { .. } => 4,
            RebalancerError::EmptyResult { .. }
            | RebalancerError::InsufficientData { .. }
            | RebalancerError::PeriodGap { .. }
            | RebalancerError::UnorderedDates { .. } => 5,
            RebalancerError::NonFiniteValue { .. }
            | RebalancerError::NonPositivePrice { .. }
            | RebalancerError::DegenerateTimeRange { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
