//! Configuration validation.
//!
//! Validates all portfolio, data and report keys before an analysis runs.

use crate::domain::error::RebalancerError;
use crate::domain::rebalance::DEFAULT_INITIAL_CAPITAL;
use crate::domain::resample::{GapPolicy, Period};
use crate::domain::universe::{parse_tickers, parse_weights};
use crate::domain::weights::DEFAULT_WEIGHT_TOLERANCE;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const REPORT_FORMATS: [&str; 3] = ["console", "json", "typst"];

pub fn validate_portfolio_config(config: &dyn ConfigPort) -> Result<(), RebalancerError> {
    let tickers = validate_tickers(config)?;
    validate_weights(config, tickers)?;
    validate_initial_capital(config)?;
    validate_start_date(config)?;
    validate_period(config)?;
    validate_gap_policy(config)?;
    validate_require_unit_weights(config)?;
    validate_weight_tolerance(config)?;
    validate_report_format(config)?;
    Ok(())
}

/// Parse `YYYY-MM-DD`, or `YYYY-MM` as the first day of that month.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d"))
        .ok()
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> RebalancerError {
    RebalancerError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn missing(section: &str, key: &str) -> RebalancerError {
    RebalancerError::ConfigMissing {
        section: section.to_string(),
        key: key.to_string(),
    }
}

fn validate_tickers(config: &dyn ConfigPort) -> Result<usize, RebalancerError> {
    let raw = config
        .get_trimmed("portfolio", "tickers")
        .ok_or_else(|| missing("portfolio", "tickers"))?;
    parse_tickers(&raw)
        .map(|t| t.len())
        .map_err(|e| invalid("portfolio", "tickers", e.to_string()))
}

fn validate_weights(config: &dyn ConfigPort, ticker_count: usize) -> Result<(), RebalancerError> {
    let raw = config
        .get_trimmed("portfolio", "weights")
        .ok_or_else(|| missing("portfolio", "weights"))?;
    let weights =
        parse_weights(&raw).map_err(|e| invalid("portfolio", "weights", e.to_string()))?;

    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(invalid(
            "portfolio",
            "weights",
            "weights must be non-negative",
        ));
    }
    if weights.len() != ticker_count {
        return Err(invalid(
            "portfolio",
            "weights",
            format!(
                "{} weights given for {} tickers",
                weights.len(),
                ticker_count
            ),
        ));
    }
    Ok(())
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), RebalancerError> {
    let value = config.get_double("portfolio", "initial_capital", DEFAULT_INITIAL_CAPITAL)?;
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(
            "portfolio",
            "initial_capital",
            "initial_capital must be positive",
        ));
    }
    Ok(())
}

fn validate_start_date(config: &dyn ConfigPort) -> Result<(), RebalancerError> {
    match config.get_trimmed("portfolio", "start_date") {
        None => Ok(()),
        Some(s) => parse_date(&s).map(|_| ()).ok_or_else(|| {
            invalid(
                "portfolio",
                "start_date",
                "invalid start_date format, expected YYYY-MM-DD or YYYY-MM",
            )
        }),
    }
}

fn validate_period(config: &dyn ConfigPort) -> Result<(), RebalancerError> {
    match config.get_trimmed("portfolio", "period") {
        None => Ok(()),
        Some(s) => s
            .parse::<Period>()
            .map(|_| ())
            .map_err(|e| invalid("portfolio", "period", e)),
    }
}

fn validate_gap_policy(config: &dyn ConfigPort) -> Result<(), RebalancerError> {
    match config.get_trimmed("portfolio", "gap_policy") {
        None => Ok(()),
        Some(s) => s
            .parse::<GapPolicy>()
            .map(|_| ())
            .map_err(|e| invalid("portfolio", "gap_policy", e)),
    }
}

fn validate_require_unit_weights(config: &dyn ConfigPort) -> Result<(), RebalancerError> {
    config
        .get_bool("portfolio", "require_unit_weights", false)
        .map(|_| ())
}

fn validate_weight_tolerance(config: &dyn ConfigPort) -> Result<(), RebalancerError> {
    let value = config.get_double("portfolio", "weight_tolerance", DEFAULT_WEIGHT_TOLERANCE)?;
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(
            "portfolio",
            "weight_tolerance",
            "weight_tolerance must be positive",
        ));
    }
    Ok(())
}

fn validate_report_format(config: &dyn ConfigPort) -> Result<(), RebalancerError> {
    match config.get_trimmed("report", "format") {
        None => Ok(()),
        Some(f) if REPORT_FORMATS.contains(&f.to_lowercase().as_str()) => Ok(()),
        Some(f) => Err(invalid(
            "report",
            "format",
            format!("unknown format '{f}' (expected console, json or typst)"),
        )),
    }
}
