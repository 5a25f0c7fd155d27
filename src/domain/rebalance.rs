//! Rebalancing policies and the portfolio value simulation.
//!
//! The simulation seeds the value series with the initial capital at the
//! return table's base date, then folds every return row through a
//! [`RebalanceStrategy`], oldest first.

use crate::domain::error::RebalancerError;
use crate::domain::portfolio::{PortfolioValueSeries, ValuePoint};
use crate::domain::resample::ReturnTable;
use crate::domain::weights::{WeightCheck, WeightVector};

pub const DEFAULT_INITIAL_CAPITAL: f64 = 1.0;

/// A policy that carries portfolio value across one period.
pub trait RebalanceStrategy {
    fn name(&self) -> &str;

    /// Value at the end of a period, given the value at its start, the
    /// target weights and each asset's return over the period.
    fn apply_period(&self, prior_value: f64, weights: &WeightVector, returns: &[f64]) -> f64;
}

/// Reallocate the whole prior value to the target weights at the start of
/// every period:
///
/// `value[i] = value[i-1] * sum_j(weight[j] * (1 + return[j][i]))`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FullRebalance;

impl RebalanceStrategy for FullRebalance {
    fn name(&self) -> &str {
        "full"
    }

    fn apply_period(&self, prior_value: f64, weights: &WeightVector, returns: &[f64]) -> f64 {
        weights
            .as_slice()
            .iter()
            .zip(returns)
            .map(|(w, r)| prior_value * w * (1.0 + r))
            .sum()
    }
}

/// Run `strategy` over every row of `returns`, starting from
/// `initial_capital`. The result has `returns.len() + 1` points.
pub fn simulate(
    returns: &ReturnTable,
    weights: &WeightVector,
    initial_capital: f64,
    strategy: &dyn RebalanceStrategy,
) -> Result<PortfolioValueSeries, RebalancerError> {
    if !initial_capital.is_finite() || initial_capital <= 0.0 {
        return Err(RebalancerError::InvalidCapital {
            value: initial_capital,
        });
    }
    weights.validate(returns.assets().len(), WeightCheck::Permissive)?;

    let anchor = ValuePoint {
        date: returns.base_date(),
        value: initial_capital,
    };

    let points = std::iter::once(Ok(anchor))
        .chain(returns.rows().iter().scan(initial_capital, |prior, row| {
            let value = strategy.apply_period(*prior, weights, &row.returns);
            *prior = value;
            Some(if value.is_finite() {
                Ok(ValuePoint {
                    date: row.date,
                    value,
                })
            } else {
                Err(RebalancerError::NonFiniteValue {
                    asset: "portfolio".into(),
                    date: row.date,
                })
            })
        }))
        .collect::<Result<Vec<_>, _>>()?;

    PortfolioValueSeries::new(points)
}
