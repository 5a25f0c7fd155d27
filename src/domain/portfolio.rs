//! Portfolio value series.

use crate::domain::error::RebalancerError;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValuePoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Cumulative portfolio value, strictly ascending by date, never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioValueSeries {
    points: Vec<ValuePoint>,
}

impl PortfolioValueSeries {
    pub fn new(points: Vec<ValuePoint>) -> Result<Self, RebalancerError> {
        if points.is_empty() {
            return Err(RebalancerError::EmptyResult {
                reason: "value series has no points".into(),
            });
        }
        for (i, point) in points.iter().enumerate() {
            if !point.value.is_finite() {
                return Err(RebalancerError::NonFiniteValue {
                    asset: "portfolio".into(),
                    date: point.date,
                });
            }
            if i > 0 && point.date <= points[i - 1].date {
                return Err(RebalancerError::UnorderedDates { date: point.date });
            }
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[ValuePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> ValuePoint {
        self.points[0]
    }

    pub fn last(&self) -> ValuePoint {
        self.points[self.points.len() - 1]
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    pub fn date_range(&self) -> (NaiveDate, NaiveDate) {
        (self.first().date, self.last().date)
    }
}
