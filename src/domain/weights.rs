//! Target weight vectors.
//!
//! Weights are used exactly as given. They are not required to sum to 1:
//! a sum below 1 leaves the remainder of the capital idle for the period.
//! [`WeightCheck::UnitSum`] lets callers opt into a strict check instead;
//! weights are never renormalised.

use crate::domain::error::RebalancerError;

pub const DEFAULT_WEIGHT_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum WeightCheck {
    #[default]
    Permissive,
    UnitSum { tolerance: f64 },
}

/// Non-negative, finite weights in asset column order.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightVector(Vec<f64>);

impl WeightVector {
    pub fn new(values: Vec<f64>) -> Result<Self, RebalancerError> {
        if let Some((index, &value)) = values
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(RebalancerError::InvalidWeight { index, value });
        }
        Ok(Self(values))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Checks the vector against `asset_count` columns and, under
    /// [`WeightCheck::UnitSum`], that the weights sum to 1.
    pub fn validate(&self, asset_count: usize, check: WeightCheck) -> Result<(), RebalancerError> {
        if self.0.len() != asset_count {
            return Err(RebalancerError::WeightCount {
                weights: self.0.len(),
                assets: asset_count,
            });
        }
        if let WeightCheck::UnitSum { tolerance } = check {
            let sum = self.sum();
            if (sum - 1.0).abs() > tolerance {
                return Err(RebalancerError::WeightSum { sum, tolerance });
            }
        }
        Ok(())
    }
}

impl TryFrom<Vec<f64>> for WeightVector {
    type Error = RebalancerError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}
