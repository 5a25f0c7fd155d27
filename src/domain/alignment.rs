//! Price alignment across assets.
//!
//! Inner-joins several [`AssetSeries`] on date: a row survives only when
//! every asset has a price for that date. Column order follows input order.

use crate::domain::error::RebalancerError;
use crate::domain::price_series::AssetSeries;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceRow {
    pub date: NaiveDate,
    pub prices: Vec<f64>,
}

/// Date-ordered price rows with one column per asset and no missing cells.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedPriceTable {
    assets: Vec<String>,
    rows: Vec<PriceRow>,
}

impl AlignedPriceTable {
    pub(crate) fn from_rows(assets: Vec<String>, rows: Vec<PriceRow>) -> Self {
        Self { assets, rows }
    }

    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    pub fn rows(&self) -> &[PriceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.rows.iter().map(|r| r.date)
    }

    /// `(min_date, max_date)` of the table, used for display.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.rows.first()?.date, self.rows.last()?.date))
    }
}

/// Align `series` on their common dates, then drop rows strictly before
/// `start_date` when one is given. Every kept price must be finite and
/// strictly positive.
pub fn align_prices(
    series: &[AssetSeries],
    start_date: Option<NaiveDate>,
) -> Result<AlignedPriceTable, RebalancerError> {
    let Some(first) = series.first() else {
        return Err(RebalancerError::EmptyResult {
            reason: "no asset series supplied".into(),
        });
    };

    let mut common_dates = 0usize;
    let mut rows = Vec::new();

    for point in first.points() {
        let prices: Option<Vec<f64>> = series.iter().map(|s| s.close_on(point.date)).collect();
        let Some(prices) = prices else {
            continue;
        };
        common_dates += 1;

        if start_date.is_some_and(|start| point.date < start) {
            continue;
        }

        if let Some(col) = prices.iter().position(|p| !p.is_finite()) {
            return Err(RebalancerError::NonFiniteValue {
                asset: series[col].name.clone(),
                date: point.date,
            });
        }
        if let Some(col) = prices.iter().position(|p| *p <= 0.0) {
            return Err(RebalancerError::NonPositivePrice {
                asset: series[col].name.clone(),
                date: point.date,
                value: prices[col],
            });
        }

        rows.push(PriceRow {
            date: point.date,
            prices,
        });
    }

    if rows.is_empty() {
        let reason = match start_date {
            Some(start) if common_dates > 0 => {
                format!("no common dates on or after {start}")
            }
            _ => "assets share no common dates".to_string(),
        };
        return Err(RebalancerError::EmptyResult { reason });
    }

    let assets = series.iter().map(|s| s.name.clone()).collect();
    Ok(AlignedPriceTable::from_rows(assets, rows))
}
