//! Per-asset closing price series.

use chrono::NaiveDate;
use std::collections::BTreeMap;

/// A single observation. `close` is `None` when the provider has the date
/// but no price for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: Option<f64>,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            close: Some(close),
        }
    }

    pub fn missing(date: NaiveDate) -> Self {
        Self { date, close: None }
    }
}

/// Closing prices for one asset, ascending by date with one point per date.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetSeries {
    pub name: String,
    points: Vec<PricePoint>,
}

impl AssetSeries {
    /// Sorts the points by date. When a date appears more than once the
    /// later point wins.
    pub fn new(name: impl Into<String>, points: Vec<PricePoint>) -> Self {
        let by_date: BTreeMap<NaiveDate, Option<f64>> =
            points.into_iter().map(|p| (p.date, p.close)).collect();
        let points = by_date
            .into_iter()
            .map(|(date, close)| PricePoint { date, close })
            .collect();
        Self {
            name: name.into(),
            points,
        }
    }

    pub fn from_closes(name: impl Into<String>, closes: &[(NaiveDate, f64)]) -> Self {
        Self::new(
            name,
            closes
                .iter()
                .map(|&(date, close)| PricePoint::new(date, close))
                .collect(),
        )
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn close_on(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .and_then(|i| self.points[i].close)
    }

    /// First and last dates carrying a price, with the number of priced points.
    pub fn data_range(&self) -> Option<(NaiveDate, NaiveDate, usize)> {
        let mut priced = self.points.iter().filter(|p| p.close.is_some());
        let first = priced.next()?;
        let (last, count) = priced.fold((first.date, 1usize), |(_, n), p| (p.date, n + 1));
        Some((first.date, last, count))
    }
}
