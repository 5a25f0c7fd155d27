#![allow(dead_code)]

use chrono::NaiveDate;
use rebalancer::domain::error::RebalancerError;
pub use rebalancer::domain::price_series::{AssetSeries, PricePoint};
use rebalancer::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_points(mut self, ticker: &str, points: Vec<PricePoint>) -> Self {
        self.data.insert(ticker.to_string(), points);
        self
    }

    pub fn with_closes(self, ticker: &str, closes: &[(NaiveDate, f64)]) -> Self {
        let points = closes
            .iter()
            .map(|&(date, close)| PricePoint::new(date, close))
            .collect();
        self.with_points(ticker, points)
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_closes(&self, ticker: &str) -> Result<AssetSeries, RebalancerError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(RebalancerError::Data {
                reason: reason.clone(),
            });
        }
        match self.data.get(ticker) {
            Some(points) => Ok(AssetSeries::new(ticker, points.clone())),
            None => Err(RebalancerError::Data {
                reason: format!("no data for {ticker}"),
            }),
        }
    }

    fn list_tickers(&self) -> Result<Vec<String>, RebalancerError> {
        let mut tickers: Vec<String> = self.data.keys().cloned().collect();
        tickers.sort();
        Ok(tickers)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Month-end-ish closes starting January 2022, one observation per month
/// on the 28th.
pub fn month_closes(closes: &[f64]) -> Vec<(NaiveDate, f64)> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let (year, month) = (2022 + (i / 12) as i32, (i % 12) as u32 + 1);
            (date(year, month, 28), close)
        })
        .collect()
}

/// Several trading days per month; the last one (the 25th) carries `closes[i]`.
pub fn daily_series(name: &str, closes: &[f64]) -> AssetSeries {
    let mut points = Vec::new();
    for (i, &close) in closes.iter().enumerate() {
        let (year, month) = (2022 + (i / 12) as i32, (i % 12) as u32 + 1);
        for day in [3, 10, 17] {
            points.push((date(year, month, day), close * (0.9 + day as f64 / 100.0)));
        }
        points.push((date(year, month, 25), close));
    }
    AssetSeries::from_closes(name, &points)
}

pub fn csv_body(closes: &[(NaiveDate, f64)]) -> String {
    let mut body = String::from("date,close\n");
    for (d, c) in closes {
        body.push_str(&format!("{},{}\n", d.format("%Y-%m-%d"), c));
    }
    body
}
