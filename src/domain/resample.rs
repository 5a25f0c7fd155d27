//! Period-end resampling and period-over-period returns.
//!
//! Each calendar period is represented by the last observation that falls
//! inside it, labelled with the calendar end of the period.

use crate::domain::alignment::{AlignedPriceTable, PriceRow};
use crate::domain::error::RebalancerError;
use chrono::{Datelike, Months, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// Return computation needs a prior observation.
pub const MIN_PERIODS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

/// `(year, index of the period within the year, 1-based)`
type PeriodKey = (i32, u32);

impl Period {
    fn months(self) -> u32 {
        match self {
            Period::Monthly => 1,
            Period::Quarterly => 3,
            Period::Yearly => 12,
        }
    }

    fn key(self, date: NaiveDate) -> PeriodKey {
        (date.year(), (date.month() - 1) / self.months() + 1)
    }

    fn next_key(self, (year, index): PeriodKey) -> PeriodKey {
        if index == 12 / self.months() {
            (year + 1, 1)
        } else {
            (year, index + 1)
        }
    }

    fn end_of(self, (year, index): PeriodKey) -> Option<NaiveDate> {
        let first_month = (index - 1) * self.months() + 1;
        NaiveDate::from_ymd_opt(year, first_month, 1)?
            .checked_add_months(Months::new(self.months()))?
            .pred_opt()
    }

    /// Last calendar day of the period containing `date`.
    pub fn period_end(self, date: NaiveDate) -> NaiveDate {
        self.end_of(self.key(date)).unwrap_or(date)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Period::Monthly => "monthly",
            Period::Quarterly => "quarterly",
            Period::Yearly => "yearly",
        };
        f.write_str(name)
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" | "month" | "m" => Ok(Period::Monthly),
            "quarterly" | "quarter" | "q" => Ok(Period::Quarterly),
            "yearly" | "annual" | "year" | "y" => Ok(Period::Yearly),
            other => Err(format!(
                "unknown period '{other}' (expected monthly, quarterly or yearly)"
            )),
        }
    }
}

/// What to do with a calendar period that has no observation between the
/// first and last observed periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GapPolicy {
    /// Repeat the previous period's prices, yielding a zero return.
    #[default]
    ForwardFill,
    /// Leave the period out; the next return spans the gap.
    Skip,
    /// Raise [`RebalancerError::PeriodGap`].
    Fail,
}

impl fmt::Display for GapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GapPolicy::ForwardFill => "forward_fill",
            GapPolicy::Skip => "skip",
            GapPolicy::Fail => "fail",
        };
        f.write_str(name)
    }
}

impl FromStr for GapPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "forward_fill" | "ffill" | "fill" => Ok(GapPolicy::ForwardFill),
            "skip" => Ok(GapPolicy::Skip),
            "fail" | "error" => Ok(GapPolicy::Fail),
            other => Err(format!(
                "unknown gap policy '{other}' (expected forward_fill, skip or fail)"
            )),
        }
    }
}

/// Reduce `table` to one row per period, keeping the last observation.
pub fn resample_last(
    table: &AlignedPriceTable,
    period: Period,
    gaps: GapPolicy,
) -> Result<AlignedPriceTable, RebalancerError> {
    let mut buckets: Vec<(PeriodKey, &PriceRow)> = Vec::new();
    for row in table.rows() {
        let key = period.key(row.date);
        match buckets.last_mut() {
            Some((last_key, last_row)) if *last_key == key => *last_row = row,
            _ => buckets.push((key, row)),
        }
    }

    let mut rows: Vec<PriceRow> = Vec::with_capacity(buckets.len());
    let mut prev_key: Option<PeriodKey> = None;

    for (key, row) in buckets {
        if let Some(prev) = prev_key {
            let mut missing = period.next_key(prev);
            while missing != key {
                let period_end = period.end_of(missing).unwrap_or(row.date);
                match gaps {
                    GapPolicy::ForwardFill => {
                        if let Some(filled) = rows.last().map(|last| PriceRow {
                            date: period_end,
                            prices: last.prices.clone(),
                        }) {
                            rows.push(filled);
                        }
                    }
                    GapPolicy::Skip => {}
                    GapPolicy::Fail => return Err(RebalancerError::PeriodGap { period_end }),
                }
                missing = period.next_key(missing);
            }
        }

        rows.push(PriceRow {
            date: period.end_of(key).unwrap_or(row.date),
            prices: row.prices.clone(),
        });
        prev_key = Some(key);
    }

    Ok(AlignedPriceTable::from_rows(table.assets().to_vec(), rows))
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnRow {
    pub date: NaiveDate,
    pub returns: Vec<f64>,
}

/// Fractional per-asset returns, one row per period after the first.
/// `base_date` is the period the first return is measured from.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnTable {
    assets: Vec<String>,
    base_date: NaiveDate,
    rows: Vec<ReturnRow>,
}

impl ReturnTable {
    pub fn new(
        assets: Vec<String>,
        base_date: NaiveDate,
        rows: Vec<ReturnRow>,
    ) -> Result<Self, RebalancerError> {
        let mut prev = base_date;
        for row in &rows {
            if row.date <= prev {
                return Err(RebalancerError::UnorderedDates { date: row.date });
            }
            if row.returns.len() != assets.len() {
                return Err(RebalancerError::Data {
                    reason: format!(
                        "return row {} has {} columns, expected {}",
                        row.date,
                        row.returns.len(),
                        assets.len()
                    ),
                });
            }
            if let Some(col) = row.returns.iter().position(|r| !r.is_finite()) {
                return Err(RebalancerError::NonFiniteValue {
                    asset: assets[col].clone(),
                    date: row.date,
                });
            }
            prev = row.date;
        }
        Ok(Self {
            assets,
            base_date,
            rows,
        })
    }

    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    pub fn base_date(&self) -> NaiveDate {
        self.base_date
    }

    pub fn rows(&self) -> &[ReturnRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// `return = price[i] / price[i-1] - 1` per column; the first row has no
/// predecessor and becomes the base date.
pub fn period_returns(prices: &AlignedPriceTable) -> Result<ReturnTable, RebalancerError> {
    let rows = prices.rows();
    if rows.len() < MIN_PERIODS {
        return Err(RebalancerError::InsufficientData {
            periods: rows.len(),
            minimum: MIN_PERIODS,
        });
    }

    let assets = prices.assets();
    let mut returns = Vec::with_capacity(rows.len() - 1);

    for pair in rows.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);
        let values: Vec<f64> = prev
            .prices
            .iter()
            .zip(&curr.prices)
            .map(|(p0, p1)| p1 / p0 - 1.0)
            .collect();
        returns.push(ReturnRow {
            date: curr.date,
            returns: values,
        });
    }

    ReturnTable::new(assets.to_vec(), rows[0].date, returns)
}

/// Resample then derive returns.
pub fn resample_returns(
    table: &AlignedPriceTable,
    period: Period,
    gaps: GapPolicy,
) -> Result<ReturnTable, RebalancerError> {
    period_returns(&resample_last(table, period, gaps)?)
}
