//! Price data access port trait.

use crate::domain::error::RebalancerError;
use crate::domain::price_series::AssetSeries;
use chrono::NaiveDate;

/// Source of historical closing prices. Implementations may block on I/O;
/// the domain only ever sees the returned in-memory series.
pub trait DataPort {
    fn fetch_closes(&self, ticker: &str) -> Result<AssetSeries, RebalancerError>;

    fn list_tickers(&self) -> Result<Vec<String>, RebalancerError>;

    /// `(first, last, count)` of priced observations, `None` if there are none.
    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, RebalancerError> {
        Ok(self.fetch_closes(ticker)?.data_range())
    }
}

/// Fetch every ticker in order, failing on the first error.
pub fn fetch_all(
    port: &dyn DataPort,
    tickers: &[String],
) -> Result<Vec<AssetSeries>, RebalancerError> {
    tickers.iter().map(|t| port.fetch_closes(t)).collect()
}
