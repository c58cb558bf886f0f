//! API clients for market-data and analyst-ratings providers

pub mod finnhub;
pub mod yahoo;

pub use finnhub::FinnhubClient;
pub use yahoo::YahooFinanceClient;

use crate::error::Result;
use crate::model::{PriceSeries, RatingsSnapshot, StockInfo};
use crate::period::Period;
use crate::ticker::TickerSymbol;
use async_trait::async_trait;

/// Source of company metadata and price history
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Company metadata and live pricing
    ///
    /// `Ok(None)` means the provider has no company name for the ticker.
    async fn stock_info(&self, ticker: &TickerSymbol) -> Result<Option<StockInfo>>;

    /// OHLC history for a period; an empty series is a valid "no data" answer
    async fn price_history(
        &self,
        ticker: &TickerSymbol,
        period: Period,
        include_extended_hours: bool,
    ) -> Result<PriceSeries>;

    /// Provider name used in logs and fault reports
    fn name(&self) -> &'static str;
}

/// Source of analyst recommendation trends
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RatingsProvider: Send + Sync {
    /// Periodic rating records, most recent first
    async fn recommendation_trends(&self, ticker: &TickerSymbol) -> Result<RatingsSnapshot>;

    /// Provider name used in logs and fault reports
    fn name(&self) -> &'static str;
}
