//! Yahoo Finance chart client built on `yahoo_finance_api`

use super::MarketDataProvider;
use crate::error::{Result, StockError};
use crate::model::{PriceBar, PriceSeries, StockInfo};
use crate::period::Period;
use crate::ticker::TickerSymbol;
use async_trait::async_trait;
use chrono::DateTime;
use std::time::Duration;
use tracing::{debug, instrument};
use yahoo_finance_api as yahoo;

const PROVIDER: &str = "Yahoo Finance";

/// Yahoo Finance API client
pub struct YahooFinanceClient {
    connector: yahoo::YahooConnector,
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client
    pub fn new(timeout: Duration) -> Result<Self> {
        let connector = yahoo::YahooConnector::builder()
            .timeout(timeout)
            .build()
            .map_err(into_stock_error)?;
        Ok(Self { connector })
    }

    /// Fetch a chart document; `Ok(None)` when Yahoo reports the symbol unknown
    async fn chart(
        &self,
        ticker: &TickerSymbol,
        range: &str,
        interval: &str,
        include_pre_post: bool,
    ) -> Result<Option<yahoo::YResponse>> {
        let symbol = urlencoding::encode(ticker.as_str());
        debug!(%symbol, range, interval, include_pre_post, "Requesting Yahoo chart");

        match self
            .connector
            .get_quote_period_interval(&symbol, range, interval, include_pre_post)
            .await
        {
            Ok(response) => Ok(Some(response)),
            Err(e) if is_not_found(&e) => Ok(None),
            Err(e) => Err(into_stock_error(e)),
        }
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceClient {
    #[instrument(skip(self), fields(ticker = %ticker))]
    async fn stock_info(&self, ticker: &TickerSymbol) -> Result<Option<StockInfo>> {
        match self.chart(ticker, "1d", "1d", false).await? {
            Some(response) => parse_stock_info(&response),
            None => Ok(None),
        }
    }

    #[instrument(skip(self), fields(ticker = %ticker, period = %period))]
    async fn price_history(
        &self,
        ticker: &TickerSymbol,
        period: Period,
        include_extended_hours: bool,
    ) -> Result<PriceSeries> {
        match self
            .chart(ticker, period.range(), period.interval(), include_extended_hours)
            .await?
        {
            Some(response) => parse_price_series(&response),
            None => Ok(PriceSeries::default()),
        }
    }

    fn name(&self) -> &'static str {
        "yahoo"
    }
}

/// Extract company metadata from a chart response
///
/// A response without a non-empty long name is an unknown ticker.
pub(crate) fn parse_stock_info(response: &yahoo::YResponse) -> Result<Option<StockInfo>> {
    // `metadata()` indexes the first result unchecked
    if !has_result(response) {
        return Ok(None);
    }
    let meta = match response.metadata() {
        Ok(meta) => meta,
        Err(e) if is_empty_result(&e) => return Ok(None),
        Err(e) => return Err(into_stock_error(e)),
    };

    let Some(long_name) = meta.long_name.filter(|name| !name.trim().is_empty()) else {
        return Ok(None);
    };
    let exchange = if meta.full_exchange_name.is_empty() {
        meta.exchange_name
    } else {
        meta.full_exchange_name
    };

    Ok(Some(StockInfo {
        symbol: meta.symbol,
        long_name,
        short_name: meta.short_name,
        currency: meta.currency,
        current_price: meta.regular_market_price,
        previous_close: meta.previous_close.or(meta.chart_previous_close),
        exchange: Some(exchange),
        instrument_type: Some(meta.instrument_type),
    }))
}

/// Extract OHLC bars from a chart response
///
/// The connector drops buckets without a close and zero-fills the other
/// prices, so bars with a zero open, high, or low are skipped too.
pub(crate) fn parse_price_series(response: &yahoo::YResponse) -> Result<PriceSeries> {
    if !has_result(response) {
        return Ok(PriceSeries::default());
    }
    let quotes = match response.quotes() {
        Ok(quotes) => quotes,
        Err(e) if is_empty_result(&e) => return Ok(PriceSeries::default()),
        Err(e) => return Err(into_stock_error(e)),
    };

    let bars = quotes
        .into_iter()
        .filter(|q| q.open > 0.0 && q.high > 0.0 && q.low > 0.0)
        .filter_map(|q| {
            Some(PriceBar {
                timestamp: DateTime::from_timestamp(q.timestamp, 0)?,
                open: q.open,
                high: q.high,
                low: q.low,
                close: q.close,
                volume: Some(q.volume),
            })
        })
        .collect();

    Ok(PriceSeries::new(bars))
}

fn has_result(response: &yahoo::YResponse) -> bool {
    response
        .chart
        .result
        .as_ref()
        .is_some_and(|result| !result.is_empty())
}

fn is_empty_result(error: &yahoo::YahooError) -> bool {
    matches!(
        error,
        yahoo::YahooError::NoResult | yahoo::YahooError::NoQuotes
    )
}

fn is_not_found(error: &yahoo::YahooError) -> bool {
    match error {
        yahoo::YahooError::ApiError(message) => message
            .code
            .as_deref()
            .is_some_and(|code| code.eq_ignore_ascii_case("Not Found")),
        other => is_empty_result(other),
    }
}

fn into_stock_error(error: yahoo::YahooError) -> StockError {
    match error {
        yahoo::YahooError::ConnectionFailed(e) => StockError::NetworkError(e),
        yahoo::YahooError::DeserializeFailed(e) => StockError::JsonError(e),
        yahoo::YahooError::TooManyRequests(_) => StockError::RateLimitExceeded {
            provider: PROVIDER.to_string(),
        },
        yahoo::YahooError::Unauthorized
        | yahoo::YahooError::InvalidCrumb
        | yahoo::YahooError::InvalidCookie
        | yahoo::YahooError::NoCookies => StockError::AuthenticationFailed {
            provider: PROVIDER.to_string(),
        },
        other => StockError::YahooFinanceError(other.to_string()),
    }
}
