//! Finnhub client for analyst recommendation trends

use super::RatingsProvider;
use crate::error::{Result, StockError};
use crate::model::{RatingRecord, RatingsSnapshot};
use crate::ticker::TickerSymbol;
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::{Client, StatusCode};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

const BASE_URL: &str = "https://finnhub.io/api/v1";
const FREE_TIER_PER_MINUTE: NonZeroU32 = NonZeroU32::new(60).expect("60 is non-zero");

/// Environment variable holding the API key
pub const FINNHUB_API_KEY_ENV: &str = "FINNHUB_API_KEY";

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Finnhub client for recommendation trends
pub struct FinnhubClient {
    client: Client,
    api_key: String,
    rate_limiter: SharedRateLimiter,
}

impl FinnhubClient {
    /// Create a new Finnhub client with rate limiting
    ///
    /// # Arguments
    /// * `api_key` - Finnhub API key
    /// * `rate_limit` - Requests per minute (free tier: 60, premium: 300+)
    /// * `timeout` - Per-request timeout
    pub fn new(api_key: impl Into<String>, rate_limit: u32, timeout: Duration) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(StockError::ConfigError(format!(
                "{FINNHUB_API_KEY_ENV} is empty"
            )));
        }

        let quota = Quota::per_minute(NonZeroU32::new(rate_limit).unwrap_or(FREE_TIER_PER_MINUTE));
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key,
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }
}

#[async_trait]
impl RatingsProvider for FinnhubClient {
    #[instrument(skip(self), fields(ticker = %ticker))]
    async fn recommendation_trends(&self, ticker: &TickerSymbol) -> Result<RatingsSnapshot> {
        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .get(format!("{BASE_URL}/stock/recommendation"))
            .query(&[("symbol", ticker.as_str()), ("token", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(StockError::AuthenticationFailed {
                    provider: "Finnhub".to_string(),
                });
            }
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(StockError::RateLimitExceeded {
                    provider: "Finnhub".to_string(),
                });
            }
            s if !s.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(StockError::FinnhubError(format!("HTTP {s}: {body}")));
            }
            _ => {}
        }

        let body = response.text().await?;
        let snapshot = parse_recommendations(&body)?;
        debug!(records = snapshot.records().len(), "Received recommendation trends");
        Ok(snapshot)
    }

    fn name(&self) -> &'static str {
        "finnhub"
    }
}

/// Parse a recommendation-trends body, keeping provider order (newest first)
pub(crate) fn parse_recommendations(body: &str) -> Result<RatingsSnapshot> {
    let value: serde_json::Value = serde_json::from_str(body)?;

    if let Some(message) = value.get("error").and_then(serde_json::Value::as_str) {
        return Err(StockError::FinnhubError(message.to_string()));
    }
    if !value.is_array() {
        return Err(StockError::FinnhubError(format!(
            "expected an array of recommendation records, got: {value}"
        )));
    }

    let records: Vec<RatingRecord> = serde_json::from_value(value)?;
    Ok(RatingsSnapshot::new(records))
}
