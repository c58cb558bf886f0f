//! Fetch-and-cache layer for the stock dashboard
//!
//! This crate sits between a presentation layer and three external
//! providers:
//!
//! - Market data (Yahoo Finance via `yahoo_finance_api`): company metadata and price history
//! - Analyst ratings (Finnhub recommendation trends)
//! - Outlook summaries from an LLM (Anthropic Messages API)
//!
//! Every provider call is memoised by its arguments with a fixed TTL.
//! Failures come back as a tagged [`FetchFailure`] so callers can tell an
//! unknown ticker from a provider fault; faults are never cached.
//!
//! On top of the fetch layer, [`metrics`] derives the price change for the
//! selected [`Period`] and [`dashboard`] keeps the dashboard as an explicit,
//! immutable [`DashboardState`] advanced by input events.
//!
//! # Example
//!
//! ```rust,ignore
//! use dash_stock::{Dashboard, DashboardConfig, DashboardEvent, StockDataService};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = DashboardConfig::builder().with_env_keys().build()?;
//!     let service = Arc::new(StockDataService::new(Arc::new(config)));
//!     let dashboard = Dashboard::new(service);
//!
//!     let state = dashboard
//!         .apply(&dashboard.initial_state(), DashboardEvent::TickerEntered("AAPL".into()))
//!         .await;
//!     if let Some(view) = state.view() {
//!         println!("{}: {:?}", view.info.long_name, view.change);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod metrics;
pub mod model;
pub mod period;
pub mod prompt;
pub mod providers;
pub mod service;
pub mod ticker;

#[cfg(test)]
mod test_support;

// Re-export main types for convenience
pub use api::{FinnhubClient, MarketDataProvider, RatingsProvider, YahooFinanceClient};
pub use config::DashboardConfig;
pub use dashboard::{
    Dashboard, DashboardEvent, DashboardState, Lookup, Notice, NoticeLevel, TickerView,
};
pub use error::{FaultKind, FetchFailure, FetchResult, Result, StockError};
pub use metrics::{Direction, PriceChange};
pub use model::{
    AnalysisText, PriceBar, PriceSeries, RatingCategory, RatingRecord, RatingShare,
    RatingsSnapshot, StockInfo,
};
pub use period::Period;
pub use prompt::AnalysisPrompt;
pub use providers::ProviderHandles;
pub use service::StockDataService;
pub use ticker::TickerSymbol;
