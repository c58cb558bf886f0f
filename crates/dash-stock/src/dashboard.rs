//! Explicit dashboard state and the transitions between states
//!
//! A [`DashboardState`] is an immutable snapshot. Input events go through
//! [`Dashboard::apply`], which fetches whatever the event invalidates and
//! returns the next snapshot; renderers only ever read snapshots.

use crate::error::FetchFailure;
use crate::metrics::PriceChange;
use crate::model::{AnalysisText, PriceSeries, RatingsSnapshot, StockInfo};
use crate::period::Period;
use crate::service::StockDataService;
use crate::ticker::TickerSymbol;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Everything fetched for a valid ticker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerView {
    pub info: StockInfo,
    /// Price history for the selected period; empty means no data
    pub history: PriceSeries,
    /// `None` when current or reference price is missing
    pub change: Option<PriceChange>,
    pub ratings: Option<RatingsSnapshot>,
    pub analysis: Option<AnalysisText>,
}

/// Result of the last ticker lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Lookup {
    /// No ticker entered yet
    Idle,
    Found(Box<TickerView>),
    /// The provider has no company for this ticker
    NotFound(TickerSymbol),
    /// The market-data provider failed; entering the ticker again retries
    Unavailable(TickerSymbol),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Warning,
    Error,
}

/// Transient user-facing message produced by the last event
///
/// Errors stop the lookup; warnings leave a partial view on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Immutable dashboard snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardState {
    /// Last ticker the user entered
    pub ticker: Option<TickerSymbol>,
    pub period: Period,
    /// Include pre-market and after-hours bars
    pub include_extended_hours: bool,
    pub lookup: Lookup,
    /// Messages raised by the event that produced this snapshot
    pub notices: Vec<Notice>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            ticker: None,
            period: Period::default(),
            include_extended_hours: true,
            lookup: Lookup::Idle,
            notices: Vec::new(),
        }
    }
}

impl DashboardState {
    /// The fetched data, if the last lookup found the ticker
    pub fn view(&self) -> Option<&TickerView> {
        match &self.lookup {
            Lookup::Found(view) => Some(view),
            _ => None,
        }
    }

    fn without_notices(&self) -> Self {
        Self {
            notices: Vec::new(),
            ..self.clone()
        }
    }
}

/// User input that can change the dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    /// Raw text typed into the ticker field
    TickerEntered(String),
    PeriodSelected(Period),
    ExtendedHoursToggled(bool),
}

/// Drives state transitions against the fetch-and-cache layer
pub struct Dashboard {
    service: Arc<StockDataService>,
}

impl Dashboard {
    pub fn new(service: Arc<StockDataService>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &StockDataService {
        &self.service
    }

    /// Starting snapshot, using the configured extended-hours default
    pub fn initial_state(&self) -> DashboardState {
        DashboardState {
            include_extended_hours: self.service.config().include_extended_hours,
            ..DashboardState::default()
        }
    }

    /// Apply one event and return the next snapshot
    ///
    /// Notices never outlive the event that raised them.
    pub async fn apply(&self, state: &DashboardState, event: DashboardEvent) -> DashboardState {
        let mut next = state.without_notices();

        match event {
            DashboardEvent::TickerEntered(raw) => {
                if raw.trim().is_empty() {
                    return next;
                }
                let ticker = match TickerSymbol::parse(&raw) {
                    Ok(ticker) => ticker,
                    Err(e) => {
                        next.notices.push(Notice::error(e.to_string()));
                        return next;
                    }
                };
                let retry = matches!(state.lookup, Lookup::Unavailable(_));
                if state.ticker.as_ref() == Some(&ticker) && !retry {
                    debug!(ticker = %ticker, "Ticker unchanged");
                    return next;
                }
                next.ticker = Some(ticker.clone());
                let lookup = self.load_ticker(&ticker, &mut next).await;
                next.lookup = lookup;
            }
            DashboardEvent::PeriodSelected(period) => {
                if period == state.period {
                    return next;
                }
                next.period = period;
                self.refresh_history(&mut next).await;
            }
            DashboardEvent::ExtendedHoursToggled(include) => {
                if include == state.include_extended_hours {
                    return next;
                }
                next.include_extended_hours = include;
                self.refresh_history(&mut next).await;
            }
        }

        next
    }

    /// Select `period` and then look up `raw` as one step
    ///
    /// The returned snapshot carries the notices of both events.
    pub async fn open(&self, state: &DashboardState, raw: String, period: Period) -> DashboardState {
        let selected = self
            .apply(state, DashboardEvent::PeriodSelected(period))
            .await;
        let mut next = self
            .apply(&selected, DashboardEvent::TickerEntered(raw))
            .await;

        let mut notices = selected.notices;
        notices.append(&mut next.notices);
        next.notices = notices;
        next
    }

    /// Fetch everything for a newly entered ticker
    ///
    /// Ratings and analysis are only requested once the ticker is known to
    /// exist.
    async fn load_ticker(&self, ticker: &TickerSymbol, state: &mut DashboardState) -> Lookup {
        let info = match self.service.fetch_stock_data(ticker).await {
            Ok(info) => info,
            Err(FetchFailure::NotFound(ticker)) => return Lookup::NotFound(ticker),
            Err(failure) => {
                state.notices.push(Notice::error(failure.to_string()));
                return Lookup::Unavailable(ticker.clone());
            }
        };
        info!(ticker = %ticker, name = %info.long_name, "Loaded ticker");

        let history = self
            .history(ticker, state.period, state.include_extended_hours, &mut state.notices)
            .await;
        let change = PriceChange::compute(&info, &history, state.period);

        let analysis = self
            .service
            .generate_default_analysis(ticker)
            .await
            .map_err(|failure| state.notices.push(Notice::warning(failure.to_string())))
            .ok();

        let ratings = self
            .service
            .fetch_analyst_ratings(ticker)
            .await
            .map_err(|failure| state.notices.push(Notice::warning(failure.to_string())))
            .ok();

        Lookup::Found(Box::new(TickerView {
            info,
            history,
            change,
            ratings,
            analysis,
        }))
    }

    /// Re-fetch only the price series after a period or hours change
    async fn refresh_history(&self, state: &mut DashboardState) {
        let Some(ticker) = state.ticker.clone() else {
            return;
        };
        let Lookup::Found(view) = &state.lookup else {
            return;
        };
        let mut view = view.clone();

        view.history = self
            .history(&ticker, state.period, state.include_extended_hours, &mut state.notices)
            .await;
        view.change = PriceChange::compute(&view.info, &view.history, state.period);
        state.lookup = Lookup::Found(view);
    }

    async fn history(
        &self,
        ticker: &TickerSymbol,
        period: Period,
        include_extended_hours: bool,
        notices: &mut Vec<Notice>,
    ) -> PriceSeries {
        self.service
            .fetch_price_history(ticker, period, include_extended_hours)
            .await
            .unwrap_or_else(|failure| {
                notices.push(Notice::warning(failure.to_string()));
                PriceSeries::default()
            })
    }
}
