//! Price change relative to a period's reference price

use crate::model::{PriceSeries, StockInfo};
use crate::period::Period;
use serde::{Deserialize, Serialize};

/// Direction of a price move; unchanged counts as up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Arrow glyph for display
    pub fn arrow(self) -> &'static str {
        match self {
            Self::Up => "▲",
            Self::Down => "▼",
        }
    }
}

/// Price change figures for the selected period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceChange {
    pub current_price: f64,
    pub reference_price: f64,
    /// `current_price - reference_price`
    pub change: f64,
    /// Change as a percentage of the reference price
    pub percent_change: f64,
    pub direction: Direction,
}

/// Reference price for a period
///
/// Intraday compares against the previous close; every other period compares
/// against the first close of the fetched series.
pub fn reference_price(info: &StockInfo, series: &PriceSeries, period: Period) -> Option<f64> {
    if period.is_intraday() {
        info.previous_close
    } else {
        series.first().map(|bar| bar.close)
    }
}

impl PriceChange {
    /// Compute the change, or `None` when either price is missing
    ///
    /// A zero or non-finite price counts as missing.
    pub fn compute(info: &StockInfo, series: &PriceSeries, period: Period) -> Option<Self> {
        let usable = |price: f64| price.is_finite() && price != 0.0;

        let current_price = info.current_price.filter(|p| usable(*p))?;
        let reference_price = reference_price(info, series, period).filter(|p| usable(*p))?;

        let change = current_price - reference_price;
        let percent_change = change / reference_price * 100.0;
        let direction = if change >= 0.0 {
            Direction::Up
        } else {
            Direction::Down
        };

        Some(Self {
            current_price,
            reference_price,
            change,
            percent_change,
            direction,
        })
    }
}
