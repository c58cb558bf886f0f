//! Data fetched for a ticker
//!
//! All values are immutable once fetched; a refresh replaces them wholesale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Company metadata and live pricing for one ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockInfo {
    /// Symbol as reported by the provider
    pub symbol: String,
    /// Full company name; its presence is what makes a ticker valid
    pub long_name: String,
    pub short_name: Option<String>,
    /// Quote currency (e.g. "USD")
    pub currency: Option<String>,
    /// Live (regular market) price
    pub current_price: Option<f64>,
    /// Previous session's close
    pub previous_close: Option<f64>,
    pub exchange: Option<String>,
    pub instrument_type: Option<String>,
}

impl StockInfo {
    /// Currency code, or an empty string when the provider omitted it
    pub fn currency_code(&self) -> &str {
        self.currency.as_deref().unwrap_or("")
    }
}

/// One OHLC bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<u64>,
}

/// Chronologically ordered price history; empty means "no data"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Build a series, sorting bars chronologically
    pub fn new(mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|bar| bar.timestamp);
        Self { bars }
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn first(&self) -> Option<&PriceBar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Lowest low and highest high across the series
    pub fn price_range(&self) -> Option<(f64, f64)> {
        self.bars.iter().fold(None, |acc, bar| match acc {
            None => Some((bar.low, bar.high)),
            Some((lo, hi)) => Some((lo.min(bar.low), hi.max(bar.high))),
        })
    }
}

/// Analyst rating category, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RatingCategory {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
}

impl RatingCategory {
    pub const ALL: [RatingCategory; 5] = [
        RatingCategory::StrongBuy,
        RatingCategory::Buy,
        RatingCategory::Hold,
        RatingCategory::Sell,
        RatingCategory::StrongSell,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::StrongBuy => "Strong Buy",
            Self::Buy => "Buy",
            Self::Hold => "Hold",
            Self::Sell => "Sell",
            Self::StrongSell => "Strong Sell",
        }
    }
}

impl fmt::Display for RatingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rating counts for one reporting period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingRecord {
    /// Reporting period (e.g. "2024-06-01")
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub strong_buy: u32,
    #[serde(default)]
    pub buy: u32,
    #[serde(default)]
    pub hold: u32,
    #[serde(default)]
    pub sell: u32,
    #[serde(default)]
    pub strong_sell: u32,
}

impl RatingRecord {
    pub fn count(&self, category: RatingCategory) -> u32 {
        match category {
            RatingCategory::StrongBuy => self.strong_buy,
            RatingCategory::Buy => self.buy,
            RatingCategory::Hold => self.hold,
            RatingCategory::Sell => self.sell,
            RatingCategory::StrongSell => self.strong_sell,
        }
    }

    pub fn total(&self) -> u32 {
        RatingCategory::ALL.iter().map(|c| self.count(*c)).sum()
    }

    /// Counts with their share of the total, in display order
    pub fn breakdown(&self) -> Vec<RatingShare> {
        let total = self.total();
        RatingCategory::ALL
            .iter()
            .map(|&category| {
                let count = self.count(category);
                let share = if total == 0 {
                    0.0
                } else {
                    f64::from(count) / f64::from(total)
                };
                RatingShare {
                    category,
                    count,
                    share,
                }
            })
            .collect()
    }
}

/// One slice of a ratings breakdown
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingShare {
    pub category: RatingCategory,
    pub count: u32,
    /// Fraction of all ratings, 0.0..=1.0
    pub share: f64,
}

/// Periodic rating records, most recent first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatingsSnapshot {
    records: Vec<RatingRecord>,
}

impl RatingsSnapshot {
    pub fn new(records: Vec<RatingRecord>) -> Self {
        Self { records }
    }

    /// The record to display: the first one in provider order
    pub fn latest(&self) -> Option<&RatingRecord> {
        self.records.first()
    }

    pub fn records(&self) -> &[RatingRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// LLM-generated outlook summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisText(String);

impl AnalysisText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnalysisText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bar(day: u32, low: f64, high: f64, close: f64) -> PriceBar {
        PriceBar {
            timestamp: Utc.with_ymd_and_hms(2024, 6, day, 14, 30, 0).unwrap(),
            open: close,
            high,
            low,
            close,
            volume: None,
        }
    }

    #[test]
    fn test_series_sorted_chronologically() {
        let series = PriceSeries::new(vec![bar(3, 1.0, 2.0, 1.5), bar(1, 1.0, 2.0, 1.1)]);
        assert_eq!(series.first().unwrap().close, 1.1);
        assert_eq!(series.last().unwrap().close, 1.5);
    }

    #[test]
    fn test_price_range() {
        let series = PriceSeries::new(vec![bar(1, 9.0, 12.0, 10.0), bar(2, 8.5, 11.0, 9.0)]);
        assert_eq!(series.price_range(), Some((8.5, 12.0)));
        assert_eq!(PriceSeries::default().price_range(), None);
    }

    #[test]
    fn test_rating_record_from_finnhub_json() {
        let json = serde_json::json!([
            {"buy": 10, "hold": 3, "period": "2024-06-01", "sell": 1,
             "strongBuy": 5, "strongSell": 0, "symbol": "AAPL"},
            {"buy": 9, "hold": 4, "period": "2024-05-01", "sell": 1,
             "strongBuy": 5, "strongSell": 0, "symbol": "AAPL"}
        ]);
        let snapshot: RatingsSnapshot = serde_json::from_value(json).unwrap();
        let latest = snapshot.latest().unwrap();
        assert_eq!(latest.period, "2024-06-01");
        assert_eq!(latest.strong_buy, 5);
        assert_eq!(latest.buy, 10);
        assert_eq!(latest.total(), 19);
    }

    #[test]
    fn test_breakdown_order_and_shares() {
        let record = RatingRecord {
            period: String::new(),
            strong_buy: 5,
            buy: 10,
            hold: 3,
            sell: 1,
            strong_sell: 1,
        };
        let breakdown = record.breakdown();
        let labels: Vec<_> = breakdown.iter().map(|s| s.category.label()).collect();
        assert_eq!(labels, ["Strong Buy", "Buy", "Hold", "Sell", "Strong Sell"]);
        assert!((breakdown[1].share - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_breakdown_all_zero() {
        let record = RatingRecord {
            period: String::new(),
            strong_buy: 0,
            buy: 0,
            hold: 0,
            sell: 0,
            strong_sell: 0,
        };
        assert!(record.breakdown().iter().all(|s| s.share == 0.0));
    }
}
