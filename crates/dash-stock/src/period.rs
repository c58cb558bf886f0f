//! Selectable chart periods

use crate::error::StockError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named chart period mapping to a (range, interval) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Period {
    /// One trading day at 5-minute resolution
    #[default]
    #[serde(rename = "1D")]
    OneDay,
    /// Seven days at hourly resolution
    #[serde(rename = "1W")]
    OneWeek,
    /// Three months of daily bars
    #[serde(rename = "3M")]
    ThreeMonths,
    /// One year of daily bars
    #[serde(rename = "1Y")]
    OneYear,
    /// Full history at weekly resolution
    #[serde(rename = "MAX")]
    Max,
}

impl Period {
    /// All periods in display order
    pub const ALL: [Period; 5] = [
        Period::OneDay,
        Period::OneWeek,
        Period::ThreeMonths,
        Period::OneYear,
        Period::Max,
    ];

    /// Short display name ("1D", "1W", ...)
    pub fn name(self) -> &'static str {
        match self {
            Self::OneDay => "1D",
            Self::OneWeek => "1W",
            Self::ThreeMonths => "3M",
            Self::OneYear => "1Y",
            Self::Max => "MAX",
        }
    }

    /// Provider range parameter
    pub fn range(self) -> &'static str {
        match self {
            Self::OneDay => "1d",
            Self::OneWeek => "7d",
            Self::ThreeMonths => "3mo",
            Self::OneYear => "1y",
            Self::Max => "max",
        }
    }

    /// Provider sampling interval parameter
    pub fn interval(self) -> &'static str {
        match self {
            Self::OneDay => "5m",
            Self::OneWeek => "1h",
            Self::ThreeMonths | Self::OneYear => "1d",
            Self::Max => "1wk",
        }
    }

    /// Phrase shown next to the price change
    pub fn caption(self) -> &'static str {
        match self {
            Self::OneDay => "Today",
            Self::OneWeek => "in the last week",
            Self::ThreeMonths => "in the last 3 months",
            Self::OneYear => "in the last year",
            Self::Max => "since listing",
        }
    }

    /// Whether this is the intraday period, whose reference is the previous close
    pub fn is_intraday(self) -> bool {
        self == Self::OneDay
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Period {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                StockError::ConfigError(format!(
                    "Unknown period '{wanted}', expected one of 1D, 1W, 3M, 1Y, MAX"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_table() {
        let table: Vec<_> = Period::ALL
            .iter()
            .map(|p| (p.name(), p.range(), p.interval()))
            .collect();
        assert_eq!(
            table,
            vec![
                ("1D", "1d", "5m"),
                ("1W", "7d", "1h"),
                ("3M", "3mo", "1d"),
                ("1Y", "1y", "1d"),
                ("MAX", "max", "1wk"),
            ]
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!("1d".parse::<Period>().unwrap(), Period::OneDay);
        assert_eq!(" max ".parse::<Period>().unwrap(), Period::Max);
        assert!("5Y".parse::<Period>().is_err());
    }

    #[test]
    fn test_default_is_intraday() {
        assert_eq!(Period::default(), Period::OneDay);
        assert!(Period::default().is_intraday());
        assert!(!Period::OneYear.is_intraday());
    }

    #[test]
    fn test_serde_uses_names() {
        assert_eq!(serde_json::to_string(&Period::ThreeMonths).unwrap(), "\"3M\"");
        let p: Period = serde_json::from_str("\"1W\"").unwrap();
        assert_eq!(p, Period::OneWeek);
    }
}
