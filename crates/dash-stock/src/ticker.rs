//! Normalized ticker symbols

use crate::error::{Result, StockError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An exchange symbol, trimmed and uppercased
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TickerSymbol(String);

impl TickerSymbol {
    /// Normalize raw user input into a ticker symbol
    ///
    /// Surrounding whitespace is removed and letters are uppercased.
    /// Empty input, or input containing inner whitespace, is rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return Err(StockError::InvalidSymbol(raw.to_string()));
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    /// The symbol as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TickerSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TickerSymbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for TickerSymbol {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TickerSymbol {
    type Error = StockError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<TickerSymbol> for String {
    fn from(value: TickerSymbol) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization() {
        let ticker = TickerSymbol::parse("  aapl ").unwrap();
        assert_eq!(ticker.as_str(), "AAPL");
        assert_eq!(ticker.to_string(), "AAPL");
    }

    #[test]
    fn test_keeps_punctuation() {
        assert_eq!(TickerSymbol::parse("brk-b").unwrap().as_str(), "BRK-B");
        assert_eq!(TickerSymbol::parse("^gspc").unwrap().as_str(), "^GSPC");
    }

    #[test]
    fn test_rejects_empty_and_inner_whitespace() {
        assert!(TickerSymbol::parse("").is_err());
        assert!(TickerSymbol::parse("   ").is_err());
        assert!(TickerSymbol::parse("AA PL").is_err());
    }

    #[test]
    fn test_serde_normalizes() {
        let ticker: TickerSymbol = serde_json::from_str("\"msft\"").unwrap();
        assert_eq!(ticker.as_str(), "MSFT");
        assert_eq!(serde_json::to_string(&ticker).unwrap(), "\"MSFT\"");
    }
}
