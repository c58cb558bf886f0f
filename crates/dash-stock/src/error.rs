//! Error types for market-data, ratings, and analysis operations

use crate::ticker::TickerSymbol;
use dash_llm::LLMError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised while talking to a provider or preparing a request
#[derive(Debug, Error)]
pub enum StockError {
    /// API request failed
    #[error("API error: {0}")]
    ApiError(String),

    /// Invalid stock symbol provided
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Provider rejected the credentials
    #[error("Authentication failed for {provider}")]
    AuthenticationFailed {
        provider: String,
    },

    /// Rate limit exceeded for API
    #[error("Rate limit exceeded for {provider}")]
    RateLimitExceeded {
        provider: String,
    },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Yahoo Finance returned something we could not use
    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    /// Finnhub returned something we could not use
    #[error("Finnhub error: {0}")]
    FinnhubError(String),

    /// LLM provider error
    #[error("LLM error: {0}")]
    LlmError(#[from] LLMError),

    /// Prompt template could not be compiled or rendered
    #[error("Prompt error: {0}")]
    PromptError(#[from] minijinja::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias for stock operations
pub type Result<T> = std::result::Result<T, StockError>;

/// Coarse classification of a provider fault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    /// Connection, DNS, TLS, or timeout failure
    Network,
    /// Missing or rejected credentials
    Authentication,
    /// Rate limit or quota exhausted
    RateLimit,
    /// Response arrived but could not be interpreted
    MalformedResponse,
    /// Local configuration (template, model id, missing key)
    Configuration,
    /// Anything else the provider reported
    Other,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Network => "network",
            Self::Authentication => "authentication",
            Self::RateLimit => "rate limit",
            Self::MalformedResponse => "malformed response",
            Self::Configuration => "configuration",
            Self::Other => "provider error",
        };
        f.write_str(label)
    }
}

impl StockError {
    /// Classify this error for callers that need to tell faults apart
    pub fn fault_kind(&self) -> FaultKind {
        match self {
            Self::NetworkError(e) if e.is_decode() => FaultKind::MalformedResponse,
            Self::NetworkError(_) => FaultKind::Network,
            Self::AuthenticationFailed { .. } => FaultKind::Authentication,
            Self::RateLimitExceeded { .. } => FaultKind::RateLimit,
            Self::JsonError(_) | Self::YahooFinanceError(_) | Self::FinnhubError(_) => {
                FaultKind::MalformedResponse
            }
            Self::ConfigError(_) | Self::PromptError(_) | Self::InvalidSymbol(_) => {
                FaultKind::Configuration
            }
            Self::LlmError(e) => match e {
                LLMError::HttpError(inner) if inner.is_decode() => FaultKind::MalformedResponse,
                LLMError::HttpError(_) | LLMError::Overloaded(_) => FaultKind::Network,
                LLMError::AuthenticationFailed => FaultKind::Authentication,
                LLMError::RateLimitExceeded(_) | LLMError::QuotaExhausted(_) => {
                    FaultKind::RateLimit
                }
                LLMError::UnexpectedResponse(_) | LLMError::SerializationError(_) => {
                    FaultKind::MalformedResponse
                }
                LLMError::ConfigurationError(_) | LLMError::ModelNotFound(_) => {
                    FaultKind::Configuration
                }
                LLMError::InvalidRequest(_) | LLMError::RequestFailed(_) => FaultKind::Other,
            },
            Self::ApiError(_) => FaultKind::Other,
        }
    }
}

/// Why a fetch produced no value
///
/// `NotFound` is a definitive answer from the provider; `ProviderFault` is a
/// transient failure that is never cached.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    /// The ticker has no resolvable company metadata
    #[error("No results found for the ticker symbol: {0}")]
    NotFound(TickerSymbol),

    /// A provider call failed
    #[error("{provider} {kind} error: {message}")]
    ProviderFault {
        /// Provider name ("yahoo", "finnhub", "anthropic")
        provider: String,
        /// Fault classification
        kind: FaultKind,
        /// Human-readable detail
        message: String,
    },
}

impl FetchFailure {
    /// Build a provider fault from an error raised while calling `provider`
    pub fn provider(provider: impl Into<String>, error: &StockError) -> Self {
        Self::ProviderFault {
            provider: provider.into(),
            kind: error.fault_kind(),
            message: error.to_string(),
        }
    }

    /// Whether this is the not-found case
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Fault classification, if this is a provider fault
    pub fn fault_kind(&self) -> Option<FaultKind> {
        match self {
            Self::NotFound(_) => None,
            Self::ProviderFault { kind, .. } => Some(*kind),
        }
    }
}

/// Outcome of a single cached fetch operation
pub type FetchResult<T> = std::result::Result<T, FetchFailure>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StockError::InvalidSymbol("  ".to_string());
        assert_eq!(err.to_string(), "Invalid symbol:   ");

        let err = StockError::RateLimitExceeded {
            provider: "Finnhub".to_string(),
        };
        assert_eq!(err.to_string(), "Rate limit exceeded for Finnhub");
    }

    #[test]
    fn test_fault_classification() {
        assert_eq!(
            StockError::AuthenticationFailed {
                provider: "finnhub".into()
            }
            .fault_kind(),
            FaultKind::Authentication
        );
        assert_eq!(
            StockError::YahooFinanceError("bad payload".into()).fault_kind(),
            FaultKind::MalformedResponse
        );
        assert_eq!(
            StockError::LlmError(LLMError::QuotaExhausted("credit".into())).fault_kind(),
            FaultKind::RateLimit
        );
        assert_eq!(
            StockError::LlmError(LLMError::AuthenticationFailed).fault_kind(),
            FaultKind::Authentication
        );
        assert_eq!(
            StockError::ConfigError("missing key".into()).fault_kind(),
            FaultKind::Configuration
        );
    }

    #[test]
    fn test_fetch_failure_from_error() {
        let err = StockError::RateLimitExceeded {
            provider: "Finnhub".into(),
        };
        let failure = FetchFailure::provider("finnhub", &err);
        assert_eq!(failure.fault_kind(), Some(FaultKind::RateLimit));
        assert!(!failure.is_not_found());
        assert_eq!(
            failure.to_string(),
            "finnhub rate limit error: Rate limit exceeded for Finnhub"
        );
    }

    #[test]
    fn test_not_found_display() {
        let ticker = TickerSymbol::parse("zzzzinvalid").unwrap();
        let failure = FetchFailure::NotFound(ticker);
        assert!(failure.is_not_found());
        assert_eq!(failure.fault_kind(), None);
        assert_eq!(
            failure.to_string(),
            "No results found for the ticker symbol: ZZZZINVALID"
        );
    }
}
