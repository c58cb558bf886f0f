//! Configuration for the dashboard data layer

use crate::api::finnhub::FINNHUB_API_KEY_ENV;
use crate::cache::DEFAULT_CACHE_CAPACITY;
use crate::error::{Result, StockError};
use crate::prompt::{AnalysisPrompt, DEFAULT_ANALYSIS_TEMPLATE};
use dash_llm::providers::anthropic::ANTHROPIC_API_KEY_ENV;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default LLM model used for the outlook summary
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20240620";

/// Configuration for the dashboard data layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// LLM model identifier
    pub model: String,

    /// Analysis prompt template (minijinja syntax, variable `ticker`)
    pub prompt_template: String,

    /// TTL for stock info, ratings, and analysis
    pub cache_ttl: Duration,

    /// TTL for price history
    pub history_cache_ttl: Duration,

    /// Maximum entries held by each cache
    pub cache_capacity: usize,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// Finnhub requests per minute
    pub finnhub_rate_limit: u32,

    /// Whether price history includes pre-market and after-hours data by default
    pub include_extended_hours: bool,

    /// Finnhub API key
    #[serde(skip_serializing)]
    pub finnhub_api_key: Option<String>,

    /// Anthropic API key
    #[serde(skip_serializing)]
    pub anthropic_api_key: Option<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            prompt_template: DEFAULT_ANALYSIS_TEMPLATE.to_string(),
            cache_ttl: Duration::from_secs(3600),         // 1 hour
            history_cache_ttl: Duration::from_secs(3600), // 1 hour
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            request_timeout: Duration::from_secs(30),
            finnhub_rate_limit: 60,
            include_extended_hours: true,
            finnhub_api_key: None,
            anthropic_api_key: None,
        }
    }
}

fn env_key(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl DashboardConfig {
    /// Create a new configuration builder
    pub fn builder() -> DashboardConfigBuilder {
        DashboardConfigBuilder::default()
    }

    /// Validate the configuration
    ///
    /// Missing credentials are not an error here: they surface as a
    /// configuration fault on the first call to the provider that needs them.
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(StockError::ConfigError("model must not be empty".to_string()));
        }

        if self.cache_ttl.is_zero() || self.history_cache_ttl.is_zero() {
            return Err(StockError::ConfigError(
                "cache TTLs must be greater than 0".to_string(),
            ));
        }

        if self.cache_capacity == 0 {
            return Err(StockError::ConfigError(
                "cache_capacity must be greater than 0".to_string(),
            ));
        }

        if self.finnhub_rate_limit == 0 {
            return Err(StockError::ConfigError(
                "finnhub_rate_limit must be greater than 0".to_string(),
            ));
        }

        AnalysisPrompt::new(&self.prompt_template)?;

        Ok(())
    }
}

/// Builder for DashboardConfig
#[derive(Debug, Default)]
pub struct DashboardConfigBuilder {
    model: Option<String>,
    prompt_template: Option<String>,
    cache_ttl: Option<Duration>,
    history_cache_ttl: Option<Duration>,
    cache_capacity: Option<usize>,
    request_timeout: Option<Duration>,
    finnhub_rate_limit: Option<u32>,
    include_extended_hours: Option<bool>,
    finnhub_api_key: Option<String>,
    anthropic_api_key: Option<String>,
}

impl DashboardConfigBuilder {
    /// Set the LLM model identifier
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the analysis prompt template
    pub fn prompt_template(mut self, template: impl Into<String>) -> Self {
        self.prompt_template = Some(template.into());
        self
    }

    /// Set TTL for stock info, ratings, and analysis
    pub fn cache_ttl(mut self, duration: Duration) -> Self {
        self.cache_ttl = Some(duration);
        self
    }

    /// Set TTL for price history
    pub fn history_cache_ttl(mut self, duration: Duration) -> Self {
        self.history_cache_ttl = Some(duration);
        self
    }

    /// Set the maximum number of entries per cache
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set Finnhub requests per minute
    pub fn finnhub_rate_limit(mut self, per_minute: u32) -> Self {
        self.finnhub_rate_limit = Some(per_minute);
        self
    }

    /// Set the default extended-hours flag
    pub fn include_extended_hours(mut self, include: bool) -> Self {
        self.include_extended_hours = Some(include);
        self
    }

    /// Set Finnhub API key
    pub fn finnhub_api_key(mut self, key: impl Into<String>) -> Self {
        self.finnhub_api_key = Some(key.into());
        self
    }

    /// Set Anthropic API key
    pub fn anthropic_api_key(mut self, key: impl Into<String>) -> Self {
        self.anthropic_api_key = Some(key.into());
        self
    }

    /// Load provider keys from environment, without overriding explicit keys
    pub fn with_env_keys(mut self) -> Self {
        if self.finnhub_api_key.is_none() {
            self.finnhub_api_key = env_key(FINNHUB_API_KEY_ENV);
        }
        if self.anthropic_api_key.is_none() {
            self.anthropic_api_key = env_key(ANTHROPIC_API_KEY_ENV);
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<DashboardConfig> {
        let defaults = DashboardConfig::default();

        let config = DashboardConfig {
            model: self.model.unwrap_or(defaults.model),
            prompt_template: self.prompt_template.unwrap_or(defaults.prompt_template),
            cache_ttl: self.cache_ttl.unwrap_or(defaults.cache_ttl),
            history_cache_ttl: self.history_cache_ttl.unwrap_or(defaults.history_cache_ttl),
            cache_capacity: self.cache_capacity.unwrap_or(defaults.cache_capacity),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            finnhub_rate_limit: self.finnhub_rate_limit.unwrap_or(defaults.finnhub_rate_limit),
            include_extended_hours: self
                .include_extended_hours
                .unwrap_or(defaults.include_extended_hours),
            finnhub_api_key: self.finnhub_api_key,
            anthropic_api_key: self.anthropic_api_key,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.cache_ttl, Duration::from_secs(3600));
        assert!(config.include_extended_hours);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = DashboardConfig::builder()
            .model("claude-3-haiku-20240307")
            .cache_ttl(Duration::from_secs(60))
            .include_extended_hours(false)
            .finnhub_api_key("fh")
            .build()
            .unwrap();

        assert_eq!(config.model, "claude-3-haiku-20240307");
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.history_cache_ttl, Duration::from_secs(3600));
        assert!(!config.include_extended_hours);
        assert_eq!(config.finnhub_api_key.as_deref(), Some("fh"));
    }

    #[test]
    fn test_validation_rejects_zero_ttl() {
        let result = DashboardConfig::builder().cache_ttl(Duration::ZERO).build();
        assert!(matches!(result, Err(StockError::ConfigError(_))));
    }

    #[test]
    fn test_validation_rejects_zero_capacity() {
        let result = DashboardConfig::builder().cache_capacity(0).build();
        assert!(matches!(result, Err(StockError::ConfigError(_))));
    }

    #[test]
    fn test_validation_rejects_empty_model() {
        let result = DashboardConfig::builder().model("  ").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_rejects_broken_template() {
        let result = DashboardConfig::builder()
            .prompt_template("Analyze {{ ticker")
            .build();
        assert!(matches!(result, Err(StockError::PromptError(_))));
    }

    #[test]
    fn test_keys_not_serialized() {
        let config = DashboardConfig::builder()
            .anthropic_api_key("secret")
            .build()
            .unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }
}
