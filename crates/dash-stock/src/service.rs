//! Cached fetch operations over the market-data, ratings, and LLM providers
//!
//! Every operation returns a value or a tagged [`FetchFailure`]. Provider
//! faults are logged and handed back to the caller but never cached, so the
//! next call goes to the provider again. A ticker the market-data provider
//! does not know is a definitive answer and is cached like any other.

use crate::api::{MarketDataProvider, RatingsProvider};
use crate::cache::{CacheKey, CacheManager};
use crate::config::DashboardConfig;
use crate::error::{FetchFailure, FetchResult, StockError};
use crate::model::{AnalysisText, PriceSeries, RatingsSnapshot, StockInfo};
use crate::period::Period;
use crate::prompt::AnalysisPrompt;
use crate::providers::ProviderHandles;
use crate::ticker::TickerSymbol;
use dash_llm::{CompletionRequest, LLMError, LLMProvider, Message, StopReason};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Generation cap for the outlook summary
pub const ANALYSIS_MAX_TOKENS: usize = 1024;

/// Fetch-and-cache layer shared by every dashboard interaction
pub struct StockDataService {
    config: Arc<DashboardConfig>,
    providers: ProviderHandles,
    cache: CacheManager,
}

fn fault(provider: &str, error: &StockError) -> FetchFailure {
    warn!(provider, kind = %error.fault_kind(), error = %error, "Provider call failed");
    FetchFailure::provider(provider, error)
}

impl StockDataService {
    /// Build a service whose provider clients are created on first use
    pub fn new(config: Arc<DashboardConfig>) -> Self {
        let providers = ProviderHandles::from_config(&config);
        Self::with_providers(config, providers)
    }

    /// Build a service over explicit provider handles
    pub fn with_providers(config: Arc<DashboardConfig>, providers: ProviderHandles) -> Self {
        let cache = CacheManager::new(
            config.cache_capacity,
            config.cache_ttl,
            config.history_cache_ttl,
        );
        Self {
            config,
            providers,
            cache,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Company metadata and live pricing
    ///
    /// Returns [`FetchFailure::NotFound`] when the provider has no company
    /// name for the ticker.
    #[instrument(skip(self), fields(ticker = %ticker))]
    pub async fn fetch_stock_data(&self, ticker: &TickerSymbol) -> FetchResult<StockInfo> {
        let key = CacheKey::new(ticker.as_str(), "stock_info", ());

        let info = self
            .cache
            .info
            .get_or_fetch(key, || async {
                let provider = self.market().await?;
                provider
                    .stock_info(ticker)
                    .await
                    .map_err(|e| fault(provider.name(), &e))
            })
            .await?;

        info.ok_or_else(|| {
            info!("No company name for ticker");
            FetchFailure::NotFound(ticker.clone())
        })
    }

    /// Price history for a period; an empty series is a valid result
    #[instrument(skip(self), fields(ticker = %ticker, period = %period))]
    pub async fn fetch_price_history(
        &self,
        ticker: &TickerSymbol,
        period: Period,
        include_extended_hours: bool,
    ) -> FetchResult<PriceSeries> {
        let key = CacheKey::new(
            ticker.as_str(),
            "price_history",
            (period.name(), include_extended_hours),
        );

        self.cache
            .history
            .get_or_fetch(key, || async {
                let provider = self.market().await?;
                let series = provider
                    .price_history(ticker, period, include_extended_hours)
                    .await
                    .map_err(|e| fault(provider.name(), &e))?;
                if series.is_empty() {
                    debug!("Provider returned no bars");
                }
                Ok::<_, FetchFailure>(series)
            })
            .await
    }

    /// Analyst recommendation trends, most recent first
    #[instrument(skip(self), fields(ticker = %ticker))]
    pub async fn fetch_analyst_ratings(&self, ticker: &TickerSymbol) -> FetchResult<RatingsSnapshot> {
        let key = CacheKey::new(ticker.as_str(), "recommendation_trends", ());

        self.cache
            .ratings
            .get_or_fetch(key, || async {
                let provider = self.ratings().await?;
                provider
                    .recommendation_trends(ticker)
                    .await
                    .map_err(|e| fault(provider.name(), &e))
            })
            .await
    }

    /// Outlook summary from the LLM provider
    ///
    /// Renders `prompt_template` for the ticker, sends it as a single user
    /// message capped at [`ANALYSIS_MAX_TOKENS`], and keeps the first text
    /// block of the reply. Cached per (ticker, model, template).
    #[instrument(skip(self, prompt_template), fields(ticker = %ticker))]
    pub async fn generate_analysis(
        &self,
        ticker: &TickerSymbol,
        model: &str,
        prompt_template: &str,
    ) -> FetchResult<AnalysisText> {
        let key = CacheKey::new(ticker.as_str(), "analysis", (model, prompt_template));

        self.cache
            .analysis
            .get_or_fetch(key, || async {
                let prompt = AnalysisPrompt::new(prompt_template)
                    .and_then(|prompt| prompt.render(ticker))
                    .map_err(|e| fault(self.providers.llm.name(), &e))?;

                let llm = self.llm().await?;
                let request = CompletionRequest::builder(model)
                    .add_message(Message::user(prompt))
                    .max_tokens(ANALYSIS_MAX_TOKENS)
                    .build();

                let response = llm
                    .complete(request)
                    .await
                    .map_err(|e| fault(llm.name(), &StockError::from(e)))?;

                let text = response
                    .text()
                    .map(str::trim)
                    .filter(|text| !text.is_empty())
                    .ok_or_else(|| {
                        let error = StockError::LlmError(LLMError::UnexpectedResponse(
                            "reply has no text block".to_string(),
                        ));
                        fault(llm.name(), &error)
                    })?;

                if response.stop_reason == StopReason::MaxTokens {
                    warn!(ticker = %ticker, max_tokens = ANALYSIS_MAX_TOKENS, "Analysis cut off at the token cap");
                }
                debug!(
                    output_tokens = response.usage.output_tokens,
                    stop_reason = ?response.stop_reason,
                    "Analysis generated"
                );
                Ok::<_, FetchFailure>(AnalysisText::new(text))
            })
            .await
    }

    /// [`generate_analysis`](Self::generate_analysis) with the configured model and template
    pub async fn generate_default_analysis(&self, ticker: &TickerSymbol) -> FetchResult<AnalysisText> {
        self.generate_analysis(ticker, &self.config.model, &self.config.prompt_template)
            .await
    }

    /// Drop every cached value
    pub async fn clear_cache(&self) {
        self.cache.clear_all().await;
        info!("Cleared dashboard caches");
    }

    async fn market(&self) -> FetchResult<Arc<dyn MarketDataProvider>> {
        let handle = &self.providers.market;
        handle.get().await.map_err(|e| fault(handle.name(), &e))
    }

    async fn ratings(&self) -> FetchResult<Arc<dyn RatingsProvider>> {
        let handle = &self.providers.ratings;
        handle.get().await.map_err(|e| fault(handle.name(), &e))
    }

    async fn llm(&self) -> FetchResult<Arc<dyn LLMProvider>> {
        let handle = &self.providers.llm;
        handle.get().await.map_err(|e| fault(handle.name(), &e))
    }
}
