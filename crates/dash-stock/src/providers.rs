//! Long-lived provider handles
//!
//! Each handle builds its client on first use and reuses it for the rest of
//! the process. A failed construction (say, a missing API key) is not
//! remembered, so the next call tries again.

use crate::api::{FinnhubClient, MarketDataProvider, RatingsProvider, YahooFinanceClient};
use crate::config::DashboardConfig;
use crate::error::{Result, StockError};
use dash_llm::LLMProvider;
use dash_llm::providers::AnthropicProvider;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

type Factory<P> = Box<dyn Fn() -> Result<Arc<P>> + Send + Sync>;

/// A provider built on first use and shared afterwards
pub struct LazyProvider<P: ?Sized> {
    name: &'static str,
    cell: OnceCell<Arc<P>>,
    factory: Factory<P>,
}

impl<P: ?Sized + Send + Sync + 'static> LazyProvider<P> {
    /// Create a handle that runs `factory` on first use
    pub fn new(
        name: &'static str,
        factory: impl Fn() -> Result<Arc<P>> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            cell: OnceCell::new(),
            factory: Box::new(factory),
        }
    }

    /// Create a handle around an already constructed provider
    pub fn ready(name: &'static str, provider: Arc<P>) -> Self {
        Self {
            name,
            cell: OnceCell::new_with(Some(provider)),
            factory: Box::new(move || -> Result<Arc<P>> {
                Err(StockError::ConfigError(format!(
                    "{name} provider was supplied pre-built"
                )))
            }),
        }
    }

    /// Get the provider, constructing it if this is the first use
    pub async fn get(&self) -> Result<Arc<P>> {
        let provider = self
            .cell
            .get_or_try_init(|| async {
                let provider = (self.factory)()?;
                info!(provider = self.name, "Initialized provider client");
                Ok::<_, StockError>(provider)
            })
            .await?;
        Ok(Arc::clone(provider))
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the provider has been constructed
    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}

/// The three provider handles used by the data layer
pub struct ProviderHandles {
    pub market: LazyProvider<dyn MarketDataProvider>,
    pub ratings: LazyProvider<dyn RatingsProvider>,
    pub llm: LazyProvider<dyn LLMProvider>,
}

impl ProviderHandles {
    /// Lazily construct the Yahoo, Finnhub, and Anthropic clients from configuration
    pub fn from_config(config: &DashboardConfig) -> Self {
        let timeout = config.request_timeout;
        let finnhub_key = config.finnhub_api_key.clone();
        let finnhub_rate = config.finnhub_rate_limit;
        let anthropic_key = config.anthropic_api_key.clone();

        Self {
            market: LazyProvider::new("yahoo", move || {
                let client: Arc<dyn MarketDataProvider> =
                    Arc::new(YahooFinanceClient::new(timeout)?);
                Ok(client)
            }),
            ratings: LazyProvider::new("finnhub", move || {
                let key = finnhub_key.clone().ok_or_else(|| {
                    StockError::ConfigError("FINNHUB_API_KEY is not set".to_string())
                })?;
                let client: Arc<dyn RatingsProvider> =
                    Arc::new(FinnhubClient::new(key, finnhub_rate, timeout)?);
                Ok(client)
            }),
            llm: LazyProvider::new("anthropic", move || {
                let key = anthropic_key.clone().ok_or_else(|| {
                    StockError::ConfigError("ANTHROPIC_API_KEY is not set".to_string())
                })?;
                let client: Arc<dyn LLMProvider> =
                    Arc::new(AnthropicProvider::with_timeout(key, timeout)?);
                Ok(client)
            }),
        }
    }

    /// Wrap already constructed providers (tests, alternative backends)
    pub fn with_providers(
        market: Arc<dyn MarketDataProvider>,
        ratings: Arc<dyn RatingsProvider>,
        llm: Arc<dyn LLMProvider>,
    ) -> Self {
        Self {
            market: LazyProvider::ready("market", market),
            ratings: LazyProvider::ready("ratings", ratings),
            llm: LazyProvider::ready("llm", llm),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_factory_runs_once() {
        let builds = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&builds);
        let handle: LazyProvider<String> = LazyProvider::new("test", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new("client".to_string()))
        });

        assert!(!handle.is_initialized());
        let a = assert_ok!(handle.get().await);
        let b = assert_ok!(handle.get().await);

        assert!(Arc::ptr_eq(&a, &b));
        assert!(handle.is_initialized());
        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_construction_is_retried() {
        let builds = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&builds);
        let handle: LazyProvider<String> = LazyProvider::new("test", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(StockError::ConfigError("no key".to_string()))
        });

        assert_err!(handle.get().await);
        assert_err!(handle.get().await);
        assert!(!handle.is_initialized());
        assert_eq!(builds.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_ready_handle() {
        let handle = LazyProvider::ready("test", Arc::new(42_u32));
        assert!(handle.is_initialized());
        assert_eq!(*handle.get().await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_missing_keys_surface_on_use() {
        let config = DashboardConfig::default();
        let handles = ProviderHandles::from_config(&config);

        assert!(matches!(
            handles.ratings.get().await,
            Err(StockError::ConfigError(_))
        ));
        assert!(matches!(
            handles.llm.get().await,
            Err(StockError::ConfigError(_))
        ));
        assert_ok!(handles.market.get().await);
        assert_eq!(handles.market.name(), "yahoo");
    }
}
