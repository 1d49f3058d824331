use crate::external::market_data::{PriceProviderError, SpotPriceProvider};
use crate::models::Market;
use crate::services::failure_cache::{FailureCache, FailureKind};
use std::sync::Arc;
use tracing::{info, warn};

/// Routes price lookups to the market-appropriate source and absorbs every
/// source failure into a price of zero.
pub struct PriceService {
    domestic: Arc<dyn SpotPriceProvider>,
    foreign: Arc<dyn SpotPriceProvider>,
    failure_cache: FailureCache,
}

impl PriceService {
    pub fn new(domestic: Arc<dyn SpotPriceProvider>, foreign: Arc<dyn SpotPriceProvider>) -> Self {
        Self {
            domestic,
            foreign,
            failure_cache: FailureCache::new(),
        }
    }

    /// Resolve the current price for a holding.
    ///
    /// Never fails: an unreachable source, an unknown symbol, or a session
    /// with no quote all come back as 0.0, so one bad ticker degrades its
    /// own valuation instead of aborting the whole analysis. A zero price
    /// therefore also means "unknown", not only "worthless".
    pub async fn resolve_price(&self, ticker: &str, market: Market) -> f64 {
        if self.failure_cache.is_failed(ticker) {
            warn!("Skipping price lookup for {} (recent source failure)", ticker);
            return 0.0;
        }

        let provider = match market {
            Market::Domestic => &self.domestic,
            Market::Foreign => &self.foreign,
        };

        match provider.fetch_spot(ticker).await {
            Ok(price) if price.is_finite() && price >= 0.0 => {
                self.failure_cache.clear(ticker);
                price
            }
            Ok(price) => {
                warn!("Discarding out-of-range price {} for {}", price, ticker);
                0.0
            }
            Err(PriceProviderError::NoQuote) => {
                // Holiday / pre-open / unknown symbol; not worth caching
                info!("No quote available for {}, valuing at 0", ticker);
                0.0
            }
            Err(PriceProviderError::RateLimited) => {
                warn!("Rate limited fetching price for {}", ticker);
                self.failure_cache
                    .record_failure(ticker, FailureKind::RateLimited);
                0.0
            }
            Err(e) => {
                warn!("Failed to fetch price for {}: {}", ticker, e);
                self.failure_cache
                    .record_failure(ticker, FailureKind::Upstream);
                0.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedProvider(f64);

    #[async_trait]
    impl SpotPriceProvider for FixedProvider {
        async fn fetch_spot(&self, _ticker: &str) -> Result<f64, PriceProviderError> {
            Ok(self.0)
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl SpotPriceProvider for FailingProvider {
        async fn fetch_spot(&self, _ticker: &str) -> Result<f64, PriceProviderError> {
            Err(PriceProviderError::Network("connection refused".into()))
        }
    }

    fn service(domestic: Arc<dyn SpotPriceProvider>, foreign: Arc<dyn SpotPriceProvider>) -> PriceService {
        PriceService::new(domestic, foreign)
    }

    #[tokio::test]
    async fn routes_by_market() {
        let svc = service(Arc::new(FixedProvider(71900.0)), Arc::new(FixedProvider(150.0)));
        assert_eq!(svc.resolve_price("005930", Market::Domestic).await, 71900.0);
        assert_eq!(svc.resolve_price("AAPL", Market::Foreign).await, 150.0);
    }

    #[tokio::test]
    async fn source_failure_resolves_to_zero() {
        let svc = service(Arc::new(FailingProvider), Arc::new(FailingProvider));
        assert_eq!(svc.resolve_price("AAPL", Market::Foreign).await, 0.0);
    }

    #[tokio::test]
    async fn repeated_failures_are_short_circuited() {
        let svc = service(Arc::new(FailingProvider), Arc::new(FailingProvider));
        svc.resolve_price("AAPL", Market::Foreign).await;
        // Second call hits the failure cache, still resolves to zero
        assert_eq!(svc.resolve_price("AAPL", Market::Foreign).await, 0.0);
    }

    #[tokio::test]
    async fn negative_price_is_discarded() {
        let svc = service(Arc::new(FixedProvider(-1.0)), Arc::new(FixedProvider(-1.0)));
        assert_eq!(svc.resolve_price("AAPL", Market::Foreign).await, 0.0);
    }
}
