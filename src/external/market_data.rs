use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PriceProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("no quote available")]
    NoQuote,

    #[error("rate limited")]
    RateLimited,
}

/// A source of spot prices for one market.
///
/// Implementations fetch the freshest price they can for a ticker; a ticker
/// with no current quote (holiday, pre-open, unknown symbol) is `NoQuote`,
/// never a stale value.
#[async_trait]
pub trait SpotPriceProvider: Send + Sync {
    async fn fetch_spot(&self, ticker: &str) -> Result<f64, PriceProviderError>;
}
