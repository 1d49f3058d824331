use crate::external::market_data::{PriceProviderError, SpotPriceProvider};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Foreign-market source backed by the Yahoo Finance chart API.
///
/// Prefers the fast last-trade price from the chart metadata; when that is
/// absent, falls back to the most recent daily close in the same response.
pub struct YahooProvider {
    client: reqwest::Client,
    base_url: String,
}

impl YahooProvider {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: "https://query1.finance.yahoo.com/v8/finance/chart".to_string(),
        }
    }
}

// Minimal response structs (only what we need)
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    meta: YahooMeta,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooMeta {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

fn spot_from_result(result: &YahooResult) -> Option<f64> {
    if let Some(price) = result.meta.regular_market_price {
        return Some(price);
    }

    // Fallback: latest non-null daily close
    result
        .indicators
        .quote
        .first()?
        .close
        .iter()
        .rev()
        .find_map(|c| *c)
}

#[async_trait]
impl SpotPriceProvider for YahooProvider {
    async fn fetch_spot(&self, ticker: &str) -> Result<f64, PriceProviderError> {
        let url = format!("{}/{}?range=1d&interval=1d", self.base_url, ticker);

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PriceProviderError::RateLimited);
        }

        let body = resp
            .json::<YahooChartResponse>()
            .await
            .map_err(|e| PriceProviderError::Parse(e.to_string()))?;

        let result = body
            .chart
            .result
            .and_then(|mut r| r.pop())
            .ok_or_else(|| PriceProviderError::BadResponse("missing result".into()))?;

        spot_from_result(&result).ok_or(PriceProviderError::NoQuote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_regular_market_price() {
        let result = YahooResult {
            meta: YahooMeta {
                regular_market_price: Some(187.5),
            },
            indicators: YahooIndicators {
                quote: vec![YahooQuote {
                    close: vec![Some(180.0), Some(185.0)],
                }],
            },
        };

        assert_eq!(spot_from_result(&result), Some(187.5));
    }

    #[test]
    fn falls_back_to_latest_close() {
        let result = YahooResult {
            meta: YahooMeta {
                regular_market_price: None,
            },
            indicators: YahooIndicators {
                quote: vec![YahooQuote {
                    close: vec![Some(180.0), Some(185.0), None],
                }],
            },
        };

        assert_eq!(spot_from_result(&result), Some(185.0));
    }

    #[test]
    fn no_data_yields_none() {
        let result = YahooResult {
            meta: YahooMeta {
                regular_market_price: None,
            },
            indicators: YahooIndicators {
                quote: vec![YahooQuote { close: vec![None] }],
            },
        };

        assert_eq!(spot_from_result(&result), None);
    }
}
