use crate::external::market_data::{PriceProviderError, SpotPriceProvider};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::time::Duration;

/// Domestic (KRX) daily-quote source.
///
/// KRX only publishes a close for completed trading sessions, so a request
/// for today's date returns an empty block on holidays and before the open.
/// That case is reported as `NoQuote` rather than reaching back for an
/// older close.
pub struct KrxProvider {
    client: reqwest::Client,
    base_url: String,
}

impl KrxProvider {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: "https://data-api.krx.co.kr/svc/apis/sto".to_string(),
        }
    }
}

// Minimal response structs (only what we need)
#[derive(Debug, Deserialize)]
struct KrxDailyResponse {
    #[serde(rename = "OutBlock_1", default)]
    rows: Vec<KrxDailyRow>,
}

#[derive(Debug, Deserialize)]
struct KrxDailyRow {
    #[serde(rename = "TDD_CLSPRC")]
    close_price: String,
}

#[async_trait]
impl SpotPriceProvider for KrxProvider {
    async fn fetch_spot(&self, ticker: &str) -> Result<f64, PriceProviderError> {
        let today = Utc::now().format("%Y%m%d").to_string();
        let url = format!(
            "{}/stk_bydd_trd?basDd={}&isuCd={}",
            self.base_url, today, ticker
        );

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
            .json::<KrxDailyResponse>()
            .await
            .map_err(|e| PriceProviderError::Parse(e.to_string()))?;

        // No row for today means holiday or pre-open
        let row = body.rows.first().ok_or(PriceProviderError::NoQuote)?;

        // KRX formats prices with thousands separators ("71,900")
        row.close_price
            .replace(',', "")
            .parse::<f64>()
            .map_err(|e| PriceProviderError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_response_parses_separator_prices() {
        let json = r#"{"OutBlock_1":[{"TDD_CLSPRC":"71,900"}]}"#;
        let body: KrxDailyResponse = serde_json::from_str(json).unwrap();
        let price: f64 = body.rows[0].close_price.replace(',', "").parse().unwrap();
        assert_eq!(price, 71900.0);
    }

    #[test]
    fn empty_block_means_no_quote() {
        let json = r#"{"OutBlock_1":[]}"#;
        let body: KrxDailyResponse = serde_json::from_str(json).unwrap();
        assert!(body.rows.is_empty());
    }
}
