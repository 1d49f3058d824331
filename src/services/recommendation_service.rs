use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::errors::LlmError;
use crate::models::{
    Holding, Portfolio, RecommendationPayload, RecommendedAction, RiskMetrics, SectorAnalysis,
};

/// Capability boundary for narrative generation. The live adapter talks to
/// OpenAI; the stub answers deterministically when no key is configured.
#[async_trait]
pub trait NarrativeProvider: Send + Sync {
    /// Generate a JSON document matching the recommendation payload shape.
    async fn generate(&self, prompt: String) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    response_format: OpenAiResponseFormat,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct OpenAiResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: String,
}

pub struct OpenAiNarrativeProvider {
    api_key: String,
    model: String,
    client: Client,
}

impl OpenAiNarrativeProvider {
    pub fn new(api_key: String, model: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_key,
            model,
            client,
        }
    }

    async fn call_openai(&self, request: &OpenAiRequest) -> Result<String, LlmError> {
        let response = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();

        if status == 429 {
            return Err(LlmError::RateLimited);
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::ApiError(format!("HTTP {}: {}", status, error_text)));
        }

        let body = response
            .json::<OpenAiResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("No choices in response".to_string()))
    }
}

#[async_trait]
impl NarrativeProvider for OpenAiNarrativeProvider {
    async fn generate(&self, prompt: String) -> Result<String, LlmError> {
        let request = OpenAiRequest {
            model: self.model.clone(),
            messages: vec![
                OpenAiMessage {
                    role: "system".to_string(),
                    content: "You are a portfolio manager with 20 years of experience."
                        .to_string(),
                },
                OpenAiMessage {
                    role: "user".to_string(),
                    content: prompt,
                },
            ],
            response_format: OpenAiResponseFormat {
                format_type: "json_object".to_string(),
            },
        };

        let mut retry_count = 0;
        let max_retries = 3;
        let mut delay = Duration::from_secs(1);

        loop {
            match self.call_openai(&request).await {
                Ok(content) => return Ok(content),
                Err(e) => {
                    retry_count += 1;
                    if retry_count >= max_retries {
                        error!("OpenAI call failed after {} retries: {}", max_retries, e);
                        return Err(e);
                    }

                    warn!(
                        "OpenAI call failed (attempt {}/{}): {}. Retrying in {:?}...",
                        retry_count, max_retries, e, delay
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
            }
        }
    }
}

/// Deterministic stand-in used when no narrative service is configured.
/// Returns a canned document in the same JSON shape the live adapter is
/// asked for, so everything downstream follows one code path.
pub struct StubNarrativeProvider;

#[async_trait]
impl NarrativeProvider for StubNarrativeProvider {
    async fn generate(&self, _prompt: String) -> Result<String, LlmError> {
        Ok(serde_json::to_string(&placeholder_payload())
            .expect("placeholder payload serializes"))
    }
}

fn placeholder_payload() -> RecommendationPayload {
    RecommendationPayload {
        summary: "Demo analysis: no narrative service is configured. The portfolio looks \
                  broadly stable, with an elevated IT concentration."
            .to_string(),
        strengths: vec![
            "High return potential".to_string(),
            "Blue-chip heavy composition".to_string(),
        ],
        weaknesses: vec![
            "Limited sector diversification".to_string(),
            "Elevated volatility".to_string(),
        ],
        immediate_actions: vec![RecommendedAction {
            action: "hold".to_string(),
            ticker: "005930".to_string(),
            quantity: 0,
            reason: "Demo recommendation".to_string(),
        }],
        risk_assessment: "Risk sits slightly above the market average.".to_string(),
        long_term_strategy: "Trim growth-heavy positions and add dividend payers to improve \
                             stability."
            .to_string(),
    }
}

/// Same shape, produced when the narrative call or parse failed. The error
/// is surfaced in the summary so a reader can tell what happened, but the
/// analysis run still completes.
fn degraded_payload(err: &LlmError) -> RecommendationPayload {
    RecommendationPayload {
        summary: format!("Narrative generation failed: {err}"),
        strengths: vec![],
        weaknesses: vec![],
        immediate_actions: vec![],
        risk_assessment: "Unavailable for this run.".to_string(),
        long_term_strategy: "Unavailable for this run.".to_string(),
    }
}

/// Builds prompts from the computed blocks and turns narrative responses
/// into recommendation payloads.
pub struct RecommendationService {
    provider: Arc<dyn NarrativeProvider>,
}

impl RecommendationService {
    pub fn new(provider: Arc<dyn NarrativeProvider>) -> Self {
        Self { provider }
    }

    pub fn from_config(config: &Config) -> Self {
        match &config.openai_api_key {
            Some(key) => {
                info!("Narrative provider: OpenAI ({})", config.openai_model);
                Self::new(Arc::new(OpenAiNarrativeProvider::new(
                    key.clone(),
                    config.openai_model.clone(),
                )))
            }
            None => {
                info!("Narrative provider: deterministic stub (no API key configured)");
                Self::new(Arc::new(StubNarrativeProvider))
            }
        }
    }

    /// Combine the refreshed snapshot with the risk and sector blocks into
    /// a recommendation payload. Never fails; a misbehaving provider is
    /// mapped to a degraded payload of the same shape.
    pub async fn synthesize(
        &self,
        portfolio: &Portfolio,
        holdings: &[Holding],
        risk: &RiskMetrics,
        sectors: &SectorAnalysis,
    ) -> RecommendationPayload {
        let prompt = build_prompt(portfolio, holdings, risk, sectors);

        match self.provider.generate(prompt).await {
            Ok(raw) => match parse_payload(&raw) {
                Ok(payload) => payload,
                Err(e) => {
                    warn!("Narrative response did not match payload shape: {}", e);
                    degraded_payload(&e)
                }
            },
            Err(e) => {
                warn!("Narrative generation failed: {}", e);
                degraded_payload(&e)
            }
        }
    }
}

fn parse_payload(raw: &str) -> Result<RecommendationPayload, LlmError> {
    serde_json::from_str::<RecommendationPayload>(raw)
        .map_err(|e| LlmError::InvalidResponse(e.to_string()))
}

fn build_prompt(
    portfolio: &Portfolio,
    holdings: &[Holding],
    risk: &RiskMetrics,
    sectors: &SectorAnalysis,
) -> String {
    let holdings_lines: Vec<String> = holdings
        .iter()
        .map(|h| {
            format!(
                "- {} ({}): {} shares, weight {:.1}%",
                h.ticker,
                h.name.as_deref().unwrap_or("unnamed"),
                h.quantity,
                h.weight
            )
        })
        .collect();

    let issue_lines: Vec<String> = sectors
        .issues
        .iter()
        .map(|i| {
            format!(
                "- {}: current {:.0}% vs target {:.0}%",
                i.sector,
                i.current * 100.0,
                i.recommended * 100.0
            )
        })
        .collect();

    format!(
        r#"Analyze this investment portfolio.

PORTFOLIO:
- Total value: {:.0}
- Positions: {}
- Return: {:.2}%

HOLDINGS:
{}

RISK:
- Risk score: {}/10
- Volatility: {:.2}%
- Sharpe ratio: {:.3}

SECTOR GAPS:
{}

Respond with a JSON object of exactly this shape:
{{
  "summary": "overall assessment, 3-4 sentences",
  "strengths": ["...", "...", "..."],
  "weaknesses": ["...", "...", "..."],
  "immediate_actions": [
    {{"action": "sell", "ticker": "TICKER", "quantity": 10, "reason": "..."}}
  ],
  "risk_assessment": "...",
  "long_term_strategy": "..."
}}"#,
        portfolio.total_value,
        holdings.len(),
        portfolio.profit_rate,
        holdings_lines.join("\n"),
        risk.risk_score,
        risk.volatility,
        risk.sharpe_ratio,
        if issue_lines.is_empty() {
            "- none".to_string()
        } else {
            issue_lines.join("\n")
        }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RiskLevel;
    use std::collections::BTreeMap;
    use uuid::Uuid;

    fn fixtures() -> (Portfolio, Vec<Holding>, RiskMetrics, SectorAnalysis) {
        let portfolio = Portfolio::new(Uuid::new_v4(), "growth".to_string(), None);
        let risk = RiskMetrics {
            risk_score: 6,
            risk_level: RiskLevel::Aggressive,
            beta: 1.1,
            sharpe_ratio: 0.9,
            volatility: 18.0,
            max_drawdown: -12.0,
        };
        let sectors = SectorAnalysis {
            current: BTreeMap::new(),
            ideal: BTreeMap::new(),
            issues: vec![],
        };
        (portfolio, vec![], risk, sectors)
    }

    struct BrokenProvider;

    #[async_trait]
    impl NarrativeProvider for BrokenProvider {
        async fn generate(&self, _prompt: String) -> Result<String, LlmError> {
            Err(LlmError::NetworkError("boom".into()))
        }
    }

    struct GarbageProvider;

    #[async_trait]
    impl NarrativeProvider for GarbageProvider {
        async fn generate(&self, _prompt: String) -> Result<String, LlmError> {
            Ok("this is not json".to_string())
        }
    }

    #[tokio::test]
    async fn stub_provider_yields_fully_populated_payload() {
        let (portfolio, holdings, risk, sectors) = fixtures();
        let service = RecommendationService::new(Arc::new(StubNarrativeProvider));

        let payload = service
            .synthesize(&portfolio, &holdings, &risk, &sectors)
            .await;

        assert!(!payload.summary.is_empty());
        assert!(!payload.strengths.is_empty());
        assert!(!payload.weaknesses.is_empty());
        assert!(!payload.immediate_actions.is_empty());
        assert!(!payload.risk_assessment.is_empty());
        assert!(!payload.long_term_strategy.is_empty());
    }

    #[tokio::test]
    async fn provider_error_yields_same_shape_payload() {
        let (portfolio, holdings, risk, sectors) = fixtures();
        let service = RecommendationService::new(Arc::new(BrokenProvider));

        let payload = service
            .synthesize(&portfolio, &holdings, &risk, &sectors)
            .await;

        assert!(payload.summary.contains("failed"));
        assert!(payload.immediate_actions.is_empty());
    }

    #[tokio::test]
    async fn unparseable_response_yields_same_shape_payload() {
        let (portfolio, holdings, risk, sectors) = fixtures();
        let service = RecommendationService::new(Arc::new(GarbageProvider));

        let payload = service
            .synthesize(&portfolio, &holdings, &risk, &sectors)
            .await;

        assert!(payload.summary.contains("failed"));
    }

    #[test]
    fn prompt_mentions_metrics_and_shape() {
        let (portfolio, holdings, risk, sectors) = fixtures();
        let prompt = build_prompt(&portfolio, &holdings, &risk, &sectors);

        assert!(prompt.contains("Risk score: 6/10"));
        assert!(prompt.contains("\"summary\""));
        assert!(prompt.contains("SECTOR GAPS"));
    }

    #[test]
    fn payload_roundtrips_through_json() {
        let payload = placeholder_payload();
        let json = serde_json::to_string(&payload).unwrap();
        let parsed = parse_payload(&json).unwrap();
        assert_eq!(parsed.summary, payload.summary);
        assert_eq!(parsed.immediate_actions.len(), 1);
    }
}
