use serde::{Deserialize, Serialize};

/// Structured output of the recommendation synthesis stage.
///
/// The shape is identical whether it came from the narrative service or the
/// deterministic fallback; consumers never need to distinguish the two.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationPayload {
    pub summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub immediate_actions: Vec<RecommendedAction>,
    #[serde(default)]
    pub risk_assessment: String,
    #[serde(default)]
    pub long_term_strategy: String,
}

/// One advisory trade suggestion. Never executed against holdings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendedAction {
    pub action: String,
    pub ticker: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub reason: String,
}
