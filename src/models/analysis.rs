use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Lifecycle of an analysis run. `Completed` and `Failed` are terminal;
/// no transition ever leaves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Processing,
    Completed,
    Failed,
}

// One analysis run against a portfolio. Created in Processing before the
// pipeline starts so the caller can poll immediately; all computed fields
// are written in a single update when the run reaches a terminal status.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Analysis {
    pub id: uuid::Uuid,
    pub portfolio_id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub status: AnalysisStatus,
    pub risk_score: Option<i32>,
    pub risk_level: Option<String>,
    pub beta: Option<f64>,
    pub sharpe_ratio: Option<f64>,
    pub volatility: Option<f64>,
    pub max_drawdown: Option<f64>,
    pub ai_summary: Option<String>,
    pub ai_recommendations: Option<serde_json::Value>,
    pub sector_distribution: Option<serde_json::Value>,
    pub error_message: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Analysis {
    pub(crate) fn new(portfolio_id: uuid::Uuid, user_id: uuid::Uuid) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            portfolio_id,
            user_id,
            status: AnalysisStatus::Processing,
            risk_score: None,
            risk_level: None,
            beta: None,
            sharpe_ratio: None,
            volatility: None,
            max_drawdown: None,
            ai_summary: None,
            ai_recommendations: None,
            sector_distribution: None,
            error_message: None,
            created_at: chrono::Utc::now(),
        }
    }
}
