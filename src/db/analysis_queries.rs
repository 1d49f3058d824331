use crate::models::{Analysis, AnalysisStatus, RiskMetrics};
use sqlx::PgPool;
use uuid::Uuid;

const COLUMNS: &str = "id, portfolio_id, user_id, status, risk_score, risk_level, beta, \
                       sharpe_ratio, volatility, max_drawdown, ai_summary, ai_recommendations, \
                       sector_distribution, error_message, created_at";

pub async fn insert(pool: &PgPool, input: Analysis) -> Result<Analysis, sqlx::Error> {
    sqlx::query_as::<_, Analysis>(&format!(
        "INSERT INTO analyses (id, portfolio_id, user_id, status, created_at)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {COLUMNS}"
    ))
    .bind(input.id)
    .bind(input.portfolio_id)
    .bind(input.user_id)
    .bind(input.status)
    .bind(input.created_at)
    .fetch_one(pool)
    .await
}

pub async fn fetch_owned(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
) -> Result<Option<Analysis>, sqlx::Error> {
    sqlx::query_as::<_, Analysis>(&format!(
        "SELECT {COLUMNS} FROM analyses WHERE id = $1 AND user_id = $2"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Whether any run against this portfolio is still in flight. Used as the
/// per-portfolio mutual-exclusion guard at trigger time.
pub async fn has_processing(pool: &PgPool, portfolio_id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM analyses WHERE portfolio_id = $1 AND status = $2)",
    )
    .bind(portfolio_id)
    .bind(AnalysisStatus::Processing)
    .fetch_one(pool)
    .await
}

/// Write every computed block and flip the record to `completed` in one
/// statement, so the terminal transition is atomic.
pub async fn complete(
    pool: &PgPool,
    id: Uuid,
    risk: &RiskMetrics,
    ai_summary: Option<&str>,
    ai_recommendations: &serde_json::Value,
    sector_distribution: &serde_json::Value,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE analyses
         SET status = $1, risk_score = $2, risk_level = $3, beta = $4, sharpe_ratio = $5,
             volatility = $6, max_drawdown = $7, ai_summary = $8, ai_recommendations = $9,
             sector_distribution = $10
         WHERE id = $11",
    )
    .bind(AnalysisStatus::Completed)
    .bind(risk.risk_score)
    .bind(risk.risk_level.as_str())
    .bind(risk.beta)
    .bind(risk.sharpe_ratio)
    .bind(risk.volatility)
    .bind(risk.max_drawdown)
    .bind(ai_summary)
    .bind(ai_recommendations)
    .bind(sector_distribution)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn mark_failed(pool: &PgPool, id: Uuid, message: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE analyses SET status = $1, error_message = $2 WHERE id = $3")
        .bind(AnalysisStatus::Failed)
        .bind(message)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
