use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::models::{CreatePortfolio, Holding, Portfolio};
use crate::services::valuation;

pub async fn create(
    pool: &PgPool,
    user_id: Uuid,
    input: CreatePortfolio,
) -> Result<Portfolio, AppError> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("Portfolio name cannot be empty".into()));
    }
    let new_portfolio = Portfolio::new(user_id, input.name, input.description);
    let portfolio = db::portfolio_queries::insert(pool, new_portfolio).await?;
    Ok(portfolio)
}

pub async fn fetch_all(pool: &PgPool, user_id: Uuid) -> Result<Vec<Portfolio>, AppError> {
    let portfolios = db::portfolio_queries::fetch_all_for_user(pool, user_id).await?;
    Ok(portfolios)
}

pub async fn fetch_owned(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<Portfolio, AppError> {
    let portfolio = db::portfolio_queries::fetch_owned(pool, id, user_id)
        .await?
        .ok_or(AppError::NotFound("Portfolio not found".to_string()))?;
    Ok(portfolio)
}

pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<(), AppError> {
    match db::portfolio_queries::delete(pool, id, user_id).await {
        Ok(0) => Err(AppError::NotFound("Portfolio not found".to_string())),
        Ok(_) => Ok(()),
        Err(e) => Err(AppError::from(e)),
    }
}

/// Recompute aggregates from the holding set and persist both sides.
/// Called after any holding mutation so the stored portfolio always agrees
/// with its holdings.
pub async fn recompute_and_persist(
    pool: &PgPool,
    portfolio: &mut Portfolio,
    holdings: &mut [Holding],
) -> Result<(), AppError> {
    valuation::recompute_portfolio(portfolio, holdings);
    db::holding_queries::update_valuations(pool, holdings).await?;
    db::portfolio_queries::update_totals(pool, portfolio).await?;
    Ok(())
}
