use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{error, info};
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::models::{CreateHolding, Holding};
use crate::routes::auth::AuthUser;
use crate::services::{portfolio_service, valuation};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create_holding).get(fetch_holdings))
}

#[axum::debug_handler]
pub async fn create_holding(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(portfolio_id): Path<Uuid>,
    Json(data): Json<CreateHolding>,
) -> Result<Json<Holding>, AppError> {
    info!(
        "POST /portfolios/{}/holdings - Adding {}",
        portfolio_id, data.ticker
    );

    let mut portfolio = portfolio_service::fetch_owned(&state.pool, portfolio_id, user.id).await?;

    if data.ticker.trim().is_empty() {
        return Err(AppError::Validation("Ticker cannot be empty".into()));
    }
    if data.quantity < 0 {
        return Err(AppError::Validation("Quantity cannot be negative".into()));
    }
    if data.avg_price < 0.0 {
        return Err(AppError::Validation("Average price cannot be negative".into()));
    }

    let price = state.prices.resolve_price(&data.ticker, data.market).await;

    let mut holding = Holding::new(portfolio_id, data);
    valuation::update_holding(&mut holding, price);

    let holding = db::holding_queries::insert(&state.pool, holding)
        .await
        .map_err(|e| {
            error!("Failed to insert holding: {}", e);
            AppError::Db(e)
        })?;

    // Bring portfolio totals and every weight in line with the new set
    let mut holdings = db::holding_queries::fetch_for_portfolio(&state.pool, portfolio_id).await?;
    portfolio_service::recompute_and_persist(&state.pool, &mut portfolio, &mut holdings).await?;

    let holding = holdings
        .into_iter()
        .find(|h| h.id == holding.id)
        .unwrap_or(holding);

    Ok(Json(holding))
}

pub async fn fetch_holdings(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(portfolio_id): Path<Uuid>,
) -> Result<Json<Vec<Holding>>, AppError> {
    info!("GET /portfolios/{}/holdings - Fetching holdings", portfolio_id);

    portfolio_service::fetch_owned(&state.pool, portfolio_id, user.id).await?;

    let holdings = db::holding_queries::fetch_for_portfolio(&state.pool, portfolio_id)
        .await
        .map_err(|e| {
            error!("Failed to fetch holdings for {}: {}", portfolio_id, e);
            AppError::Db(e)
        })?;
    Ok(Json(holdings))
}
