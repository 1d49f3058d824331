use axum::extract::{Path, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{CreatePortfolio, Portfolio};
use crate::routes::auth::AuthUser;
use crate::services::portfolio_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_portfolio).get(fetch_portfolios))
        .route("/:portfolio_id", get(get_portfolio))
        .route("/:portfolio_id", delete(delete_portfolio))
}

#[axum::debug_handler]
pub async fn create_portfolio(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(data): Json<CreatePortfolio>,
) -> Result<Json<Portfolio>, AppError> {
    info!("POST /portfolios - Creating new portfolio");
    let portfolio = portfolio_service::create(&state.pool, user.id, data)
        .await
        .map_err(|e| {
            error!("Failed to create portfolio: {}", e);
            e
        })?;
    Ok(Json(portfolio))
}

pub async fn fetch_portfolios(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Portfolio>>, AppError> {
    info!("GET /portfolios - Fetching portfolios");
    let portfolios = portfolio_service::fetch_all(&state.pool, user.id)
        .await
        .map_err(|e| {
            error!("Failed to fetch portfolios: {}", e);
            e
        })?;
    Ok(Json(portfolios))
}

pub async fn get_portfolio(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(portfolio_id): Path<Uuid>,
) -> Result<Json<Portfolio>, AppError> {
    info!("GET /portfolios/{} - Fetching portfolio", portfolio_id);
    let portfolio = portfolio_service::fetch_owned(&state.pool, portfolio_id, user.id)
        .await
        .map_err(|e| {
            error!("Failed to fetch portfolio {}: {}", portfolio_id, e);
            e
        })?;
    Ok(Json(portfolio))
}

pub async fn delete_portfolio(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(portfolio_id): Path<Uuid>,
) -> Result<Json<()>, AppError> {
    info!("DELETE /portfolios/{} - Deleting portfolio", portfolio_id);
    portfolio_service::delete(&state.pool, portfolio_id, user.id)
        .await
        .map_err(|e| {
            error!("Failed to delete portfolio {}: {}", portfolio_id, e);
            e
        })?;
    Ok(Json(()))
}
