use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use http::StatusCode;
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Analysis, AnalysisStatus};
use crate::routes::auth::AuthUser;
use crate::services::analysis_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(start_analysis))
        .route("/:analysis_id", get(get_analysis))
}

/// Acknowledgment for a dispatched run; the caller polls with the id.
#[derive(Debug, Serialize)]
pub struct StartedAnalysis {
    pub id: Uuid,
    pub status: AnalysisStatus,
}

#[axum::debug_handler]
pub async fn start_analysis(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(portfolio_id): Path<Uuid>,
) -> Result<(StatusCode, Json<StartedAnalysis>), AppError> {
    info!(
        "POST /portfolios/{}/analyze - Starting analysis",
        portfolio_id
    );

    let analysis = analysis_service::start(&state, portfolio_id, user.id)
        .await
        .map_err(|e| {
            error!("Failed to start analysis for {}: {}", portfolio_id, e);
            e
        })?;

    Ok((
        StatusCode::ACCEPTED,
        Json(StartedAnalysis {
            id: analysis.id,
            status: analysis.status,
        }),
    ))
}

pub async fn get_analysis(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((portfolio_id, analysis_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Analysis>, AppError> {
    info!(
        "GET /portfolios/{}/analyze/{} - Fetching analysis",
        portfolio_id, analysis_id
    );

    let analysis = analysis_service::fetch_owned(&state.pool, analysis_id, user.id)
        .await
        .map_err(|e| {
            error!("Failed to fetch analysis {}: {}", analysis_id, e);
            e
        })?;
    Ok(Json(analysis))
}
