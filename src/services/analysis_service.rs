use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::models::Analysis;
use crate::services::{portfolio_service, risk_service, valuation};
use crate::state::AppState;

/// Create the analysis record and dispatch the run in the background.
///
/// Returns immediately with the record in `processing` so the caller can
/// poll. A portfolio with a run still in flight is rejected; overlapping
/// runs would race on the same holding rows.
pub async fn start(
    state: &AppState,
    portfolio_id: Uuid,
    user_id: Uuid,
) -> Result<Analysis, AppError> {
    db::portfolio_queries::fetch_owned(&state.pool, portfolio_id, user_id)
        .await?
        .ok_or(AppError::NotFound("Portfolio not found".to_string()))?;

    if db::analysis_queries::has_processing(&state.pool, portfolio_id).await? {
        return Err(AppError::Conflict(
            "An analysis for this portfolio is already processing".to_string(),
        ));
    }

    let analysis =
        db::analysis_queries::insert(&state.pool, Analysis::new(portfolio_id, user_id)).await?;

    let task_state = state.clone();
    let analysis_id = analysis.id;
    tokio::spawn(async move {
        run(task_state, analysis_id, portfolio_id).await;
    });

    Ok(analysis)
}

pub async fn fetch_owned(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<Analysis, AppError> {
    let analysis = db::analysis_queries::fetch_owned(pool, id, user_id)
        .await?
        .ok_or(AppError::NotFound("Analysis not found".to_string()))?;
    Ok(analysis)
}

/// Top-level task for one analysis run. Every error from the pipeline is
/// caught here and recorded as the terminal `failed` status; the record is
/// never left in `processing` once this returns.
pub async fn run(state: AppState, analysis_id: Uuid, portfolio_id: Uuid) {
    info!(
        "Starting analysis {} for portfolio {}",
        analysis_id, portfolio_id
    );

    if let Err(e) = run_pipeline(&state, analysis_id, portfolio_id).await {
        error!("Analysis {} failed: {}", analysis_id, e);
        if let Err(db_err) =
            db::analysis_queries::mark_failed(&state.pool, analysis_id, &e.to_string()).await
        {
            error!(
                "Failed to record failure for analysis {}: {}",
                analysis_id, db_err
            );
        }
    }
}

async fn run_pipeline(
    state: &AppState,
    analysis_id: Uuid,
    portfolio_id: Uuid,
) -> Result<(), AppError> {
    let mut portfolio = db::portfolio_queries::fetch_one(&state.pool, portfolio_id)
        .await?
        .ok_or(AppError::NotFound("Portfolio not found".to_string()))?;

    let mut holdings =
        db::holding_queries::fetch_for_portfolio(&state.pool, portfolio_id).await?;

    // Refresh every holding's price and valuation. resolve_price degrades
    // to 0 on source failures, so one bad ticker never aborts the run.
    for h in holdings.iter_mut() {
        let price = state.prices.resolve_price(&h.ticker, h.market).await;
        valuation::update_holding(h, price);
    }

    portfolio_service::recompute_and_persist(&state.pool, &mut portfolio, &mut holdings).await?;

    // Independent of each other; order is immaterial
    let risk = risk_service::compute_risk_metrics(&holdings);
    let sectors = state.sectors.analyze(&holdings);

    let payload = state
        .recommender
        .synthesize(&portfolio, &holdings, &risk, &sectors)
        .await;

    let recommendations =
        serde_json::to_value(&payload).map_err(|e| AppError::External(e.to_string()))?;
    let sector_distribution =
        serde_json::to_value(&sectors).map_err(|e| AppError::External(e.to_string()))?;

    db::analysis_queries::complete(
        &state.pool,
        analysis_id,
        &risk,
        Some(&payload.summary),
        &recommendations,
        &sector_distribution,
    )
    .await?;

    info!("Analysis {} completed", analysis_id);
    Ok(())
}
