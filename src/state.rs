use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::services::price_service::PriceService;
use crate::services::recommendation_service::RecommendationService;
use crate::services::sector_service::SectorAnalyzer;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub prices: Arc<PriceService>,
    pub sectors: Arc<SectorAnalyzer>,
    pub recommender: Arc<RecommendationService>,
    pub config: Arc<Config>,
}
