use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use portfolioai_backend::app;
use portfolioai_backend::config::Config;
use portfolioai_backend::external::krx::KrxProvider;
use portfolioai_backend::external::yahoo::YahooProvider;
use portfolioai_backend::logging::{self, LoggingConfig};
use portfolioai_backend::services::price_service::PriceService;
use portfolioai_backend::services::recommendation_service::RecommendationService;
use portfolioai_backend::services::sector_service::SectorAnalyzer;
use portfolioai_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    logging::init_logging(LoggingConfig::from_env())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let prices = Arc::new(PriceService::new(
        Arc::new(KrxProvider::new()),
        Arc::new(YahooProvider::new()),
    ));
    let sectors = Arc::new(SectorAnalyzer::default());
    let recommender = Arc::new(RecommendationService::from_config(&config));

    let bind_addr = config.bind_addr.clone();
    let state = AppState {
        pool,
        prices,
        sectors,
        recommender,
        config: Arc::new(config),
    };

    let app = app::create_app(state);

    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("PortfolioAI backend running at http://{}/", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
