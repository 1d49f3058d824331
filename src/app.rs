use axum::Router;
use http::header::HeaderValue;
use tower_http::cors::{Any, CorsLayer};

use crate::routes::{analyses, auth, health, holdings, portfolios};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(
            state
                .config
                .frontend_url
                .parse::<HeaderValue>()
                .expect("FRONTEND_URL is not a valid origin"),
        )
        .allow_methods(Any)
        .allow_headers(Any);

    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/auth", auth::router())
        .nest("/api/portfolios", portfolios::router())
        .nest("/api/portfolios/:portfolio_id/holdings", holdings::router())
        .nest("/api/portfolios/:portfolio_id/analyze", analyses::router())
        .layer(cors)
        .with_state(state)
}
