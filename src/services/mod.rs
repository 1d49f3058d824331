pub mod analysis_service;
pub mod auth_service;
pub mod failure_cache;
pub mod portfolio_service;
pub mod price_service;
pub mod recommendation_service;
pub mod risk_service;
pub mod sector_service;
pub mod valuation;
