pub mod analysis_queries;
pub mod holding_queries;
pub mod portfolio_queries;
pub mod user_queries;
