use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Which market-data source a ticker is quoted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Market {
    Domestic,
    Foreign,
}

// One position within a portfolio. current_price through weight are derived
// fields, owned by the valuation/aggregation pass.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Holding {
    pub id: uuid::Uuid,
    pub portfolio_id: uuid::Uuid,
    pub ticker: String,
    pub name: Option<String>,
    pub market: Market,
    pub sector: Option<String>,
    pub quantity: i32,
    pub avg_price: f64,
    pub current_price: f64,
    pub market_value: f64,
    pub profit_loss: f64,
    pub profit_rate: f64,
    pub weight: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateHolding {
    pub ticker: String,
    pub name: Option<String>,
    pub market: Market,
    pub sector: Option<String>,
    pub quantity: i32,
    pub avg_price: f64,
}

impl Holding {
    pub(crate) fn new(portfolio_id: uuid::Uuid, input: CreateHolding) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            portfolio_id,
            ticker: input.ticker,
            name: input.name,
            market: input.market,
            sector: input.sector,
            quantity: input.quantity,
            avg_price: input.avg_price,
            current_price: 0.0,
            market_value: 0.0,
            profit_loss: 0.0,
            profit_rate: 0.0,
            weight: 0.0,
            created_at: chrono::Utc::now(),
        }
    }
}
