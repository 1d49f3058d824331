use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// A user's collection of holdings plus cached aggregate figures. The
// aggregates are recomputed from the holdings after every price refresh;
// they are never maintained incrementally.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Portfolio {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub name: String,
    pub description: Option<String>,
    pub total_value: f64,
    pub total_cost: f64,
    pub profit_loss: f64,
    pub profit_rate: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePortfolio {
    pub name: String,
    pub description: Option<String>,
}

impl Portfolio {
    pub(crate) fn new(user_id: uuid::Uuid, name: String, description: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            user_id,
            name,
            description,
            total_value: 0.0,
            total_cost: 0.0,
            profit_loss: 0.0,
            profit_rate: 0.0,
            created_at: chrono::Utc::now(),
        }
    }
}
