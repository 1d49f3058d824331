use crate::models::Holding;
use sqlx::PgPool;
use uuid::Uuid;

const COLUMNS: &str = "id, portfolio_id, ticker, name, market, sector, quantity, avg_price, \
                       current_price, market_value, profit_loss, profit_rate, weight, created_at";

pub async fn fetch_for_portfolio(
    pool: &PgPool,
    portfolio_id: Uuid,
) -> Result<Vec<Holding>, sqlx::Error> {
    sqlx::query_as::<_, Holding>(&format!(
        "SELECT {COLUMNS} FROM holdings
         WHERE portfolio_id = $1
         ORDER BY created_at ASC"
    ))
    .bind(portfolio_id)
    .fetch_all(pool)
    .await
}

pub async fn insert(pool: &PgPool, input: Holding) -> Result<Holding, sqlx::Error> {
    sqlx::query_as::<_, Holding>(&format!(
        "INSERT INTO holdings (id, portfolio_id, ticker, name, market, sector, quantity,
                               avg_price, current_price, market_value, profit_loss,
                               profit_rate, weight, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
         RETURNING {COLUMNS}"
    ))
    .bind(input.id)
    .bind(input.portfolio_id)
    .bind(input.ticker)
    .bind(input.name)
    .bind(input.market)
    .bind(input.sector)
    .bind(input.quantity)
    .bind(input.avg_price)
    .bind(input.current_price)
    .bind(input.market_value)
    .bind(input.profit_loss)
    .bind(input.profit_rate)
    .bind(input.weight)
    .bind(input.created_at)
    .fetch_one(pool)
    .await
}

/// Persist the derived valuation fields for a batch of holdings in one
/// transaction, so a poll never observes a half-updated portfolio.
pub async fn update_valuations(pool: &PgPool, holdings: &[Holding]) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    for h in holdings {
        sqlx::query(
            "UPDATE holdings
             SET current_price = $1, market_value = $2, profit_loss = $3,
                 profit_rate = $4, weight = $5
             WHERE id = $6",
        )
        .bind(h.current_price)
        .bind(h.market_value)
        .bind(h.profit_loss)
        .bind(h.profit_rate)
        .bind(h.weight)
        .bind(h.id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}
