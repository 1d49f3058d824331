use crate::models::Portfolio;
use sqlx::PgPool;
use uuid::Uuid;

const COLUMNS: &str =
    "id, user_id, name, description, total_value, total_cost, profit_loss, profit_rate, created_at";

pub async fn fetch_all_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<Portfolio>, sqlx::Error> {
    sqlx::query_as::<_, Portfolio>(&format!(
        "SELECT {COLUMNS} FROM portfolios
         WHERE user_id = $1
         ORDER BY created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Fetch a portfolio only when it belongs to the given user. Ownership
/// violations are indistinguishable from absence.
pub async fn fetch_owned(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
) -> Result<Option<Portfolio>, sqlx::Error> {
    sqlx::query_as::<_, Portfolio>(&format!(
        "SELECT {COLUMNS} FROM portfolios WHERE id = $1 AND user_id = $2"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Option<Portfolio>, sqlx::Error> {
    sqlx::query_as::<_, Portfolio>(&format!(
        "SELECT {COLUMNS} FROM portfolios WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn insert(pool: &PgPool, input: Portfolio) -> Result<Portfolio, sqlx::Error> {
    sqlx::query_as::<_, Portfolio>(&format!(
        "INSERT INTO portfolios (id, user_id, name, description, created_at)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {COLUMNS}"
    ))
    .bind(input.id)
    .bind(input.user_id)
    .bind(input.name)
    .bind(input.description)
    .bind(input.created_at)
    .fetch_one(pool)
    .await
}

pub async fn update_totals(pool: &PgPool, portfolio: &Portfolio) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE portfolios
         SET total_value = $1, total_cost = $2, profit_loss = $3, profit_rate = $4
         WHERE id = $5",
    )
    .bind(portfolio.total_value)
    .bind(portfolio.total_cost)
    .bind(portfolio.profit_loss)
    .bind(portfolio.profit_rate)
    .bind(portfolio.id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM portfolios WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
