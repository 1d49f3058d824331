use crate::models::User;
use sqlx::PgPool;
use uuid::Uuid;

const COLUMNS: &str =
    "id, email, password_hash, full_name, investment_goal, risk_tolerance, created_at";

pub async fn fetch_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {COLUMNS} FROM users WHERE email = $1"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn insert(pool: &PgPool, input: User) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (id, email, password_hash, full_name, created_at)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {COLUMNS}"
    ))
    .bind(input.id)
    .bind(input.email)
    .bind(input.password_hash)
    .bind(input.full_name)
    .bind(input.created_at)
    .fetch_one(pool)
    .await
}
