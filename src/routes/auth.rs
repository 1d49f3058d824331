use axum::extract::{FromRequestParts, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use http::request::Parts;
use tracing::{error, info};

use crate::db;
use crate::errors::AppError;
use crate::models::{LoginRequest, RegisterRequest, TokenResponse, User, UserProfile};
use crate::services::auth_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
}

/// The authenticated caller, resolved from the bearer token. Any protected
/// handler takes this as an argument.
pub struct AuthUser(pub User);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized)?;

        let user_id = auth_service::decode_token(&state.config.jwt_secret, token)?;

        let user = db::user_queries::fetch_one(&state.pool, user_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(AuthUser(user))
    }
}

#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(data): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    info!("POST /auth/register - Registering {}", data.email);

    if db::user_queries::fetch_by_email(&state.pool, &data.email)
        .await?
        .is_some()
    {
        return Err(AppError::Validation("Email already registered".into()));
    }

    let user = User {
        id: uuid::Uuid::new_v4(),
        email: data.email,
        password_hash: auth_service::hash_password(&data.password)?,
        full_name: data.full_name,
        investment_goal: None,
        risk_tolerance: None,
        created_at: chrono::Utc::now(),
    };
    let user = db::user_queries::insert(&state.pool, user).await.map_err(|e| {
        error!("Failed to insert user: {}", e);
        AppError::Db(e)
    })?;

    let access_token =
        auth_service::create_token(&state.config.jwt_secret, user.id, state.config.jwt_expiry_minutes)?;
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(data): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    info!("POST /auth/login - Login attempt for {}", data.email);

    let user = db::user_queries::fetch_by_email(&state.pool, &data.email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !auth_service::verify_password(&data.password, &user.password_hash) {
        return Err(AppError::Unauthorized);
    }

    let access_token =
        auth_service::create_token(&state.config.jwt_secret, user.id, state.config.jwt_expiry_minutes)?;
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

pub async fn me(AuthUser(user): AuthUser) -> Json<UserProfile> {
    Json(UserProfile::from(user))
}
