//! `/api/auth` — registration, login, and session management for the
//! self-issued token scheme. Register and login are public; the rest require
//! a valid self-issued bearer token.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
};
use serde::{Deserialize, Serialize};

use stockroom_auth::identity::ApiIdentity;
use stockroom_domain::role::Role;

use crate::domain::types::ApiUser;
use crate::error::InventoryError;
use crate::state::AppState;
use crate::usecase::user::{
    AuthSession, GetCurrentUserUseCase, LoginInput, LoginUseCase, LogoutUseCase,
    RefreshTokenUseCase, RegisterUserInput, RegisterUserUseCase,
};

// ── Request / response shapes ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub role: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
}

impl SessionResponse {
    fn new(session: AuthSession, expires_in: u64) -> Self {
        Self {
            id: session.user.id,
            username: session.user.username,
            role: session.user.role,
            email: session.user.email,
            full_name: session.user.full_name,
            token: session.token,
            token_type: "Bearer",
            expires_in,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfoResponse {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub enabled: bool,
}

impl From<ApiUser> for UserInfoResponse {
    fn from(user: ApiUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            email: user.email,
            full_name: user.full_name,
            enabled: user.enabled,
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

// ── POST /api/auth/register ──────────────────────────────────────────────────

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), InventoryError> {
    let role = Role::from_name(&body.role).ok_or(InventoryError::InvalidRole)?;
    let usecase = RegisterUserUseCase {
        repo: state.api_user_repo(),
        jwt_secret: state.jwt_secret.clone(),
        token_ttl_secs: state.token_ttl_secs,
        blacklist: Arc::clone(&state.blacklist),
    };
    let session = usecase
        .execute(RegisterUserInput {
            username: body.username,
            password: body.password,
            role,
            email: body.email,
            full_name: body.full_name,
        })
        .await?;
    tracing::info!(username = %session.user.username, "api user registered");
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse::new(session, state.token_ttl_secs)),
    ))
}

// ── POST /api/auth/login ─────────────────────────────────────────────────────

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, InventoryError> {
    let usecase = LoginUseCase {
        repo: state.api_user_repo(),
        jwt_secret: state.jwt_secret.clone(),
        token_ttl_secs: state.token_ttl_secs,
        blacklist: Arc::clone(&state.blacklist),
    };
    let session = usecase
        .execute(LoginInput {
            username: body.username,
            password: body.password,
        })
        .await?;
    tracing::info!(username = %session.user.username, "api user authenticated");
    Ok(Json(SessionResponse::new(session, state.token_ttl_secs)))
}

// ── POST /api/auth/refresh ───────────────────────────────────────────────────

pub async fn refresh(
    identity: ApiIdentity,
    State(state): State<AppState>,
) -> Result<Json<SessionResponse>, InventoryError> {
    let usecase = RefreshTokenUseCase {
        repo: state.api_user_repo(),
        jwt_secret: state.jwt_secret.clone(),
        token_ttl_secs: state.token_ttl_secs,
        blacklist: Arc::clone(&state.blacklist),
    };
    let session = usecase.execute(&identity.username).await?;
    Ok(Json(SessionResponse::new(session, state.token_ttl_secs)))
}

// ── GET /api/auth/me ─────────────────────────────────────────────────────────

pub async fn me(
    identity: ApiIdentity,
    State(state): State<AppState>,
) -> Result<Json<UserInfoResponse>, InventoryError> {
    let usecase = GetCurrentUserUseCase {
        repo: state.api_user_repo(),
    };
    let user = usecase.execute(&identity.username).await?;
    Ok(Json(user.into()))
}

// ── POST /api/auth/logout ────────────────────────────────────────────────────

pub async fn logout(
    identity: ApiIdentity,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> StatusCode {
    // The extractor already proved a bearer token is present and valid.
    if let Some(token) = bearer_token(&headers) {
        let usecase = LogoutUseCase {
            blacklist: Arc::clone(&state.blacklist),
        };
        usecase.execute(&identity.username, token);
    }
    StatusCode::NO_CONTENT
}
