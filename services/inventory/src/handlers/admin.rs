//! `/api/admin` — account administration, ADMIN only, delegated-SSO scheme.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::Deserialize;

use stockroom_auth::identity::SsoIdentity;
use stockroom_domain::role::Role;

use crate::error::InventoryError;
use crate::handlers::auth::UserInfoResponse;
use crate::state::AppState;
use crate::usecase::product::ProductStatsUseCase;
use crate::usecase::user::{
    CreateApiUserUseCase, ListApiUsersUseCase, RegisterUserInput, UpdateUserRoleUseCase,
};

fn require_admin(identity: &SsoIdentity) -> Result<(), InventoryError> {
    if identity.role < Role::Admin {
        return Err(InventoryError::Forbidden);
    }
    Ok(())
}

// ── GET /api/admin/users ─────────────────────────────────────────────────────

pub async fn list_users(
    identity: SsoIdentity,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserInfoResponse>>, InventoryError> {
    require_admin(&identity)?;
    let usecase = ListApiUsersUseCase {
        repo: state.api_user_repo(),
    };
    let users = usecase.execute().await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

// ── POST /api/admin/users ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub role: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

pub async fn create_user(
    identity: SsoIdentity,
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserInfoResponse>), InventoryError> {
    require_admin(&identity)?;
    let role = Role::from_name(&body.role).ok_or(InventoryError::InvalidRole)?;
    let usecase = CreateApiUserUseCase {
        repo: state.api_user_repo(),
    };
    let user = usecase
        .execute(RegisterUserInput {
            username: body.username,
            password: body.password,
            role,
            email: body.email,
            full_name: body.full_name,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

// ── PUT /api/admin/users/{id}/role ───────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}

pub async fn update_user_role(
    identity: SsoIdentity,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateRoleRequest>,
) -> Result<Json<UserInfoResponse>, InventoryError> {
    require_admin(&identity)?;
    let role = Role::from_name(&body.role).ok_or(InventoryError::InvalidRole)?;
    let usecase = UpdateUserRoleUseCase {
        repo: state.api_user_repo(),
    };
    let user = usecase.execute(id, role).await?;
    Ok(Json(user.into()))
}

// ── GET /api/admin/dashboard ─────────────────────────────────────────────────

pub async fn admin_dashboard(
    identity: SsoIdentity,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, InventoryError> {
    require_admin(&identity)?;
    let stats = ProductStatsUseCase {
        repo: state.product_repo(),
    }
    .execute()
    .await?;
    let users = ListApiUsersUseCase {
        repo: state.api_user_repo(),
    }
    .execute()
    .await?;

    Ok(Json(serde_json::json!({
        "productStats": stats,
        "apiUserCount": users.len(),
        "timestamp": Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
    })))
}
