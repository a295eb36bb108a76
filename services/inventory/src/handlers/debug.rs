//! `/api/debug` — role-gate smoke endpoints for the delegated-SSO scheme.

use axum::Json;

use stockroom_auth::identity::SsoIdentity;
use stockroom_domain::role::Role;

use crate::error::InventoryError;

// ── GET /api/debug/user-info ─────────────────────────────────────────────────

pub async fn user_info(identity: SsoIdentity) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "username": identity.username,
        "userId": identity.user_id,
        "role": identity.role,
    }))
}

// ── GET /api/debug/roles ─────────────────────────────────────────────────────

pub async fn roles(identity: SsoIdentity) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "role": identity.role,
        "canWrite": identity.role.can_write(),
        "isAdmin": identity.role == Role::Admin,
    }))
}

// ── GET /api/debug/test-* ────────────────────────────────────────────────────

fn granted(scope: &str) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": format!("{scope} access granted") }))
}

pub async fn test_admin(identity: SsoIdentity) -> Result<Json<serde_json::Value>, InventoryError> {
    if identity.role < Role::Admin {
        return Err(InventoryError::Forbidden);
    }
    Ok(granted("admin"))
}

pub async fn test_user(identity: SsoIdentity) -> Result<Json<serde_json::Value>, InventoryError> {
    if identity.role < Role::User {
        return Err(InventoryError::Forbidden);
    }
    Ok(granted("user"))
}

pub async fn test_visitor(_identity: SsoIdentity) -> Json<serde_json::Value> {
    granted("visitor")
}

pub async fn test_any_role(_identity: SsoIdentity) -> Json<serde_json::Value> {
    granted("any-role")
}
