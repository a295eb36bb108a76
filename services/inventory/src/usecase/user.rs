//! Account registration, login, and session management for the self-issued
//! token scheme, plus the admin user-management operations.

use std::sync::Arc;

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use stockroom_auth::blacklist::TokenBlacklist;
use stockroom_auth::token::issue_token;
use stockroom_domain::role::Role;

use crate::domain::repository::ApiUserRepository;
use crate::domain::types::{ApiUser, NewApiUser};
use crate::error::InventoryError;

/// Hash a password using argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String, InventoryError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| InventoryError::Internal(anyhow::anyhow!("hash password: {e}")))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored argon2id hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, InventoryError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| InventoryError::Internal(anyhow::anyhow!("parse password hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Issued token plus the account it belongs to.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: ApiUser,
    pub token: String,
    /// Expiration as seconds since the UNIX epoch.
    pub token_expires_at: u64,
}

fn open_session(
    user: ApiUser,
    jwt_secret: &str,
    token_ttl_secs: u64,
    blacklist: &TokenBlacklist,
) -> Result<AuthSession, InventoryError> {
    let (token, token_expires_at) = issue_token(&user.username, user.role, jwt_secret, token_ttl_secs)
        .map_err(|e| InventoryError::Internal(e.into()))?;
    // One active token per user: whoever held the slot gets revoked.
    blacklist.set_active_token(&user.username, &token);
    Ok(AuthSession {
        user,
        token,
        token_expires_at,
    })
}

// ── RegisterUser ─────────────────────────────────────────────────────────────

pub struct RegisterUserInput {
    pub username: String,
    pub password: String,
    pub role: Role,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

pub struct RegisterUserUseCase<R: ApiUserRepository> {
    pub repo: R,
    pub jwt_secret: String,
    pub token_ttl_secs: u64,
    pub blacklist: Arc<TokenBlacklist>,
}

impl<R: ApiUserRepository> RegisterUserUseCase<R> {
    pub async fn execute(&self, input: RegisterUserInput) -> Result<AuthSession, InventoryError> {
        if self.repo.exists_by_username(&input.username).await? {
            return Err(InventoryError::UsernameAlreadyExists);
        }
        let user = self
            .repo
            .insert(NewApiUser {
                username: input.username,
                password_hash: hash_password(&input.password)?,
                role: input.role,
                email: input.email,
                full_name: input.full_name,
            })
            .await?;
        open_session(user, &self.jwt_secret, self.token_ttl_secs, &self.blacklist)
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub username: String,
    pub password: String,
}

pub struct LoginUseCase<R: ApiUserRepository> {
    pub repo: R,
    pub jwt_secret: String,
    pub token_ttl_secs: u64,
    pub blacklist: Arc<TokenBlacklist>,
}

impl<R: ApiUserRepository> LoginUseCase<R> {
    pub async fn execute(&self, input: LoginInput) -> Result<AuthSession, InventoryError> {
        let user = self
            .repo
            .find_by_username(&input.username)
            .await?
            .ok_or(InventoryError::InvalidCredentials)?;
        if !user.enabled {
            return Err(InventoryError::UserDisabled);
        }
        if !verify_password(&input.password, &user.password_hash)? {
            return Err(InventoryError::InvalidCredentials);
        }
        open_session(user, &self.jwt_secret, self.token_ttl_secs, &self.blacklist)
    }
}

// ── RefreshToken ─────────────────────────────────────────────────────────────

pub struct RefreshTokenUseCase<R: ApiUserRepository> {
    pub repo: R,
    pub jwt_secret: String,
    pub token_ttl_secs: u64,
    pub blacklist: Arc<TokenBlacklist>,
}

impl<R: ApiUserRepository> RefreshTokenUseCase<R> {
    /// Issue a fresh token for an already-authenticated caller. The presented
    /// token is superseded and lands on the blacklist.
    pub async fn execute(&self, username: &str) -> Result<AuthSession, InventoryError> {
        let user = self
            .repo
            .find_by_username(username)
            .await?
            .ok_or(InventoryError::InvalidToken)?;
        if !user.enabled {
            return Err(InventoryError::UserDisabled);
        }
        open_session(user, &self.jwt_secret, self.token_ttl_secs, &self.blacklist)
    }
}

// ── CurrentUser / Logout ─────────────────────────────────────────────────────

pub struct GetCurrentUserUseCase<R: ApiUserRepository> {
    pub repo: R,
}

impl<R: ApiUserRepository> GetCurrentUserUseCase<R> {
    pub async fn execute(&self, username: &str) -> Result<ApiUser, InventoryError> {
        self.repo
            .find_by_username(username)
            .await?
            .ok_or(InventoryError::UserNotFound)
    }
}

pub struct LogoutUseCase {
    pub blacklist: Arc<TokenBlacklist>,
}

impl LogoutUseCase {
    /// Revoke the user's active token and the presented one (they differ if
    /// the caller logged in again elsewhere since).
    pub fn execute(&self, username: &str, presented_token: &str) {
        self.blacklist.clear_active_token(username);
        self.blacklist.revoke(presented_token);
    }
}

// ── Admin operations ─────────────────────────────────────────────────────────

pub struct ListApiUsersUseCase<R: ApiUserRepository> {
    pub repo: R,
}

impl<R: ApiUserRepository> ListApiUsersUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<ApiUser>, InventoryError> {
        self.repo.list_all().await
    }
}

/// Admin-created account: same uniqueness rules as self-registration but no
/// session is opened for it.
pub struct CreateApiUserUseCase<R: ApiUserRepository> {
    pub repo: R,
}

impl<R: ApiUserRepository> CreateApiUserUseCase<R> {
    pub async fn execute(&self, input: RegisterUserInput) -> Result<ApiUser, InventoryError> {
        if self.repo.exists_by_username(&input.username).await? {
            return Err(InventoryError::UsernameAlreadyExists);
        }
        self.repo
            .insert(NewApiUser {
                username: input.username,
                password_hash: hash_password(&input.password)?,
                role: input.role,
                email: input.email,
                full_name: input.full_name,
            })
            .await
    }
}

pub struct UpdateUserRoleUseCase<R: ApiUserRepository> {
    pub repo: R,
}

impl<R: ApiUserRepository> UpdateUserRoleUseCase<R> {
    pub async fn execute(&self, id: i64, role: Role) -> Result<ApiUser, InventoryError> {
        let user = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(InventoryError::UserNotFound)?;
        self.repo.update_role(user.id, role).await?;
        Ok(ApiUser { role, ..user })
    }
}
