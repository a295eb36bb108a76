use std::sync::Arc;

use sea_orm::DatabaseConnection;

use stockroom_auth::blacklist::TokenBlacklist;
use stockroom_auth::identity::{SelfIssuedAuthState, SsoAuthState};
use stockroom_auth::oidc::OidcValidator;

use crate::infra::db::{DbApiUserRepository, DbProductRepository, DbRevisionRepository};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt_secret: String,
    pub token_ttl_secs: u64,
    pub blacklist: Arc<TokenBlacklist>,
    pub oidc: Arc<OidcValidator>,
}

impl AppState {
    pub fn product_repo(&self) -> DbProductRepository {
        DbProductRepository {
            db: self.db.clone(),
        }
    }

    pub fn revision_repo(&self) -> DbRevisionRepository {
        DbRevisionRepository {
            db: self.db.clone(),
        }
    }

    pub fn api_user_repo(&self) -> DbApiUserRepository {
        DbApiUserRepository {
            db: self.db.clone(),
        }
    }
}

impl SelfIssuedAuthState for AppState {
    fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    fn blacklist(&self) -> &TokenBlacklist {
        &self.blacklist
    }
}

impl SsoAuthState for AppState {
    fn oidc(&self) -> &OidcValidator {
        &self.oidc
    }
}
