//! Request identity and the per-scheme axum extractors.

use axum::Json;
use axum::extract::FromRequestParts;
use axum::response::{IntoResponse, Response};
use http::request::Parts;
use http::{StatusCode, header};

use stockroom_domain::role::Role;

use crate::blacklist::TokenBlacklist;
use crate::oidc::OidcValidator;
use crate::token::{AuthError, validate_token};

/// Authenticated caller, whichever scheme produced it.
#[derive(Debug, Clone)]
pub struct Identity {
    pub username: String,
    /// Numeric actor id when the scheme supplies one (SSO subjects); the
    /// self-issued scheme identifies callers by username only.
    pub user_id: Option<i64>,
    pub role: Role,
}

/// What the self-issued extractor needs from application state.
pub trait SelfIssuedAuthState {
    fn jwt_secret(&self) -> &str;
    fn blacklist(&self) -> &TokenBlacklist;
}

/// What the SSO extractor needs from application state.
pub trait SsoAuthState {
    fn oidc(&self) -> &OidcValidator;
}

/// Authentication failure body: `{error, message, path, timestamp}`.
#[derive(Debug)]
pub struct AuthRejection {
    pub status: StatusCode,
    pub error: &'static str,
    pub message: &'static str,
    pub path: String,
}

impl AuthRejection {
    fn unauthorized(error: &'static str, message: &'static str, path: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error,
            message,
            path: path.to_owned(),
        }
    }

    fn from_auth_error(err: AuthError, path: &str) -> Self {
        match err {
            AuthError::Expired => {
                Self::unauthorized("TOKEN_EXPIRED", "bearer token has expired", path)
            }
            AuthError::WrongScheme => Self::unauthorized(
                "WRONG_TOKEN_TYPE",
                "token was not issued for this endpoint",
                path,
            ),
            AuthError::InvalidSignature | AuthError::Malformed => {
                Self::unauthorized("TOKEN_INVALID", "bearer token is invalid", path)
            }
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.error,
            "message": self.message,
            "path": self.path,
            "timestamp": chrono::Utc::now()
                .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        });
        (self.status, Json(body)).into_response()
    }
}

fn bearer_token<'a>(parts: &'a Parts) -> Option<&'a str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Caller authenticated by the self-issued JWT scheme (`/api/auth`,
/// `/api/inventory`). Rejects missing, invalid, expired, revoked, and
/// foreign-issuer tokens with the structured failure body.
#[derive(Debug, Clone)]
pub struct ApiIdentity(pub Identity);

impl std::ops::Deref for ApiIdentity {
    type Target = Identity;

    fn deref(&self) -> &Identity {
        &self.0
    }
}

impl<S> FromRequestParts<S> for ApiIdentity
where
    S: SelfIssuedAuthState + Send + Sync,
{
    type Rejection = AuthRejection;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // Extraction is synchronous anyway; resolve everything up front and return
    // a 'static async block so no borrow of `parts`/`state` escapes.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let path = parts.uri.path().to_owned();
        let result = match bearer_token(parts) {
            None => Err(AuthRejection::unauthorized(
                "TOKEN_REQUIRED",
                "bearer token required for this endpoint",
                &path,
            )),
            Some(token) => match validate_token(token, state.jwt_secret()) {
                Err(err) => Err(AuthRejection::from_auth_error(err, &path)),
                Ok(info) if state.blacklist().is_revoked(token) => {
                    tracing::debug!(username = %info.username, "revoked token presented");
                    Err(AuthRejection::unauthorized(
                        "TOKEN_REVOKED",
                        "bearer token has been revoked",
                        &path,
                    ))
                }
                Ok(info) => Ok(Self(Identity {
                    username: info.username,
                    user_id: None,
                    role: info.role,
                })),
            },
        };
        async move { result }
    }
}

/// Caller authenticated by the delegated-SSO scheme (`/api/products`,
/// `/api/admin`, `/api/auditoria`, `/api/debug`).
#[derive(Debug, Clone)]
pub struct SsoIdentity(pub Identity);

impl std::ops::Deref for SsoIdentity {
    type Target = Identity;

    fn deref(&self) -> &Identity {
        &self.0
    }
}

impl<S> FromRequestParts<S> for SsoIdentity
where
    S: SsoAuthState + Send + Sync,
{
    type Rejection = AuthRejection;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let path = parts.uri.path().to_owned();
        let result = match bearer_token(parts) {
            None => Err(AuthRejection::unauthorized(
                "TOKEN_REQUIRED",
                "bearer token required for this endpoint",
                &path,
            )),
            Some(token) => match state.oidc().validate(token) {
                Err(err) => Err(AuthRejection::from_auth_error(err, &path)),
                Ok(info) => Ok(Self(Identity {
                    username: info.username,
                    user_id: info.user_id,
                    role: info.role,
                })),
            },
        };
        async move { result }
    }
}
