//! Self-issued JWT access tokens (HS256).

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use stockroom_domain::role::Role;

/// Issuer claim stamped into every self-issued token. Validation requires it,
/// so a provider-issued token can never pass on the self-issued endpoints.
pub const SELF_ISSUER: &str = "stockroom";

/// Claims payload shared by token issuance and validation.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Username of the account the token was issued to.
    pub sub: String,
    /// Role as its uppercase wire name.
    pub role: Role,
    /// Always [`SELF_ISSUER`].
    pub iss: String,
    /// Expiration timestamp (seconds since UNIX epoch).
    pub exp: u64,
}

/// Identity extracted from a validated self-issued token.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub username: String,
    pub role: Role,
    pub exp: u64,
}

/// Errors returned by token validation, for either scheme.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    /// Structurally valid JWT that was not issued for this scheme
    /// (wrong issuer, audience, or signing algorithm).
    #[error("wrong token type for this endpoint")]
    WrongScheme,
    #[error("malformed token")]
    Malformed,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

/// Sign a new access token for `username`. Returns the token and its `exp`.
pub fn issue_token(
    username: &str,
    role: Role,
    secret: &str,
    expires_in_secs: u64,
) -> Result<(String, u64), jsonwebtoken::errors::Error> {
    let exp = now_secs() + expires_in_secs;
    let claims = TokenClaims {
        sub: username.to_owned(),
        role,
        iss: SELF_ISSUER.to_owned(),
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok((token, exp))
}

/// Decode and validate a self-issued token.
///
/// Validation: HS256, exp checked, required claims `exp` + `sub`, and the
/// issuer must equal [`SELF_ISSUER`]. Default leeway = 60s tolerates clock
/// skew against the issuing process.
pub fn validate_token(token: &str, secret: &str) -> Result<TokenInfo, AuthError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub", "iss"]);
    validation.set_issuer(&[SELF_ISSUER]);

    let data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer
        | jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => AuthError::WrongScheme,
        _ => AuthError::Malformed,
    })?;

    Ok(TokenInfo {
        username: data.claims.sub,
        role: data.claims.role,
        exp: data.claims.exp,
    })
}
