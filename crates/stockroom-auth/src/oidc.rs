//! Delegated-SSO bearer validation.
//!
//! Tokens are accepted only when signature (RS256 against the configured
//! provider key), expiry, issuer, and audience all check out. Roles come
//! from the provider's `realm_access.roles` and
//! `resource_access.<client>.roles` claims, filtered to the three
//! application roles; anything else maps to VISITOR.

use std::collections::HashMap;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;

use stockroom_domain::role::Role;

use crate::token::AuthError;

/// Identity extracted from a validated provider token.
#[derive(Debug, Clone)]
pub struct SsoTokenInfo {
    pub username: String,
    /// Numeric `sub` claims carry through; non-numeric subjects yield `None`.
    pub user_id: Option<i64>,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
struct OidcClaims {
    sub: String,
    preferred_username: Option<String>,
    name: Option<String>,
    #[serde(default)]
    realm_access: RoleSet,
    #[serde(default)]
    resource_access: HashMap<String, RoleSet>,
}

#[derive(Debug, Default, Deserialize)]
struct RoleSet {
    #[serde(default)]
    roles: Vec<String>,
}

/// Validates provider-issued bearer tokens for one issuer/audience pair.
pub struct OidcValidator {
    key: DecodingKey,
    validation: Validation,
    client_id: String,
}

impl OidcValidator {
    /// Build a validator from the provider's RSA public key (SPKI PEM) and
    /// the expected `iss`/`aud` claim values.
    pub fn new(
        public_key_pem: &str,
        issuer: &str,
        audience: &str,
        client_id: &str,
    ) -> Result<Self, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = true;
        validation.required_spec_claims.clear();
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        Ok(Self {
            key: DecodingKey::from_rsa_pem(public_key_pem.as_bytes())?,
            validation,
            client_id: client_id.to_owned(),
        })
    }

    pub fn validate(&self, token: &str) -> Result<SsoTokenInfo, AuthError> {
        let data =
            decode::<OidcClaims>(token, &self.key, &self.validation).map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                jsonwebtoken::errors::ErrorKind::InvalidIssuer
                | jsonwebtoken::errors::ErrorKind::InvalidAudience
                | jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => AuthError::WrongScheme,
                _ => AuthError::Malformed,
            })?;
        let claims = data.claims;

        let client_roles = claims
            .resource_access
            .get(&self.client_id)
            .map(|set| set.roles.as_slice())
            .unwrap_or_default();
        let role = effective_role(
            claims
                .realm_access
                .roles
                .iter()
                .chain(client_roles)
                .map(String::as_str),
        );

        let username = claims
            .preferred_username
            .or(claims.name)
            .unwrap_or_else(|| claims.sub.clone());

        Ok(SsoTokenInfo {
            username,
            user_id: claims.sub.parse().ok(),
            role,
        })
    }
}

/// Reduce a provider's role names to the caller's effective role: the most
/// privileged recognized name wins, and no recognized name means VISITOR.
pub fn effective_role<'a>(names: impl Iterator<Item = &'a str>) -> Role {
    names
        .filter_map(Role::from_name)
        .max()
        .unwrap_or(Role::Visitor)
}
