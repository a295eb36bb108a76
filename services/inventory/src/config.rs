/// Inventory service configuration loaded from environment variables.
#[derive(Debug)]
pub struct InventoryConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 8081). Env var: `INVENTORY_PORT`.
    pub inventory_port: u16,
    /// HS256 secret for self-issued tokens.
    pub jwt_secret: String,
    /// Lifetime of self-issued tokens in seconds (default 86400).
    pub jwt_expiration_secs: u64,
    /// Expected `iss` claim of provider tokens.
    pub oidc_issuer: String,
    /// Expected `aud` claim of provider tokens.
    pub oidc_audience: String,
    /// Client whose `resource_access` roles are honored.
    pub oidc_client_id: String,
    /// Provider RSA public key, SPKI PEM.
    pub oidc_public_key_pem: String,
}

impl InventoryConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            inventory_port: std::env::var("INVENTORY_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8081),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            jwt_expiration_secs: std::env::var("JWT_EXPIRATION_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(86_400),
            oidc_issuer: std::env::var("OIDC_ISSUER").expect("OIDC_ISSUER"),
            oidc_audience: std::env::var("OIDC_AUDIENCE").expect("OIDC_AUDIENCE"),
            oidc_client_id: std::env::var("OIDC_CLIENT_ID").expect("OIDC_CLIENT_ID"),
            oidc_public_key_pem: std::env::var("OIDC_PUBLIC_KEY_PEM").expect("OIDC_PUBLIC_KEY_PEM"),
        }
    }
}
