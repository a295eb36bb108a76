use std::sync::Arc;

use sea_orm::Database;
use tracing::info;

use stockroom_auth::blacklist::TokenBlacklist;
use stockroom_auth::oidc::OidcValidator;
use stockroom_inventory::config::InventoryConfig;
use stockroom_inventory::router::build_router;
use stockroom_inventory::state::AppState;

#[tokio::main]
async fn main() {
    stockroom_core::tracing::init_tracing();

    let config = InventoryConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let oidc = OidcValidator::new(
        &config.oidc_public_key_pem,
        &config.oidc_issuer,
        &config.oidc_audience,
        &config.oidc_client_id,
    )
    .expect("invalid OIDC configuration");

    let state = AppState {
        db,
        jwt_secret: config.jwt_secret,
        token_ttl_secs: config.jwt_expiration_secs,
        blacklist: Arc::new(TokenBlacklist::new()),
        oidc: Arc::new(oidc),
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.inventory_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("inventory service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
