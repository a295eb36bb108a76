use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};
use tower_http::trace::TraceLayer;

use stockroom_core::health::{healthz, readyz};
use stockroom_core::middleware::request_id_layer;

use crate::handlers::{admin, audit, auth, debug, inventory, product};
use crate::state::AppState;

/// Route table. The two identity schemes are selected purely by path prefix:
/// `/api/auth` and `/api/inventory` extract [`ApiIdentity`] (self-issued JWT),
/// everything else under `/api` extracts [`SsoIdentity`] (delegated SSO).
///
/// [`ApiIdentity`]: stockroom_auth::identity::ApiIdentity
/// [`SsoIdentity`]: stockroom_auth::identity::SsoIdentity
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Products (delegated SSO)
        .route("/api/products", post(product::create_product))
        .route("/api/products", get(product::list_products))
        .route("/api/products/paginated", get(product::list_products_paginated))
        .route("/api/products/search", get(product::search_products))
        .route("/api/products/categories", get(product::list_categories))
        .route("/api/products/price-range", get(product::products_by_price_range))
        .route("/api/products/stats", get(product::product_stats))
        .route("/api/products/filters", get(product::products_filtered))
        .route("/api/products/count", get(product::product_count))
        .route("/api/products/health", get(product::product_health))
        .route("/api/products/low-stock", get(product::low_stock_products))
        .route("/api/products/out-of-stock", get(product::out_of_stock_products))
        .route("/api/products/category/{category}", get(product::products_by_category))
        .route("/api/products/{id}", get(product::get_product))
        .route("/api/products/{id}", put(product::update_product))
        .route("/api/products/{id}", delete(product::delete_product))
        .route("/api/products/{id}/stock", patch(product::update_product_stock))
        .route("/api/products/{id}/history", get(product::product_history))
        .route("/api/products/{id}/history/{revision}", get(product::product_at_revision))
        .route("/api/products/{id}/revisions", get(product::product_revisions))
        // Inventory (self-issued JWT)
        .route("/api/inventory/products", post(inventory::create_product))
        .route("/api/inventory/products", get(inventory::list_products))
        .route("/api/inventory/products/paginated", get(inventory::list_products_paginated))
        .route("/api/inventory/products/search", get(inventory::search_products))
        .route("/api/inventory/products/low-stock", get(inventory::low_stock_products))
        .route("/api/inventory/products/out-of-stock", get(inventory::out_of_stock_products))
        .route("/api/inventory/products/price-range", get(inventory::products_by_price_range))
        .route("/api/inventory/products/category/{category}", get(inventory::products_by_category))
        .route("/api/inventory/products/{id}", get(inventory::get_product))
        .route("/api/inventory/products/{id}", put(inventory::update_product))
        .route("/api/inventory/products/{id}", delete(inventory::delete_product))
        .route("/api/inventory/products/{id}/stock", patch(inventory::update_product_stock))
        .route("/api/inventory/categories", get(inventory::list_categories))
        .route("/api/inventory/stock/movement", post(inventory::record_stock_movement))
        .route("/api/inventory/movements", get(inventory::list_movements))
        .route("/api/inventory/statistics", get(inventory::inventory_statistics))
        .route("/api/inventory/dashboard", get(inventory::inventory_dashboard))
        .route("/api/inventory/health", get(inventory::inventory_health))
        // Auth (self-issued JWT; register/login are public)
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh", post(auth::refresh))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/logout", post(auth::logout))
        // Admin (delegated SSO, ADMIN)
        .route("/api/admin/users", get(admin::list_users))
        .route("/api/admin/users", post(admin::create_user))
        .route("/api/admin/users/{id}/role", put(admin::update_user_role))
        .route("/api/admin/dashboard", get(admin::admin_dashboard))
        // Audit (delegated SSO)
        .route("/api/auditoria/products", get(audit::audit_listing))
        .route("/api/auditoria/products/stock-movements", get(audit::stock_movements))
        .route("/api/auditoria/products/export", get(audit::export_audit_csv))
        .route("/api/auditoria/products/stats", get(audit::audit_statistics))
        .route(
            "/api/auditoria/products/{product_id}/revision/{revision}/changes",
            get(audit::revision_changes),
        )
        .route("/api/auditoria/products/{product_id}/history", get(audit::product_audit_history))
        // Debug (delegated SSO)
        .route("/api/debug/user-info", get(debug::user_info))
        .route("/api/debug/roles", get(debug::roles))
        .route("/api/debug/test-admin", get(debug::test_admin))
        .route("/api/debug/test-user", get(debug::test_user))
        .route("/api/debug/test-visitor", get(debug::test_visitor))
        .route("/api/debug/test-any-role", get(debug::test_any_role))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
