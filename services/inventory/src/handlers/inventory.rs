//! `/api/inventory` — the same inventory operations behind the self-issued
//! token scheme, plus relative stock movements and the dashboard payloads.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_auth::identity::ApiIdentity;
use stockroom_domain::pagination::Page;
use stockroom_domain::role::Role;

use crate::domain::types::{InventoryMovement, MovementDirection, NewProduct, ProductPatch};
use crate::error::InventoryError;
use crate::handlers::actor_of;
use crate::handlers::product::{
    CreateProductRequest, PaginationQuery, PriceRangeQuery, ProductResponse, ProductSummary,
    SearchQuery, StockUpdateRequest, UpdateProductRequest, map_page,
};
use crate::state::AppState;
use crate::usecase::movement::{MovementFilter, MovementQueries};
use crate::usecase::product::{
    BrowseProductsUseCase, CreateProductUseCase, DeleteProductUseCase, GetProductUseCase,
    ProductStats, ProductStatsUseCase, RecordStockMovementUseCase, UpdateProductUseCase,
    UpdateStockUseCase,
};

// ── Products CRUD ────────────────────────────────────────────────────────────

pub async fn create_product(
    identity: ApiIdentity,
    State(state): State<AppState>,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), InventoryError> {
    if !identity.role.can_write() {
        return Err(InventoryError::Forbidden);
    }
    let usecase = CreateProductUseCase {
        repo: state.product_repo(),
    };
    let product = usecase
        .execute(
            NewProduct {
                name: body.name,
                description: body.description,
                category: body.category,
                price: body.price,
                stock: body.stock,
                minimum_stock: body.minimum_stock,
            },
            &actor_of(&identity),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

pub async fn list_products(
    _identity: ApiIdentity,
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductSummary>>, InventoryError> {
    let usecase = BrowseProductsUseCase {
        repo: state.product_repo(),
    };
    let products = usecase.all().await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

pub async fn list_products_paginated(
    _identity: ApiIdentity,
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<Page<ProductSummary>>, InventoryError> {
    let usecase = BrowseProductsUseCase {
        repo: state.product_repo(),
    };
    let (sort_by, direction) = query.sort();
    let page = usecase
        .paginated(query.page_request(), sort_by, direction)
        .await?;
    Ok(Json(map_page(page)))
}

pub async fn get_product(
    _identity: ApiIdentity,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProductResponse>, InventoryError> {
    let usecase = GetProductUseCase {
        repo: state.product_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}

pub async fn update_product(
    identity: ApiIdentity,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, InventoryError> {
    if !identity.role.can_write() {
        return Err(InventoryError::Forbidden);
    }
    let usecase = UpdateProductUseCase {
        repo: state.product_repo(),
    };
    let patch: ProductPatch = body.into();
    let product = usecase.execute(id, patch, &actor_of(&identity)).await?;
    Ok(Json(product.into()))
}

pub async fn delete_product(
    identity: ApiIdentity,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, InventoryError> {
    if !identity.role.can_write() {
        return Err(InventoryError::Forbidden);
    }
    let usecase = DeleteProductUseCase {
        repo: state.product_repo(),
    };
    usecase.execute(id, &actor_of(&identity)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_product_stock(
    identity: ApiIdentity,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<StockUpdateRequest>,
) -> Result<Json<ProductResponse>, InventoryError> {
    if identity.role < Role::Admin {
        return Err(InventoryError::Forbidden);
    }
    let usecase = UpdateStockUseCase {
        repo: state.product_repo(),
    };
    let product = usecase
        .execute(id, body.stock, body.reason, &actor_of(&identity))
        .await?;
    Ok(Json(product.into()))
}

// ── Product queries ──────────────────────────────────────────────────────────

pub async fn search_products(
    _identity: ApiIdentity,
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<ProductSummary>>, InventoryError> {
    let usecase = BrowseProductsUseCase {
        repo: state.product_repo(),
    };
    let products = usecase.search(&query.name).await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

pub async fn products_by_category(
    _identity: ApiIdentity,
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<ProductSummary>>, InventoryError> {
    let usecase = BrowseProductsUseCase {
        repo: state.product_repo(),
    };
    let products = usecase.by_category(&category).await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

pub async fn products_by_price_range(
    _identity: ApiIdentity,
    State(state): State<AppState>,
    Query(query): Query<PriceRangeQuery>,
) -> Result<Json<Vec<ProductSummary>>, InventoryError> {
    let usecase = BrowseProductsUseCase {
        repo: state.product_repo(),
    };
    let products = usecase
        .by_price_range(query.min_price, query.max_price)
        .await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

pub async fn low_stock_products(
    _identity: ApiIdentity,
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, InventoryError> {
    let usecase = BrowseProductsUseCase {
        repo: state.product_repo(),
    };
    let products = usecase.low_stock().await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

pub async fn out_of_stock_products(
    _identity: ApiIdentity,
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, InventoryError> {
    let usecase = BrowseProductsUseCase {
        repo: state.product_repo(),
    };
    let products = usecase.out_of_stock().await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

pub async fn list_categories(
    _identity: ApiIdentity,
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, InventoryError> {
    let usecase = BrowseProductsUseCase {
        repo: state.product_repo(),
    };
    Ok(Json(usecase.categories().await?))
}

// ── POST /api/inventory/stock/movement ───────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovementRequest {
    pub product_id: i64,
    pub movement_type: MovementDirection,
    pub quantity: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovementResponse {
    pub message: &'static str,
    pub product: ProductResponse,
    pub timestamp: String,
}

pub async fn record_stock_movement(
    identity: ApiIdentity,
    State(state): State<AppState>,
    Json(body): Json<StockMovementRequest>,
) -> Result<Json<StockMovementResponse>, InventoryError> {
    if !identity.role.can_write() {
        return Err(InventoryError::Forbidden);
    }
    let usecase = RecordStockMovementUseCase {
        repo: state.product_repo(),
    };
    let product = usecase
        .execute(
            body.product_id,
            body.movement_type,
            body.quantity,
            &actor_of(&identity),
        )
        .await?;
    Ok(Json(StockMovementResponse {
        message: "stock movement recorded",
        product: product.into(),
        timestamp: Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
    }))
}

// ── GET /api/inventory/movements ─────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementQuery {
    pub product_id: Option<i64>,
    pub username: Option<String>,
    pub direction: Option<MovementDirection>,
    pub date_from: Option<NaiveDateTime>,
    pub date_to: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementResponse {
    pub revision: i64,
    pub product_id: i64,
    pub product_name: String,
    pub movement_type: MovementDirection,
    pub quantity: i32,
    pub previous_stock: i32,
    pub new_stock: i32,
    pub username: String,
    pub user_id: Option<i64>,
    #[serde(serialize_with = "stockroom_core::serde::to_rfc3339_ms")]
    pub movement_date: chrono::DateTime<Utc>,
}

impl From<InventoryMovement> for MovementResponse {
    fn from(m: InventoryMovement) -> Self {
        Self {
            revision: m.rev,
            product_id: m.product_id,
            product_name: m.product_name,
            movement_type: m.direction,
            quantity: m.quantity,
            previous_stock: m.previous_stock,
            new_stock: m.new_stock,
            username: m.username,
            user_id: m.user_id,
            movement_date: m.moved_at,
        }
    }
}

pub async fn list_movements(
    _identity: ApiIdentity,
    State(state): State<AppState>,
    Query(query): Query<MovementQuery>,
) -> Result<Json<Vec<MovementResponse>>, InventoryError> {
    let queries = MovementQueries {
        repo: state.revision_repo(),
    };
    let movements = queries
        .list(&MovementFilter {
            product_id: query.product_id,
            username: query.username,
            direction: query.direction,
            date_from: query.date_from.map(|dt| dt.and_utc()),
            date_to: query.date_to.map(|dt| dt.and_utc()),
        })
        .await?;
    Ok(Json(movements.into_iter().map(Into::into).collect()))
}

// ── GET /api/inventory/statistics ────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsResponse {
    #[serde(flatten)]
    pub stats: ProductStats,
    pub timestamp: String,
}

pub async fn inventory_statistics(
    _identity: ApiIdentity,
    State(state): State<AppState>,
) -> Result<Json<StatisticsResponse>, InventoryError> {
    let usecase = ProductStatsUseCase {
        repo: state.product_repo(),
    };
    Ok(Json(StatisticsResponse {
        stats: usecase.execute().await?,
        timestamp: Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
    }))
}

// ── GET /api/inventory/dashboard ─────────────────────────────────────────────

pub async fn inventory_dashboard(
    _identity: ApiIdentity,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, InventoryError> {
    let stats_usecase = ProductStatsUseCase {
        repo: state.product_repo(),
    };
    let browse = BrowseProductsUseCase {
        repo: state.product_repo(),
    };

    let stats = stats_usecase.execute().await?;
    let low_stock: Vec<ProductResponse> = browse
        .low_stock()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let out_of_stock: Vec<ProductResponse> = browse
        .out_of_stock()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let categories = browse.categories().await?;

    let alerts = serde_json::json!({
        "lowStockCount": low_stock.len(),
        "outOfStockCount": out_of_stock.len(),
        "criticalAlerts": low_stock.len() + out_of_stock.len(),
    });
    Ok(Json(serde_json::json!({
        "statistics": stats,
        "lowStockProducts": low_stock,
        "outOfStockProducts": out_of_stock,
        "categories": categories,
        "alerts": alerts,
        "timestamp": Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
    })))
}

// ── GET /api/inventory/health ────────────────────────────────────────────────

pub async fn inventory_health(_identity: ApiIdentity) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "UP",
        "service": "inventory",
        "timestamp": Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
    }))
}
