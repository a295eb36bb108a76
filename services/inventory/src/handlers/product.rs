//! `/api/products` — product CRUD and queries behind the delegated-SSO scheme.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockroom_auth::identity::SsoIdentity;
use stockroom_domain::pagination::{Page, PageRequest, Sort};
use stockroom_domain::role::Role;
use stockroom_domain::stock::StockStatus;

use crate::domain::types::{NewProduct, Product, ProductPatch, ProductSortBy};
use crate::error::InventoryError;
use crate::handlers::actor_of;
use crate::state::AppState;
use crate::usecase::audit::{AuditQueries, AuditRecord, RevisionSnapshotView};
use crate::usecase::product::{
    BrowseProductsUseCase, CreateProductUseCase, DeleteProductUseCase, GetProductUseCase,
    ProductStats, ProductStatsUseCase, UpdateProductUseCase, UpdateStockUseCase,
};

// ── Request / response shapes ────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price: Decimal,
    pub stock: i32,
    pub minimum_stock: Option<i32>,
    pub low_stock: bool,
    pub out_of_stock: bool,
    pub stock_status: StockStatus,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            low_stock: product.is_low_stock(),
            out_of_stock: product.is_out_of_stock(),
            stock_status: product.stock_status(),
            id: product.id,
            name: product.name,
            description: product.description,
            category: product.category,
            price: product.price,
            stock: product.stock,
            minimum_stock: product.minimum_stock,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub stock: i32,
    pub stock_status: StockStatus,
}

impl From<Product> for ProductSummary {
    fn from(product: Product) -> Self {
        Self {
            stock_status: product.stock_status(),
            id: product.id,
            name: product.name,
            category: product.category,
            price: product.price,
            stock: product.stock,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price: Decimal,
    pub stock: i32,
    pub minimum_stock: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub minimum_stock: Option<i32>,
}

impl From<UpdateProductRequest> for ProductPatch {
    fn from(body: UpdateProductRequest) -> Self {
        Self {
            name: body.name,
            description: body.description,
            category: body.category,
            price: body.price,
            stock: body.stock,
            minimum_stock: body.minimum_stock,
        }
    }
}

/// The `reason` is accepted here and intentionally goes nowhere.
#[derive(Debug, Deserialize)]
pub struct StockUpdateRequest {
    pub stock: i32,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationQuery {
    #[serde(default)]
    pub page: u64,
    pub size: Option<u64>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
}

impl PaginationQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.size.unwrap_or(10))
    }

    pub(crate) fn sort(&self) -> (ProductSortBy, Sort) {
        let sort_by = self
            .sort_by
            .as_deref()
            .map(ProductSortBy::from_name)
            .unwrap_or_default();
        let direction = match self.sort_dir.as_deref() {
            Some(dir) if dir.eq_ignore_ascii_case("desc") => Sort::Desc,
            _ => Sort::Asc,
        };
        (sort_by, direction)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterQuery {
    pub category: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub page: u64,
    pub size: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeQuery {
    pub min_price: Decimal,
    pub max_price: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub name: String,
}

pub(crate) fn normalized(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

// ── POST /api/products ───────────────────────────────────────────────────────

pub async fn create_product(
    identity: SsoIdentity,
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

// ── GET /api/products ────────────────────────────────────────────────────────

pub async fn list_products(
    _identity: SsoIdentity,
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductSummary>>, InventoryError> {
    let usecase = BrowseProductsUseCase {
        repo: state.product_repo(),
    };
    let products = usecase.all().await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

// ── GET /api/products/paginated ──────────────────────────────────────────────

pub async fn list_products_paginated(
    _identity: SsoIdentity,
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

// ── GET /api/products/{id} ───────────────────────────────────────────────────

pub async fn get_product(
    _identity: SsoIdentity,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProductResponse>, InventoryError> {
    let usecase = GetProductUseCase {
        repo: state.product_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}

// ── PUT /api/products/{id} ───────────────────────────────────────────────────

pub async fn update_product(
    identity: SsoIdentity,
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
    let product = usecase
        .execute(id, body.into(), &actor_of(&identity))
        .await?;
    Ok(Json(product.into()))
}

// ── DELETE /api/products/{id} ────────────────────────────────────────────────

pub async fn delete_product(
    identity: SsoIdentity,
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

// ── PATCH /api/products/{id}/stock ───────────────────────────────────────────

pub async fn update_product_stock(
    identity: SsoIdentity,
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

// ── GET /api/products/search?name= ───────────────────────────────────────────

pub async fn search_products(
    _identity: SsoIdentity,
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<ProductSummary>>, InventoryError> {
    let usecase = BrowseProductsUseCase {
        repo: state.product_repo(),
    };
    let products = usecase.search(&query.name).await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

// ── GET /api/products/category/{category} ────────────────────────────────────

pub async fn products_by_category(
    _identity: SsoIdentity,
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<ProductSummary>>, InventoryError> {
    let usecase = BrowseProductsUseCase {
        repo: state.product_repo(),
    };
    let products = usecase.by_category(&category).await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

// ── GET /api/products/low-stock / out-of-stock ───────────────────────────────

pub async fn low_stock_products(
    _identity: SsoIdentity,
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, InventoryError> {
    let usecase = BrowseProductsUseCase {
        repo: state.product_repo(),
    };
    let products = usecase.low_stock().await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

pub async fn out_of_stock_products(
    _identity: SsoIdentity,
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, InventoryError> {
    let usecase = BrowseProductsUseCase {
        repo: state.product_repo(),
    };
    let products = usecase.out_of_stock().await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

// ── GET /api/products/categories ─────────────────────────────────────────────

pub async fn list_categories(
    _identity: SsoIdentity,
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, InventoryError> {
    let usecase = BrowseProductsUseCase {
        repo: state.product_repo(),
    };
    Ok(Json(usecase.categories().await?))
}

// ── GET /api/products/price-range ────────────────────────────────────────────

pub async fn products_by_price_range(
    _identity: SsoIdentity,
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

// ── GET /api/products/stats ──────────────────────────────────────────────────

pub async fn product_stats(
    _identity: SsoIdentity,
    State(state): State<AppState>,
) -> Result<Json<ProductStats>, InventoryError> {
    let usecase = ProductStatsUseCase {
        repo: state.product_repo(),
    };
    Ok(Json(usecase.execute().await?))
}

// ── GET /api/products/filters ────────────────────────────────────────────────

pub async fn products_filtered(
    _identity: SsoIdentity,
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<Page<ProductSummary>>, InventoryError> {
    let usecase = BrowseProductsUseCase {
        repo: state.product_repo(),
    };
    let category = normalized(query.category);
    let name = normalized(query.name);
    let page = usecase
        .filtered(
            category.as_deref(),
            name.as_deref(),
            PageRequest::new(query.page, query.size.unwrap_or(10)),
        )
        .await?;
    Ok(Json(map_page(page)))
}

// ── GET /api/products/count ──────────────────────────────────────────────────

pub async fn product_count(
    _identity: SsoIdentity,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, InventoryError> {
    let usecase = BrowseProductsUseCase {
        repo: state.product_repo(),
    };
    Ok(Json(serde_json::json!({ "count": usecase.count().await? })))
}

// ── GET /api/products/health ─────────────────────────────────────────────────

pub async fn product_health(_identity: SsoIdentity) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "UP",
        "service": "products",
        "timestamp": Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
    }))
}

// ── GET /api/products/{id}/history ───────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub page: u64,
    pub size: Option<u64>,
}

pub async fn product_history(
    _identity: SsoIdentity,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<HistoryQuery>,
) -> Json<Page<AuditRecord>> {
    let queries = AuditQueries {
        repo: state.revision_repo(),
    };
    let page = queries
        .product_history(id, PageRequest::new(query.page, query.size.unwrap_or(10)))
        .await;
    Json(page)
}

// ── GET /api/products/{id}/history/{revision} ────────────────────────────────

pub async fn product_at_revision(
    _identity: SsoIdentity,
    State(state): State<AppState>,
    Path((id, revision)): Path<(i64, i64)>,
) -> Result<Json<RevisionSnapshotView>, InventoryError> {
    let queries = AuditQueries {
        repo: state.revision_repo(),
    };
    queries
        .product_at_revision(id, revision)
        .await
        .map(Json)
        .ok_or(InventoryError::ProductNotFound)
}

// ── GET /api/products/{id}/revisions ─────────────────────────────────────────

pub async fn product_revisions(
    _identity: SsoIdentity,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Json<Vec<i64>> {
    let queries = AuditQueries {
        repo: state.revision_repo(),
    };
    Json(queries.revision_numbers(id).await)
}

pub(crate) fn map_page(page: Page<Product>) -> Page<ProductSummary> {
    Page {
        content: page.content.into_iter().map(Into::into).collect(),
        page: page.page,
        size: page.size,
        total_elements: page.total_elements,
        total_pages: page.total_pages,
    }
}
