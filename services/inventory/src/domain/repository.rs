#![allow(async_fn_in_trait)]

use rust_decimal::Decimal;

use stockroom_domain::pagination::{PageRequest, Sort};
use stockroom_domain::role::Role;

use crate::domain::types::{
    Actor, ApiUser, NewApiUser, NewProduct, Product, ProductSortBy, RevisionFilter, RevisionRecord,
};
use crate::error::InventoryError;

/// Repository for current product records.
///
/// Every mutation appends the matching revision row in the same transaction,
/// attributed to `actor` — callers never write the revision log directly.
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, InventoryError>;

    async fn exists_by_name_ignore_case(&self, name: &str) -> Result<bool, InventoryError>;

    /// Insert and append an ADD revision.
    async fn insert(&self, product: NewProduct, actor: &Actor) -> Result<Product, InventoryError>;

    /// Overwrite all fields and append a MOD revision.
    async fn update(&self, product: Product, actor: &Actor) -> Result<Product, InventoryError>;

    /// Hard-delete and append a DEL revision snapshotting the deleted state.
    async fn delete(&self, product: &Product, actor: &Actor) -> Result<(), InventoryError>;

    async fn list_all(&self) -> Result<Vec<Product>, InventoryError>;

    /// One page plus the unpaged total.
    async fn list_paginated(
        &self,
        page: PageRequest,
        sort_by: ProductSortBy,
        direction: Sort,
    ) -> Result<(Vec<Product>, u64), InventoryError>;

    /// Combined exact-category (case-insensitive) + name-substring filter.
    async fn list_filtered(
        &self,
        category: Option<&str>,
        name: Option<&str>,
        page: PageRequest,
    ) -> Result<(Vec<Product>, u64), InventoryError>;

    /// Case-insensitive substring name search.
    async fn search_by_name(&self, name: &str) -> Result<Vec<Product>, InventoryError>;

    /// Exact-match category, case-insensitive.
    async fn find_by_category(&self, category: &str) -> Result<Vec<Product>, InventoryError>;

    /// Inclusive price range.
    async fn find_by_price_range(
        &self,
        min_price: Decimal,
        max_price: Decimal,
    ) -> Result<Vec<Product>, InventoryError>;

    /// stock > 0 AND minimum_stock IS NOT NULL AND stock <= minimum_stock.
    async fn find_low_stock(&self) -> Result<Vec<Product>, InventoryError>;

    /// stock = 0.
    async fn find_out_of_stock(&self) -> Result<Vec<Product>, InventoryError>;

    /// Distinct categories, sorted.
    async fn list_categories(&self) -> Result<Vec<String>, InventoryError>;

    async fn count(&self) -> Result<u64, InventoryError>;
}

/// Read-only access to the append-only revision log.
pub trait RevisionRepository: Send + Sync {
    /// Matching revisions, newest first (revision number descending).
    async fn list(&self, filter: &RevisionFilter) -> Result<Vec<RevisionRecord>, InventoryError>;

    /// One product's full history, oldest first.
    async fn list_for_product(
        &self,
        product_id: i64,
    ) -> Result<Vec<RevisionRecord>, InventoryError>;
}

/// Repository for self-registered API accounts.
pub trait ApiUserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<ApiUser>, InventoryError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<ApiUser>, InventoryError>;

    async fn exists_by_username(&self, username: &str) -> Result<bool, InventoryError>;

    async fn insert(&self, user: NewApiUser) -> Result<ApiUser, InventoryError>;

    async fn list_all(&self) -> Result<Vec<ApiUser>, InventoryError>;

    async fn update_role(&self, id: i64, role: Role) -> Result<(), InventoryError>;
}
