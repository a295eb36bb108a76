use rust_decimal::Decimal;
use serde::Serialize;

use stockroom_domain::pagination::{Page, PageRequest, Sort};

use crate::domain::repository::ProductRepository;
use crate::domain::types::{
    Actor, MovementDirection, NewProduct, Product, ProductPatch, ProductSortBy,
};
use crate::error::InventoryError;

// ── CreateProduct ────────────────────────────────────────────────────────────

pub struct CreateProductUseCase<R: ProductRepository> {
    pub repo: R,
}

impl<R: ProductRepository> CreateProductUseCase<R> {
    pub async fn execute(
        &self,
        input: NewProduct,
        actor: &Actor,
    ) -> Result<Product, InventoryError> {
        if self.repo.exists_by_name_ignore_case(&input.name).await? {
            return Err(InventoryError::DuplicateProduct);
        }
        self.repo.insert(input, actor).await
    }
}

// ── GetProduct ───────────────────────────────────────────────────────────────

pub struct GetProductUseCase<R: ProductRepository> {
    pub repo: R,
}

impl<R: ProductRepository> GetProductUseCase<R> {
    pub async fn execute(&self, id: i64) -> Result<Product, InventoryError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(InventoryError::ProductNotFound)
    }
}

// ── UpdateProduct ────────────────────────────────────────────────────────────

pub struct UpdateProductUseCase<R: ProductRepository> {
    pub repo: R,
}

impl<R: ProductRepository> UpdateProductUseCase<R> {
    pub async fn execute(
        &self,
        id: i64,
        patch: ProductPatch,
        actor: &Actor,
    ) -> Result<Product, InventoryError> {
        let mut product = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(InventoryError::ProductNotFound)?;

        // The duplicate check only applies to a real rename; writing back the
        // same name (any casing) must not trip over the product itself.
        if let Some(ref new_name) = patch.name {
            if product.name.to_lowercase() != new_name.to_lowercase()
                && self.repo.exists_by_name_ignore_case(new_name).await?
            {
                return Err(InventoryError::DuplicateProduct);
            }
        }

        if let Some(name) = patch.name {
            product.name = name;
        }
        if let Some(description) = patch.description {
            product.description = Some(description);
        }
        if let Some(category) = patch.category {
            product.category = category;
        }
        if let Some(price) = patch.price {
            product.price = price;
        }
        if let Some(stock) = patch.stock {
            product.stock = stock;
        }
        if let Some(minimum_stock) = patch.minimum_stock {
            product.minimum_stock = Some(minimum_stock);
        }

        self.repo.update(product, actor).await
    }
}

// ── DeleteProduct ────────────────────────────────────────────────────────────

pub struct DeleteProductUseCase<R: ProductRepository> {
    pub repo: R,
}

impl<R: ProductRepository> DeleteProductUseCase<R> {
    pub async fn execute(&self, id: i64, actor: &Actor) -> Result<(), InventoryError> {
        let product = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(InventoryError::ProductNotFound)?;
        self.repo.delete(&product, actor).await
    }
}

// ── UpdateStock ──────────────────────────────────────────────────────────────

pub struct UpdateStockUseCase<R: ProductRepository> {
    pub repo: R,
}

impl<R: ProductRepository> UpdateStockUseCase<R> {
    /// Overwrite the stock level. The free-text `reason` is accepted by the
    /// API but not persisted anywhere — it never reaches the revision log.
    pub async fn execute(
        &self,
        id: i64,
        stock: i32,
        _reason: Option<String>,
        actor: &Actor,
    ) -> Result<Product, InventoryError> {
        let mut product = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(InventoryError::ProductNotFound)?;
        product.stock = stock;
        self.repo.update(product, actor).await
    }
}

// ── RecordStockMovement ──────────────────────────────────────────────────────

pub struct RecordStockMovementUseCase<R: ProductRepository> {
    pub repo: R,
}

impl<R: ProductRepository> RecordStockMovementUseCase<R> {
    /// Apply a relative stock movement: IN adds, OUT subtracts and rejects
    /// results below zero.
    pub async fn execute(
        &self,
        product_id: i64,
        direction: MovementDirection,
        quantity: i32,
        actor: &Actor,
    ) -> Result<Product, InventoryError> {
        let mut product = self
            .repo
            .find_by_id(product_id)
            .await?
            .ok_or(InventoryError::ProductNotFound)?;

        let new_stock = match direction {
            MovementDirection::In => product.stock + quantity,
            MovementDirection::Out => {
                let remaining = product.stock - quantity;
                if remaining < 0 {
                    return Err(InventoryError::InsufficientStock);
                }
                remaining
            }
        };

        product.stock = new_stock;
        self.repo.update(product, actor).await
    }
}

// ── BrowseProducts ───────────────────────────────────────────────────────────

/// Read-only product queries shared by both API surfaces.
pub struct BrowseProductsUseCase<R: ProductRepository> {
    pub repo: R,
}

impl<R: ProductRepository> BrowseProductsUseCase<R> {
    pub async fn all(&self) -> Result<Vec<Product>, InventoryError> {
        self.repo.list_all().await
    }

    pub async fn paginated(
        &self,
        page: PageRequest,
        sort_by: ProductSortBy,
        direction: Sort,
    ) -> Result<Page<Product>, InventoryError> {
        let (content, total) = self.repo.list_paginated(page, sort_by, direction).await?;
        Ok(Page::with_total(content, page, total))
    }

    pub async fn filtered(
        &self,
        category: Option<&str>,
        name: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<Product>, InventoryError> {
        let (content, total) = self.repo.list_filtered(category, name, page).await?;
        Ok(Page::with_total(content, page, total))
    }

    pub async fn search(&self, name: &str) -> Result<Vec<Product>, InventoryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(InventoryError::InvalidSearch);
        }
        self.repo.search_by_name(name).await
    }

    pub async fn by_category(&self, category: &str) -> Result<Vec<Product>, InventoryError> {
        self.repo.find_by_category(category).await
    }

    pub async fn by_price_range(
        &self,
        min_price: Decimal,
        max_price: Decimal,
    ) -> Result<Vec<Product>, InventoryError> {
        if min_price < Decimal::ZERO || max_price < Decimal::ZERO || min_price > max_price {
            return Err(InventoryError::InvalidPriceRange);
        }
        self.repo.find_by_price_range(min_price, max_price).await
    }

    pub async fn low_stock(&self) -> Result<Vec<Product>, InventoryError> {
        self.repo.find_low_stock().await
    }

    pub async fn out_of_stock(&self) -> Result<Vec<Product>, InventoryError> {
        self.repo.find_out_of_stock().await
    }

    pub async fn categories(&self) -> Result<Vec<String>, InventoryError> {
        self.repo.list_categories().await
    }

    pub async fn count(&self) -> Result<u64, InventoryError> {
        self.repo.count().await
    }
}

// ── ProductStats ─────────────────────────────────────────────────────────────

/// Aggregate inventory counters.
///
/// `in_stock_products` is `total − out_of_stock` and therefore includes
/// low-stock items; the per-item `stock_status` keeps its three-way split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStats {
    pub total_products: u64,
    pub low_stock_products: u64,
    pub out_of_stock_products: u64,
    pub total_categories: u64,
    pub in_stock_products: u64,
}

pub struct ProductStatsUseCase<R: ProductRepository> {
    pub repo: R,
}

impl<R: ProductRepository> ProductStatsUseCase<R> {
    pub async fn execute(&self) -> Result<ProductStats, InventoryError> {
        let total = self.repo.count().await?;
        let low_stock = self.repo.find_low_stock().await?.len() as u64;
        let out_of_stock = self.repo.find_out_of_stock().await?.len() as u64;
        let categories = self.repo.list_categories().await?.len() as u64;

        Ok(ProductStats {
            total_products: total,
            low_stock_products: low_stock,
            out_of_stock_products: out_of_stock,
            total_categories: categories,
            in_stock_products: total - out_of_stock,
        })
    }
}
