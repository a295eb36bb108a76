//! Derived stock-level classification.
//!
//! Never stored: computed from `stock` and `minimum_stock` on the way out.

use serde::{Deserialize, Serialize};

/// Three-way stock classification for a single product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

/// stock == 0. A product with no stock is out of stock regardless of its
/// minimum threshold.
pub fn out_of_stock(stock: i32) -> bool {
    stock == 0
}

/// stock > 0 and at or below the configured minimum. Products without a
/// minimum threshold are never low-stock. Disjoint from [`out_of_stock`].
pub fn low_stock(stock: i32, minimum_stock: Option<i32>) -> bool {
    stock > 0 && minimum_stock.is_some_and(|min| stock <= min)
}

/// Classify, with OUT_OF_STOCK taking priority over LOW_STOCK.
pub fn stock_status(stock: i32, minimum_stock: Option<i32>) -> StockStatus {
    if out_of_stock(stock) {
        StockStatus::OutOfStock
    } else if low_stock(stock, minimum_stock) {
        StockStatus::LowStock
    } else {
        StockStatus::InStock
    }
}
