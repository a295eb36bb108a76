use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use stockroom_domain::revision::ChangeType;
use stockroom_domain::role::Role;
use stockroom_domain::stock::{self, StockStatus};

/// Product record as the service sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price: Decimal,
    pub stock: i32,
    pub minimum_stock: Option<i32>,
}

impl Product {
    pub fn is_low_stock(&self) -> bool {
        stock::low_stock(self.stock, self.minimum_stock)
    }

    pub fn is_out_of_stock(&self) -> bool {
        stock::out_of_stock(self.stock)
    }

    pub fn stock_status(&self) -> StockStatus {
        stock::stock_status(self.stock, self.minimum_stock)
    }
}

/// Fields for a product being created.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price: Decimal,
    pub stock: i32,
    pub minimum_stock: Option<i32>,
}

/// Partial update: only present fields overwrite.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub minimum_stock: Option<i32>,
}

/// Who performed a mutation, as recorded into the revision log.
#[derive(Debug, Clone)]
pub struct Actor {
    pub username: String,
    pub user_id: Option<i64>,
}

impl Actor {
    /// Attribution for mutations with no authenticated caller.
    pub fn system() -> Self {
        Self {
            username: "system".to_owned(),
            user_id: None,
        }
    }
}

/// Full product state captured by one revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSnapshot {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price: Decimal,
    pub stock: i32,
    pub minimum_stock: Option<i32>,
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            price: product.price,
            stock: product.stock,
            minimum_stock: product.minimum_stock,
        }
    }
}

/// One entry of the append-only revision log.
#[derive(Debug, Clone)]
pub struct RevisionRecord {
    pub rev: i64,
    pub product_id: i64,
    pub change_type: ChangeType,
    pub username: String,
    pub user_id: Option<i64>,
    pub recorded_at: DateTime<Utc>,
    pub snapshot: ProductSnapshot,
}

/// Filters shared by the audit listing, export, and stock-movement queries.
#[derive(Debug, Clone, Default)]
pub struct RevisionFilter {
    /// Case-insensitive substring over the snapshot name.
    pub product_name: Option<String>,
    /// Case-insensitive substring over the acting username.
    pub username: Option<String>,
    pub change_type: Option<ChangeType>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

/// Sortable columns for the paginated product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSortBy {
    Id,
    #[default]
    Name,
    Category,
    Price,
    Stock,
}

impl ProductSortBy {
    /// Parse the `sortBy` query value; unknown fields fall back to name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "id" => Self::Id,
            "category" => Self::Category,
            "price" => Self::Price,
            "stock" => Self::Stock,
            _ => Self::Name,
        }
    }
}

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MovementDirection {
    In,
    Out,
}

impl MovementDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::In => "IN",
            Self::Out => "OUT",
        }
    }
}

/// A stock change reconstructed from the revision log.
#[derive(Debug, Clone)]
pub struct InventoryMovement {
    pub rev: i64,
    pub product_id: i64,
    pub product_name: String,
    pub direction: MovementDirection,
    /// Absolute stock delta.
    pub quantity: i32,
    pub previous_stock: i32,
    pub new_stock: i32,
    pub username: String,
    pub user_id: Option<i64>,
    pub moved_at: DateTime<Utc>,
}

/// Account for the self-issued token scheme.
#[derive(Debug, Clone)]
pub struct ApiUser {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub enabled: bool,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields for an account being registered.
#[derive(Debug, Clone)]
pub struct NewApiUser {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub email: Option<String>,
    pub full_name: Option<String>,
}
