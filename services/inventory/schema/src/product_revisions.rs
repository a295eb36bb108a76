use sea_orm::entity::prelude::*;

/// Append-only revision log. One row per product mutation, written in the
/// same transaction as the mutation itself, carrying the full field snapshot
/// as of that revision.
///
/// `product_id` is deliberately not a foreign key: revisions outlive the
/// product rows they describe (DEL revisions reference an id that no longer
/// exists in `products`).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "product_revisions")]
pub struct Model {
    /// Globally shared monotone revision number.
    #[sea_orm(primary_key)]
    pub rev: i64,
    pub product_id: i64,
    /// 0 = ADD, 1 = MOD, 2 = DEL.
    pub change_type: i16,
    pub recorded_at: chrono::DateTime<chrono::Utc>,
    pub username: String,
    pub user_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,
    pub stock: i32,
    pub minimum_stock: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
