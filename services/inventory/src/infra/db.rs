use anyhow::Context as _;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    sea_query::{Expr, Func},
};

use stockroom_domain::pagination::{PageRequest, Sort};
use stockroom_domain::revision::ChangeType;
use stockroom_domain::role::Role;
use stockroom_inventory_schema::{api_users, product_revisions, products};

use crate::domain::repository::{ApiUserRepository, ProductRepository, RevisionRepository};
use crate::domain::types::{
    Actor, ApiUser, NewApiUser, NewProduct, Product, ProductSnapshot, ProductSortBy,
    RevisionFilter, RevisionRecord,
};
use crate::error::InventoryError;

/// `lower(column) LIKE %lower(needle)%`, the portable case-insensitive match.
fn ilike(column: impl ColumnTrait, needle: &str) -> sea_orm::sea_query::SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column)))
        .like(format!("%{}%", needle.to_lowercase()))
}

fn lower_eq(column: impl ColumnTrait, value: &str) -> sea_orm::sea_query::SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).eq(value.to_lowercase())
}

// ── Product repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProductRepository {
    pub db: DatabaseConnection,
}

impl ProductRepository for DbProductRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, InventoryError> {
        let model = products::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find product by id")?;
        Ok(model.map(product_from_model))
    }

    async fn exists_by_name_ignore_case(&self, name: &str) -> Result<bool, InventoryError> {
        let count = products::Entity::find()
            .filter(lower_eq(products::Column::Name, name))
            .count(&self.db)
            .await
            .context("check product name")?;
        Ok(count > 0)
    }

    async fn insert(&self, product: NewProduct, actor: &Actor) -> Result<Product, InventoryError> {
        let txn = self.db.begin().await.context("begin insert txn")?;

        let model = products::ActiveModel {
            name: Set(product.name),
            description: Set(product.description),
            category: Set(product.category),
            price: Set(product.price),
            stock: Set(product.stock),
            minimum_stock: Set(product.minimum_stock),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .context("insert product")?;

        let created = product_from_model(model);
        revision_model(&created, ChangeType::Add, actor)
            .insert(&txn)
            .await
            .context("append ADD revision")?;

        txn.commit().await.context("commit insert txn")?;
        Ok(created)
    }

    async fn update(&self, product: Product, actor: &Actor) -> Result<Product, InventoryError> {
        let txn = self.db.begin().await.context("begin update txn")?;

        let model = products::ActiveModel {
            id: Set(product.id),
            name: Set(product.name),
            description: Set(product.description),
            category: Set(product.category),
            price: Set(product.price),
            stock: Set(product.stock),
            minimum_stock: Set(product.minimum_stock),
        }
        .update(&txn)
        .await
        .context("update product")?;

        let updated = product_from_model(model);
        revision_model(&updated, ChangeType::Mod, actor)
            .insert(&txn)
            .await
            .context("append MOD revision")?;

        txn.commit().await.context("commit update txn")?;
        Ok(updated)
    }

    async fn delete(&self, product: &Product, actor: &Actor) -> Result<(), InventoryError> {
        let txn = self.db.begin().await.context("begin delete txn")?;

        products::Entity::delete_by_id(product.id)
            .exec(&txn)
            .await
            .context("delete product")?;

        revision_model(product, ChangeType::Del, actor)
            .insert(&txn)
            .await
            .context("append DEL revision")?;

        txn.commit().await.context("commit delete txn")?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Product>, InventoryError> {
        let models = products::Entity::find()
            .order_by_asc(products::Column::Id)
            .all(&self.db)
            .await
            .context("list products")?;
        Ok(models.into_iter().map(product_from_model).collect())
    }

    async fn list_paginated(
        &self,
        page: PageRequest,
        sort_by: ProductSortBy,
        direction: Sort,
    ) -> Result<(Vec<Product>, u64), InventoryError> {
        let page = page.clamped();
        let column = match sort_by {
            ProductSortBy::Id => products::Column::Id,
            ProductSortBy::Name => products::Column::Name,
            ProductSortBy::Category => products::Column::Category,
            ProductSortBy::Price => products::Column::Price,
            ProductSortBy::Stock => products::Column::Stock,
        };

        let total = products::Entity::find()
            .count(&self.db)
            .await
            .context("count products")?;

        let mut query = products::Entity::find();
        query = match direction {
            Sort::Asc => query.order_by_asc(column),
            Sort::Desc => query.order_by_desc(column),
        };
        let models = query
            .offset(page.offset())
            .limit(page.size)
            .all(&self.db)
            .await
            .context("list products page")?;

        Ok((models.into_iter().map(product_from_model).collect(), total))
    }

    async fn list_filtered(
        &self,
        category: Option<&str>,
        name: Option<&str>,
        page: PageRequest,
    ) -> Result<(Vec<Product>, u64), InventoryError> {
        let page = page.clamped();
        let mut query = products::Entity::find();
        if let Some(category) = category {
            query = query.filter(lower_eq(products::Column::Category, category));
        }
        if let Some(name) = name {
            query = query.filter(ilike(products::Column::Name, name));
        }

        let total = query
            .clone()
            .count(&self.db)
            .await
            .context("count filtered products")?;
        let models = query
            .order_by_asc(products::Column::Name)
            .offset(page.offset())
            .limit(page.size)
            .all(&self.db)
            .await
            .context("list filtered products")?;

        Ok((models.into_iter().map(product_from_model).collect(), total))
    }

    async fn search_by_name(&self, name: &str) -> Result<Vec<Product>, InventoryError> {
        let models = products::Entity::find()
            .filter(ilike(products::Column::Name, name))
            .order_by_asc(products::Column::Name)
            .all(&self.db)
            .await
            .context("search products by name")?;
        Ok(models.into_iter().map(product_from_model).collect())
    }

    async fn find_by_category(&self, category: &str) -> Result<Vec<Product>, InventoryError> {
        let models = products::Entity::find()
            .filter(lower_eq(products::Column::Category, category))
            .order_by_asc(products::Column::Name)
            .all(&self.db)
            .await
            .context("find products by category")?;
        Ok(models.into_iter().map(product_from_model).collect())
    }

    async fn find_by_price_range(
        &self,
        min_price: Decimal,
        max_price: Decimal,
    ) -> Result<Vec<Product>, InventoryError> {
        let models = products::Entity::find()
            .filter(products::Column::Price.between(min_price, max_price))
            .order_by_asc(products::Column::Price)
            .all(&self.db)
            .await
            .context("find products by price range")?;
        Ok(models.into_iter().map(product_from_model).collect())
    }

    async fn find_low_stock(&self) -> Result<Vec<Product>, InventoryError> {
        // stock > 0 keeps this disjoint from the out-of-stock query.
        let models = products::Entity::find()
            .filter(products::Column::Stock.gt(0))
            .filter(products::Column::MinimumStock.is_not_null())
            .filter(
                Expr::col(products::Column::Stock).lte(Expr::col(products::Column::MinimumStock)),
            )
            .order_by_asc(products::Column::Stock)
            .all(&self.db)
            .await
            .context("find low-stock products")?;
        Ok(models.into_iter().map(product_from_model).collect())
    }

    async fn find_out_of_stock(&self) -> Result<Vec<Product>, InventoryError> {
        let models = products::Entity::find()
            .filter(products::Column::Stock.eq(0))
            .order_by_asc(products::Column::Name)
            .all(&self.db)
            .await
            .context("find out-of-stock products")?;
        Ok(models.into_iter().map(product_from_model).collect())
    }

    async fn list_categories(&self) -> Result<Vec<String>, InventoryError> {
        let categories = products::Entity::find()
            .select_only()
            .column(products::Column::Category)
            .distinct()
            .order_by_asc(products::Column::Category)
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .context("list categories")?;
        Ok(categories)
    }

    async fn count(&self) -> Result<u64, InventoryError> {
        let count = products::Entity::find()
            .count(&self.db)
            .await
            .context("count products")?;
        Ok(count)
    }
}

fn product_from_model(model: products::Model) -> Product {
    Product {
        id: model.id,
        name: model.name,
        description: model.description,
        category: model.category,
        price: model.price,
        stock: model.stock,
        minimum_stock: model.minimum_stock,
    }
}

fn revision_model(
    product: &Product,
    change_type: ChangeType,
    actor: &Actor,
) -> product_revisions::ActiveModel {
    product_revisions::ActiveModel {
        product_id: Set(product.id),
        change_type: Set(change_type.as_i16()),
        recorded_at: Set(Utc::now()),
        username: Set(actor.username.clone()),
        user_id: Set(actor.user_id),
        name: Set(product.name.clone()),
        description: Set(product.description.clone()),
        category: Set(product.category.clone()),
        price: Set(product.price),
        stock: Set(product.stock),
        minimum_stock: Set(product.minimum_stock),
        ..Default::default()
    }
}

// ── Revision repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRevisionRepository {
    pub db: DatabaseConnection,
}

impl RevisionRepository for DbRevisionRepository {
    async fn list(&self, filter: &RevisionFilter) -> Result<Vec<RevisionRecord>, InventoryError> {
        let mut query = product_revisions::Entity::find();
        if let Some(ref name) = filter.product_name {
            query = query.filter(ilike(product_revisions::Column::Name, name));
        }
        if let Some(ref username) = filter.username {
            query = query.filter(ilike(product_revisions::Column::Username, username));
        }
        if let Some(change_type) = filter.change_type {
            query =
                query.filter(product_revisions::Column::ChangeType.eq(change_type.as_i16()));
        }
        if let Some(from) = filter.date_from {
            query = query.filter(product_revisions::Column::RecordedAt.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(product_revisions::Column::RecordedAt.lte(to));
        }

        let models = query
            .order_by_desc(product_revisions::Column::Rev)
            .all(&self.db)
            .await
            .context("list revisions")?;
        models.into_iter().map(revision_from_model).collect()
    }

    async fn list_for_product(
        &self,
        product_id: i64,
    ) -> Result<Vec<RevisionRecord>, InventoryError> {
        let models = product_revisions::Entity::find()
            .filter(product_revisions::Column::ProductId.eq(product_id))
            .order_by_asc(product_revisions::Column::Rev)
            .all(&self.db)
            .await
            .context("list product revisions")?;
        models.into_iter().map(revision_from_model).collect()
    }
}

fn revision_from_model(model: product_revisions::Model) -> Result<RevisionRecord, InventoryError> {
    let change_type = ChangeType::from_i16(model.change_type)
        .ok_or_else(|| anyhow::anyhow!("unknown change type {}", model.change_type))?;
    Ok(RevisionRecord {
        rev: model.rev,
        product_id: model.product_id,
        change_type,
        username: model.username,
        user_id: model.user_id,
        recorded_at: model.recorded_at,
        snapshot: ProductSnapshot {
            name: model.name,
            description: model.description,
            category: model.category,
            price: model.price,
            stock: model.stock,
            minimum_stock: model.minimum_stock,
        },
    })
}

// ── ApiUser repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbApiUserRepository {
    pub db: DatabaseConnection,
}

impl ApiUserRepository for DbApiUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<ApiUser>, InventoryError> {
        let model = api_users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find api user by id")?;
        model.map(api_user_from_model).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<ApiUser>, InventoryError> {
        let model = api_users::Entity::find()
            .filter(api_users::Column::Username.eq(username))
            .one(&self.db)
            .await
            .context("find api user by username")?;
        model.map(api_user_from_model).transpose()
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, InventoryError> {
        let count = api_users::Entity::find()
            .filter(api_users::Column::Username.eq(username))
            .count(&self.db)
            .await
            .context("check api username")?;
        Ok(count > 0)
    }

    async fn insert(&self, user: NewApiUser) -> Result<ApiUser, InventoryError> {
        let model = api_users::ActiveModel {
            username: Set(user.username),
            password: Set(user.password_hash),
            role: Set(user.role.as_i16()),
            enabled: Set(true),
            email: Set(user.email),
            full_name: Set(user.full_name),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("insert api user")?;
        api_user_from_model(model)
    }

    async fn list_all(&self) -> Result<Vec<ApiUser>, InventoryError> {
        let models = api_users::Entity::find()
            .order_by_asc(api_users::Column::Id)
            .all(&self.db)
            .await
            .context("list api users")?;
        models.into_iter().map(api_user_from_model).collect()
    }

    async fn update_role(&self, id: i64, role: Role) -> Result<(), InventoryError> {
        api_users::ActiveModel {
            id: Set(id),
            role: Set(role.as_i16()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update api user role")?;
        Ok(())
    }
}

fn api_user_from_model(model: api_users::Model) -> Result<ApiUser, InventoryError> {
    let role = Role::from_i16(model.role)
        .ok_or_else(|| anyhow::anyhow!("unknown role {}", model.role))?;
    Ok(ApiUser {
        id: model.id,
        username: model.username,
        password_hash: model.password,
        role,
        enabled: model.enabled,
        email: model.email,
        full_name: model.full_name,
        created_at: model.created_at,
    })
}
