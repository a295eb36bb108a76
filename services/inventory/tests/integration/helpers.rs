//! Shared in-memory store backing the repository traits, so usecase flows can
//! be exercised end-to-end: product mutations append revisions exactly like
//! the SQL repositories, and the audit queries read them back.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use rust_decimal::Decimal;

use stockroom_domain::pagination::{PageRequest, Sort};
use stockroom_domain::revision::ChangeType;
use stockroom_domain::role::Role;

use stockroom_inventory::domain::repository::{
    ApiUserRepository, ProductRepository, RevisionRepository,
};
use stockroom_inventory::domain::types::{
    Actor, ApiUser, NewApiUser, NewProduct, Product, ProductSnapshot, ProductSortBy,
    RevisionFilter, RevisionRecord,
};
use stockroom_inventory::error::InventoryError;

pub fn actor(username: &str) -> Actor {
    Actor {
        username: username.to_owned(),
        user_id: None,
    }
}

pub fn new_product(name: &str, price: &str, stock: i32, minimum_stock: Option<i32>) -> NewProduct {
    NewProduct {
        name: name.to_owned(),
        description: None,
        category: "tools".to_owned(),
        price: price.parse::<Decimal>().unwrap(),
        stock,
        minimum_stock,
    }
}

#[derive(Default)]
struct StoreInner {
    products: Vec<Product>,
    revisions: Vec<RevisionRecord>,
    next_id: i64,
    next_rev: i64,
}

/// Process-local stand-in for the database; hand out repo views with
/// `product_repo()` / `revision_repo()` / `api user` equivalents.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Mutex<StoreInner>>,
    users: Arc<Mutex<Vec<ApiUser>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn product_repo(&self) -> StoreProductRepo {
        StoreProductRepo {
            store: self.clone(),
        }
    }

    pub fn revision_repo(&self) -> StoreRevisionRepo {
        StoreRevisionRepo {
            store: self.clone(),
        }
    }

    pub fn user_repo(&self) -> StoreUserRepo {
        StoreUserRepo {
            store: self.clone(),
        }
    }

    pub fn revision_count(&self) -> usize {
        self.inner.lock().unwrap().revisions.len()
    }

    fn append_revision(
        inner: &mut StoreInner,
        product: &Product,
        change_type: ChangeType,
        actor: &Actor,
    ) {
        inner.next_rev += 1;
        inner.revisions.push(RevisionRecord {
            rev: inner.next_rev,
            product_id: product.id,
            change_type,
            username: actor.username.clone(),
            user_id: actor.user_id,
            recorded_at: Utc::now(),
            snapshot: ProductSnapshot::from(product),
        });
    }
}

// ── ProductRepository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct StoreProductRepo {
    store: InMemoryStore,
}

impl ProductRepository for StoreProductRepo {
    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, InventoryError> {
        let inner = self.store.inner.lock().unwrap();
        Ok(inner.products.iter().find(|p| p.id == id).cloned())
    }

    async fn exists_by_name_ignore_case(&self, name: &str) -> Result<bool, InventoryError> {
        let inner = self.store.inner.lock().unwrap();
        Ok(inner
            .products
            .iter()
            .any(|p| p.name.to_lowercase() == name.to_lowercase()))
    }

    async fn insert(&self, product: NewProduct, actor: &Actor) -> Result<Product, InventoryError> {
        let mut inner = self.store.inner.lock().unwrap();
        inner.next_id += 1;
        let created = Product {
            id: inner.next_id,
            name: product.name,
            description: product.description,
            category: product.category,
            price: product.price,
            stock: product.stock,
            minimum_stock: product.minimum_stock,
        };
        inner.products.push(created.clone());
        InMemoryStore::append_revision(&mut inner, &created, ChangeType::Add, actor);
        Ok(created)
    }

    async fn update(&self, product: Product, actor: &Actor) -> Result<Product, InventoryError> {
        let mut inner = self.store.inner.lock().unwrap();
        let slot = inner
            .products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or(InventoryError::ProductNotFound)?;
        *slot = product.clone();
        InMemoryStore::append_revision(&mut inner, &product, ChangeType::Mod, actor);
        Ok(product)
    }

    async fn delete(&self, product: &Product, actor: &Actor) -> Result<(), InventoryError> {
        let mut inner = self.store.inner.lock().unwrap();
        inner.products.retain(|p| p.id != product.id);
        InMemoryStore::append_revision(&mut inner, product, ChangeType::Del, actor);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Product>, InventoryError> {
        Ok(self.store.inner.lock().unwrap().products.clone())
    }

    async fn list_paginated(
        &self,
        page: PageRequest,
        sort_by: ProductSortBy,
        direction: Sort,
    ) -> Result<(Vec<Product>, u64), InventoryError> {
        let page = page.clamped();
        let mut products = self.store.inner.lock().unwrap().products.clone();
        products.sort_by(|a, b| {
            let ord = match sort_by {
                ProductSortBy::Id => a.id.cmp(&b.id),
                ProductSortBy::Name => a.name.cmp(&b.name),
                ProductSortBy::Category => a.category.cmp(&b.category),
                ProductSortBy::Price => a.price.cmp(&b.price),
                ProductSortBy::Stock => a.stock.cmp(&b.stock),
            };
            match direction {
                Sort::Asc => ord,
                Sort::Desc => ord.reverse(),
            }
        });
        let total = products.len() as u64;
        let content = products
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.size as usize)
            .collect();
        Ok((content, total))
    }

    async fn list_filtered(
        &self,
        category: Option<&str>,
        name: Option<&str>,
        page: PageRequest,
    ) -> Result<(Vec<Product>, u64), InventoryError> {
        let page = page.clamped();
        let mut products = self.store.inner.lock().unwrap().products.clone();
        if let Some(category) = category {
            products.retain(|p| p.category.to_lowercase() == category.to_lowercase());
        }
        if let Some(name) = name {
            products.retain(|p| p.name.to_lowercase().contains(&name.to_lowercase()));
        }
        products.sort_by(|a, b| a.name.cmp(&b.name));
        let total = products.len() as u64;
        let content = products
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.size as usize)
            .collect();
        Ok((content, total))
    }

    async fn search_by_name(&self, name: &str) -> Result<Vec<Product>, InventoryError> {
        let needle = name.to_lowercase();
        let inner = self.store.inner.lock().unwrap();
        Ok(inner
            .products
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn find_by_category(&self, category: &str) -> Result<Vec<Product>, InventoryError> {
        let inner = self.store.inner.lock().unwrap();
        Ok(inner
            .products
            .iter()
            .filter(|p| p.category.to_lowercase() == category.to_lowercase())
            .cloned()
            .collect())
    }

    async fn find_by_price_range(
        &self,
        min_price: Decimal,
        max_price: Decimal,
    ) -> Result<Vec<Product>, InventoryError> {
        let inner = self.store.inner.lock().unwrap();
        Ok(inner
            .products
            .iter()
            .filter(|p| p.price >= min_price && p.price <= max_price)
            .cloned()
            .collect())
    }

    async fn find_low_stock(&self) -> Result<Vec<Product>, InventoryError> {
        let inner = self.store.inner.lock().unwrap();
        Ok(inner
            .products
            .iter()
            .filter(|p| {
                p.stock > 0 && p.minimum_stock.is_some_and(|min| p.stock <= min)
            })
            .cloned()
            .collect())
    }

    async fn find_out_of_stock(&self) -> Result<Vec<Product>, InventoryError> {
        let inner = self.store.inner.lock().unwrap();
        Ok(inner
            .products
            .iter()
            .filter(|p| p.stock == 0)
            .cloned()
            .collect())
    }

    async fn list_categories(&self) -> Result<Vec<String>, InventoryError> {
        let inner = self.store.inner.lock().unwrap();
        let mut categories: Vec<String> =
            inner.products.iter().map(|p| p.category.clone()).collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    async fn count(&self) -> Result<u64, InventoryError> {
        Ok(self.store.inner.lock().unwrap().products.len() as u64)
    }
}

// ── RevisionRepository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct StoreRevisionRepo {
    store: InMemoryStore,
}

fn matches(record: &RevisionRecord, filter: &RevisionFilter) -> bool {
    if let Some(ref name) = filter.product_name {
        if !record
            .snapshot
            .name
            .to_lowercase()
            .contains(&name.to_lowercase())
        {
            return false;
        }
    }
    if let Some(ref username) = filter.username {
        if !record
            .username
            .to_lowercase()
            .contains(&username.to_lowercase())
        {
            return false;
        }
    }
    if let Some(change_type) = filter.change_type {
        if record.change_type != change_type {
            return false;
        }
    }
    if let Some(from) = filter.date_from {
        if record.recorded_at < from {
            return false;
        }
    }
    if let Some(to) = filter.date_to {
        if record.recorded_at > to {
            return false;
        }
    }
    true
}

impl RevisionRepository for StoreRevisionRepo {
    async fn list(&self, filter: &RevisionFilter) -> Result<Vec<RevisionRecord>, InventoryError> {
        let inner = self.store.inner.lock().unwrap();
        let mut records: Vec<RevisionRecord> = inner
            .revisions
            .iter()
            .filter(|r| matches(r, filter))
            .cloned()
            .collect();
        records.sort_by_key(|r| std::cmp::Reverse(r.rev));
        Ok(records)
    }

    async fn list_for_product(
        &self,
        product_id: i64,
    ) -> Result<Vec<RevisionRecord>, InventoryError> {
        let inner = self.store.inner.lock().unwrap();
        let mut records: Vec<RevisionRecord> = inner
            .revisions
            .iter()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.rev);
        Ok(records)
    }
}

// ── ApiUserRepository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct StoreUserRepo {
    store: InMemoryStore,
}

impl StoreUserRepo {
    pub fn disable(&self, username: &str) {
        let mut users = self.store.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.username == username) {
            user.enabled = false;
        }
    }
}

impl ApiUserRepository for StoreUserRepo {
    async fn find_by_id(&self, id: i64) -> Result<Option<ApiUser>, InventoryError> {
        let users = self.store.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<ApiUser>, InventoryError> {
        let users = self.store.users.lock().unwrap();
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, InventoryError> {
        let users = self.store.users.lock().unwrap();
        Ok(users.iter().any(|u| u.username == username))
    }

    async fn insert(&self, user: NewApiUser) -> Result<ApiUser, InventoryError> {
        let mut users = self.store.users.lock().unwrap();
        let created = ApiUser {
            id: users.len() as i64 + 1,
            username: user.username,
            password_hash: user.password_hash,
            role: user.role,
            enabled: true,
            email: user.email,
            full_name: user.full_name,
            created_at: Utc::now(),
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn list_all(&self) -> Result<Vec<ApiUser>, InventoryError> {
        Ok(self.store.users.lock().unwrap().clone())
    }

    async fn update_role(&self, id: i64, role: Role) -> Result<(), InventoryError> {
        let mut users = self.store.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            user.role = role;
        }
        Ok(())
    }
}
