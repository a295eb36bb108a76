//! In-memory fakes shared by the unit tests in this crate.

use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use chrono::Utc;
use rust_decimal::Decimal;

use stockroom_domain::revision::ChangeType;
use stockroom_domain::role::Role;

use crate::domain::repository::{ApiUserRepository, RevisionRepository};
use crate::domain::types::{ApiUser, NewApiUser, ProductSnapshot, RevisionFilter, RevisionRecord};
use crate::error::InventoryError;

pub fn snapshot(name: &str, stock: i32) -> ProductSnapshot {
    ProductSnapshot {
        name: name.to_owned(),
        description: None,
        category: "tools".to_owned(),
        price: Decimal::new(999, 2),
        stock,
        minimum_stock: None,
    }
}

pub fn revision(
    rev: i64,
    product_id: i64,
    change_type: ChangeType,
    username: &str,
    snapshot: ProductSnapshot,
) -> RevisionRecord {
    RevisionRecord {
        rev,
        product_id,
        change_type,
        username: username.to_owned(),
        user_id: None,
        recorded_at: Utc::now(),
        snapshot,
    }
}

/// Filtering fake with the same matching semantics as the SQL repository.
pub struct InMemoryRevisionRepo {
    pub records: Vec<RevisionRecord>,
}

impl InMemoryRevisionRepo {
    pub fn new(records: Vec<RevisionRecord>) -> Self {
        Self { records }
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
}

impl RevisionRepository for InMemoryRevisionRepo {
    async fn list(&self, filter: &RevisionFilter) -> Result<Vec<RevisionRecord>, InventoryError> {
        let mut records: Vec<RevisionRecord> = self
            .records
            .iter()
            .filter(|r| Self::matches(r, filter))
            .cloned()
            .collect();
        records.sort_by_key(|r| std::cmp::Reverse(r.rev));
        Ok(records)
    }

    async fn list_for_product(
        &self,
        product_id: i64,
    ) -> Result<Vec<RevisionRecord>, InventoryError> {
        let mut records: Vec<RevisionRecord> = self
            .records
            .iter()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.rev);
        Ok(records)
    }
}

/// Shared-state account store for the auth usecase tests.
#[derive(Clone)]
pub struct InMemoryApiUserRepo {
    users: Arc<Mutex<Vec<ApiUser>>>,
}

impl InMemoryApiUserRepo {
    pub fn empty() -> Self {
        Self {
            users: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn disable(&self, username: &str) {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.username == username) {
            user.enabled = false;
        }
    }
}

impl ApiUserRepository for InMemoryApiUserRepo {
    async fn find_by_id(&self, id: i64) -> Result<Option<ApiUser>, InventoryError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<ApiUser>, InventoryError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, InventoryError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .any(|u| u.username == username))
    }

    async fn insert(&self, user: NewApiUser) -> Result<ApiUser, InventoryError> {
        let mut users = self.users.lock().unwrap();
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
        Ok(self.users.lock().unwrap().clone())
    }

    async fn update_role(&self, id: i64, role: Role) -> Result<(), InventoryError> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            user.role = role;
        }
        Ok(())
    }
}

/// Always errors, for exercising the swallow-to-empty policy.
pub struct FailingRevisionRepo;

impl RevisionRepository for FailingRevisionRepo {
    async fn list(&self, _filter: &RevisionFilter) -> Result<Vec<RevisionRecord>, InventoryError> {
        Err(InventoryError::Internal(anyhow!("revision store down")))
    }

    async fn list_for_product(
        &self,
        _product_id: i64,
    ) -> Result<Vec<RevisionRecord>, InventoryError> {
        Err(InventoryError::Internal(anyhow!("revision store down")))
    }
}
