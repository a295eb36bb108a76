//! Inventory movement reconstruction.
//!
//! Replays the revision log oldest-first, tracking each product's previous
//! stock level, and emits one movement row per stock change with its
//! direction and absolute quantity. Unlike the audit queries this layer
//! propagates repository errors.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use stockroom_domain::revision::ChangeType;

use crate::domain::repository::RevisionRepository;
use crate::domain::types::{InventoryMovement, MovementDirection, RevisionFilter, RevisionRecord};
use crate::error::InventoryError;

/// Post-replay filters. Replay always runs over the full history so that
/// previous-stock tracking stays correct; filters narrow the output only.
#[derive(Debug, Clone, Default)]
pub struct MovementFilter {
    pub product_id: Option<i64>,
    /// Exact username match.
    pub username: Option<String>,
    pub direction: Option<MovementDirection>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

pub struct MovementQueries<R: RevisionRepository> {
    pub repo: R,
}

impl<R: RevisionRepository> MovementQueries<R> {
    /// Reconstructed stock movements, newest first.
    pub async fn list(
        &self,
        filter: &MovementFilter,
    ) -> Result<Vec<InventoryMovement>, InventoryError> {
        let records = match filter.product_id {
            Some(product_id) => self.repo.list_for_product(product_id).await?,
            None => {
                let mut records = self.repo.list(&RevisionFilter::default()).await?;
                records.reverse();
                records
            }
        };

        let mut movements = replay(&records);
        movements.retain(|m| {
            filter
                .username
                .as_ref()
                .is_none_or(|username| &m.username == username)
                && filter.direction.is_none_or(|d| m.direction == d)
                && filter.date_from.is_none_or(|from| m.moved_at >= from)
                && filter.date_to.is_none_or(|to| m.moved_at <= to)
        });
        movements.reverse();
        Ok(movements)
    }
}

/// Walk revisions oldest-first and emit a movement for every stock change.
/// Creations with zero stock and field-only modifications produce nothing;
/// deletions only clear the tracking state.
fn replay(records: &[RevisionRecord]) -> Vec<InventoryMovement> {
    let mut previous_stock: HashMap<i64, i32> = HashMap::new();
    let mut movements = Vec::new();

    for record in records {
        let stock = record.snapshot.stock;
        match record.change_type {
            ChangeType::Add => {
                if stock > 0 {
                    movements.push(movement(record, 0, stock));
                }
                previous_stock.insert(record.product_id, stock);
            }
            ChangeType::Mod => {
                let previous = previous_stock.get(&record.product_id).copied().unwrap_or(0);
                if stock != previous {
                    movements.push(movement(record, previous, stock));
                }
                previous_stock.insert(record.product_id, stock);
            }
            ChangeType::Del => {
                previous_stock.remove(&record.product_id);
            }
        }
    }
    movements
}

fn movement(record: &RevisionRecord, previous: i32, new: i32) -> InventoryMovement {
    InventoryMovement {
        rev: record.rev,
        product_id: record.product_id,
        product_name: record.snapshot.name.clone(),
        direction: if new > previous {
            MovementDirection::In
        } else {
            MovementDirection::Out
        },
        quantity: (new - previous).abs(),
        previous_stock: previous,
        new_stock: new,
        username: record.username.clone(),
        user_id: record.user_id,
        moved_at: record.recorded_at,
    }
}
