//! Audit queries over the append-only revision log.
//!
//! Answers "what changed, when, by whom" by replaying and filtering revision
//! snapshots; no separate diff table exists. Every public method swallows
//! repository errors and returns an empty result — callers cannot tell "no
//! matching records" from "query failed".

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use stockroom_domain::pagination::{Page, PageRequest, Sort, SortSpec};
use stockroom_domain::revision::ChangeType;

use crate::domain::repository::RevisionRepository;
use crate::domain::types::{ProductSnapshot, RevisionFilter, RevisionRecord};
use crate::error::InventoryError;

// ── Result shapes ────────────────────────────────────────────────────────────

/// One row of the audit listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub revision: i64,
    pub product_id: i64,
    pub product_name: String,
    pub rev_type: i16,
    pub operation: &'static str,
    pub username: String,
    pub user_id: Option<i64>,
    #[serde(serialize_with = "stockroom_core::serde::to_rfc3339_ms")]
    pub revision_date: DateTime<Utc>,
    pub changes_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldChangeKind {
    Added,
    Modified,
}

/// Per-field difference between a revision and its predecessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChange {
    pub field_name: &'static str,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub change_type: FieldChangeKind,
}

/// Aggregates over a date range of the revision log.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditStatistics {
    pub total_records: u64,
    pub creation_count: u64,
    pub modification_count: u64,
    pub deletion_count: u64,
    pub most_active_user: String,
    pub most_modified_product: String,
    #[serde(serialize_with = "stockroom_core::serde::opt_to_rfc3339_ms")]
    pub period_start: Option<DateTime<Utc>>,
    #[serde(serialize_with = "stockroom_core::serde::opt_to_rfc3339_ms")]
    pub period_end: Option<DateTime<Utc>>,
}

impl AuditStatistics {
    fn empty(period_start: Option<DateTime<Utc>>, period_end: Option<DateTime<Utc>>) -> Self {
        Self {
            total_records: 0,
            creation_count: 0,
            modification_count: 0,
            deletion_count: 0,
            most_active_user: "N/A".to_owned(),
            most_modified_product: "N/A".to_owned(),
            period_start,
            period_end,
        }
    }
}

/// Product state as of one revision, for the point-in-time lookup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionSnapshotView {
    pub revision: i64,
    pub product_id: i64,
    pub rev_type: i16,
    pub operation: &'static str,
    pub username: String,
    #[serde(serialize_with = "stockroom_core::serde::to_rfc3339_ms")]
    pub revision_date: DateTime<Utc>,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price: Decimal,
    pub stock: i32,
    pub minimum_stock: Option<i32>,
}

pub const CSV_HEADER: &str = "revision,timestamp,username,productId,productName,operation,changes";

// ── Queries ──────────────────────────────────────────────────────────────────

pub struct AuditQueries<R: RevisionRepository> {
    pub repo: R,
}

impl<R: RevisionRepository> AuditQueries<R> {
    /// Paginated audit listing. Revisions come back newest first; the sort
    /// parameter only honors direction on the `revision` field, any other
    /// field keeps the fetched order.
    pub async fn list_records(
        &self,
        filter: &RevisionFilter,
        page: PageRequest,
        sort: &SortSpec,
    ) -> Page<AuditRecord> {
        match self.try_list_records(filter, sort).await {
            Ok(rows) => Page::slice_of(rows, page),
            Err(e) => {
                tracing::error!(error = ?e, "audit listing failed; returning empty page");
                Page::empty(page)
            }
        }
    }

    /// Per-field changes introduced by one revision of one product. Unknown
    /// revisions yield an empty list.
    pub async fn revision_changes(&self, product_id: i64, revision: i64) -> Vec<FieldChange> {
        match self.try_revision_changes(product_id, revision).await {
            Ok(changes) => changes,
            Err(e) => {
                tracing::error!(error = ?e, product_id, revision, "revision diff failed");
                Vec::new()
            }
        }
    }

    /// One product's full history, newest first.
    pub async fn product_history(&self, product_id: i64, page: PageRequest) -> Page<AuditRecord> {
        match self.try_product_history(product_id).await {
            Ok(rows) => Page::slice_of(rows, page),
            Err(e) => {
                tracing::error!(error = ?e, product_id, "product history failed");
                Page::empty(page)
            }
        }
    }

    /// Product state as of a given revision.
    pub async fn product_at_revision(
        &self,
        product_id: i64,
        revision: i64,
    ) -> Option<RevisionSnapshotView> {
        match self.repo.list_for_product(product_id).await {
            Ok(history) => history
                .into_iter()
                .find(|r| r.rev == revision)
                .map(snapshot_view),
            Err(e) => {
                tracing::error!(error = ?e, product_id, revision, "snapshot lookup failed");
                None
            }
        }
    }

    /// All revision numbers of one product, oldest first.
    pub async fn revision_numbers(&self, product_id: i64) -> Vec<i64> {
        match self.repo.list_for_product(product_id).await {
            Ok(history) => history.into_iter().map(|r| r.rev).collect(),
            Err(e) => {
                tracing::error!(error = ?e, product_id, "revision list failed");
                Vec::new()
            }
        }
    }

    /// Unpaged export of the filtered listing as comma-joined rows.
    ///
    /// Values are joined raw: a comma inside a product name or username
    /// produces a malformed row. Kept as-is for compatibility with existing
    /// consumers of the export.
    pub async fn export_csv(&self, filter: &RevisionFilter) -> String {
        let rows = match self.try_list_records(filter, &SortSpec::default()).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!(error = ?e, "audit export failed; returning header only");
                Vec::new()
            }
        };

        let mut out = String::from(CSV_HEADER);
        out.push('\n');
        for row in rows {
            out.push_str(&format!(
                "{},{},{},{},{},{},{}\n",
                row.revision,
                row.revision_date
                    .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
                row.username,
                row.product_id,
                row.product_name,
                row.operation,
                row.changes_count,
            ));
        }
        out
    }

    /// Counts by change type plus the most active user and most modified
    /// product over the date range. Ties resolve to an arbitrary entry of the
    /// underlying hash map.
    pub async fn statistics(
        &self,
        date_from: Option<DateTime<Utc>>,
        date_to: Option<DateTime<Utc>>,
    ) -> AuditStatistics {
        let filter = RevisionFilter {
            date_from,
            date_to,
            ..Default::default()
        };
        let records = match self.repo.list(&filter).await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(error = ?e, "audit statistics failed; returning zeroes");
                return AuditStatistics::empty(date_from, date_to);
            }
        };

        let count_of = |ct: ChangeType| records.iter().filter(|r| r.change_type == ct).count() as u64;

        AuditStatistics {
            total_records: records.len() as u64,
            creation_count: count_of(ChangeType::Add),
            modification_count: count_of(ChangeType::Mod),
            deletion_count: count_of(ChangeType::Del),
            most_active_user: most_frequent(records.iter().map(|r| r.username.as_str())),
            most_modified_product: most_frequent(records.iter().map(|r| r.snapshot.name.as_str())),
            period_start: date_from,
            period_end: date_to,
        }
    }

    /// The filtered listing reduced to revisions that changed stock. ADD and
    /// DEL always qualify; MOD qualifies only when the previous snapshot's
    /// stock differs numerically. The predecessor comes from the product's
    /// unfiltered history, so listing filters cannot hide it.
    pub async fn stock_movements(
        &self,
        filter: &RevisionFilter,
        page: PageRequest,
    ) -> Page<AuditRecord> {
        match self.try_stock_movements(filter).await {
            Ok(rows) => Page::slice_of(rows, page),
            Err(e) => {
                tracing::error!(error = ?e, "stock movement listing failed");
                Page::empty(page)
            }
        }
    }

    async fn try_list_records(
        &self,
        filter: &RevisionFilter,
        sort: &SortSpec,
    ) -> Result<Vec<AuditRecord>, InventoryError> {
        let mut records = self.repo.list(filter).await?;
        if sort.field == "revision" && sort.direction == Sort::Asc {
            records.reverse();
        }

        let mut cache = HistoryCache::new(&self.repo);
        let mut rows = Vec::with_capacity(records.len());
        for record in &records {
            let previous = cache
                .previous_snapshot(record.product_id, record.rev)
                .await?;
            rows.push(audit_record(record, previous.as_ref()));
        }
        Ok(rows)
    }

    async fn try_revision_changes(
        &self,
        product_id: i64,
        revision: i64,
    ) -> Result<Vec<FieldChange>, InventoryError> {
        let history = self.repo.list_for_product(product_id).await?;
        let Some(idx) = history.iter().position(|r| r.rev == revision) else {
            return Ok(Vec::new());
        };
        let previous = if idx > 0 {
            Some(&history[idx - 1].snapshot)
        } else {
            None
        };
        Ok(diff_fields(previous, &history[idx].snapshot))
    }

    async fn try_product_history(
        &self,
        product_id: i64,
    ) -> Result<Vec<AuditRecord>, InventoryError> {
        let history = self.repo.list_for_product(product_id).await?;
        let mut rows: Vec<AuditRecord> = history
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let previous = if i > 0 {
                    Some(&history[i - 1].snapshot)
                } else {
                    None
                };
                audit_record(record, previous)
            })
            .collect();
        rows.reverse();
        Ok(rows)
    }

    async fn try_stock_movements(
        &self,
        filter: &RevisionFilter,
    ) -> Result<Vec<AuditRecord>, InventoryError> {
        let records = self.repo.list(filter).await?;
        let mut cache = HistoryCache::new(&self.repo);
        let mut rows = Vec::new();
        for record in &records {
            let previous = cache
                .previous_snapshot(record.product_id, record.rev)
                .await?;
            let is_movement = match record.change_type {
                ChangeType::Add | ChangeType::Del => true,
                ChangeType::Mod => match previous.as_ref() {
                    Some(prev) => prev.stock != record.snapshot.stock,
                    // A MOD with no known predecessor counts as a movement.
                    None => true,
                },
            };
            if is_movement {
                rows.push(audit_record(record, previous.as_ref()));
            }
        }
        Ok(rows)
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Per-product unfiltered history, fetched at most once per query.
struct HistoryCache<'a, R: RevisionRepository> {
    repo: &'a R,
    by_product: HashMap<i64, Vec<RevisionRecord>>,
}

impl<'a, R: RevisionRepository> HistoryCache<'a, R> {
    fn new(repo: &'a R) -> Self {
        Self {
            repo,
            by_product: HashMap::new(),
        }
    }

    /// Snapshot directly preceding `rev` in the product's history, if any.
    async fn previous_snapshot(
        &mut self,
        product_id: i64,
        rev: i64,
    ) -> Result<Option<ProductSnapshot>, InventoryError> {
        if !self.by_product.contains_key(&product_id) {
            let history = self.repo.list_for_product(product_id).await?;
            self.by_product.insert(product_id, history);
        }
        let history = &self.by_product[&product_id];
        Ok(history
            .iter()
            .position(|r| r.rev == rev)
            .filter(|&i| i > 0)
            .map(|i| history[i - 1].snapshot.clone()))
    }
}

fn audit_record(record: &RevisionRecord, previous: Option<&ProductSnapshot>) -> AuditRecord {
    AuditRecord {
        revision: record.rev,
        product_id: record.product_id,
        product_name: record.snapshot.name.clone(),
        rev_type: record.change_type.as_i16(),
        operation: record.change_type.operation_name(),
        username: record.username.clone(),
        user_id: record.user_id,
        revision_date: record.recorded_at,
        changes_count: diff_fields(previous, &record.snapshot).len(),
    }
}

fn snapshot_view(record: RevisionRecord) -> RevisionSnapshotView {
    RevisionSnapshotView {
        revision: record.rev,
        product_id: record.product_id,
        rev_type: record.change_type.as_i16(),
        operation: record.change_type.operation_name(),
        username: record.username,
        revision_date: record.recorded_at,
        name: record.snapshot.name,
        description: record.snapshot.description,
        category: record.snapshot.category,
        price: record.snapshot.price,
        stock: record.snapshot.stock,
        minimum_stock: record.snapshot.minimum_stock,
    }
}

/// Most frequent value, `"N/A"` for an empty input. Tie-breaking follows the
/// hash map's entry order.
fn most_frequent<'a>(values: impl Iterator<Item = &'a str>) -> String {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }
    counts
        .into_iter()
        .max_by_key(|(_, count)| *count)
        .map(|(value, _)| value.to_owned())
        .unwrap_or_else(|| "N/A".to_owned())
}

/// Field-by-field comparison of two snapshots. With no predecessor, every
/// populated field is ADDED; otherwise differing fields are MODIFIED.
pub fn diff_fields(
    previous: Option<&ProductSnapshot>,
    current: &ProductSnapshot,
) -> Vec<FieldChange> {
    let mut changes = Vec::new();
    match previous {
        None => {
            added(&mut changes, "name", Some(current.name.clone()));
            added(&mut changes, "description", current.description.clone());
            added(&mut changes, "category", Some(current.category.clone()));
            added(&mut changes, "price", Some(current.price.to_string()));
            added(&mut changes, "stock", Some(current.stock.to_string()));
            added(
                &mut changes,
                "minimumStock",
                current.minimum_stock.map(|v| v.to_string()),
            );
        }
        Some(prev) => {
            modified(&mut changes, "name", &prev.name, &current.name);
            modified(
                &mut changes,
                "description",
                &prev.description,
                &current.description,
            );
            modified(&mut changes, "category", &prev.category, &current.category);
            modified(&mut changes, "price", &prev.price, &current.price);
            modified(&mut changes, "stock", &prev.stock, &current.stock);
            modified(
                &mut changes,
                "minimumStock",
                &prev.minimum_stock,
                &current.minimum_stock,
            );
        }
    }
    changes
}

fn added(changes: &mut Vec<FieldChange>, field_name: &'static str, new_value: Option<String>) {
    if let Some(new_value) = new_value {
        changes.push(FieldChange {
            field_name,
            old_value: None,
            new_value: Some(new_value),
            change_type: FieldChangeKind::Added,
        });
    }
}

fn modified<T: PartialEq + FieldValue>(
    changes: &mut Vec<FieldChange>,
    field_name: &'static str,
    old: &T,
    new: &T,
) {
    if old != new {
        changes.push(FieldChange {
            field_name,
            old_value: old.field_value(),
            new_value: new.field_value(),
            change_type: FieldChangeKind::Modified,
        });
    }
}

/// Stringification used by the diff output; absent optionals become null.
trait FieldValue {
    fn field_value(&self) -> Option<String>;
}

impl FieldValue for String {
    fn field_value(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl FieldValue for i32 {
    fn field_value(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl FieldValue for Decimal {
    fn field_value(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl<T: ToString> FieldValue for Option<T> {
    fn field_value(&self) -> Option<String> {
        self.as_ref().map(ToString::to_string)
    }
}
