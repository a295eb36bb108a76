//! `/api/auditoria` — audit/history queries over the revision log.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::header,
};
use chrono::{NaiveDateTime, Utc};
use serde::Deserialize;

use stockroom_auth::identity::SsoIdentity;
use stockroom_domain::pagination::{Page, PageRequest, SortSpec};
use stockroom_domain::revision::ChangeType;

use crate::domain::types::RevisionFilter;
use crate::handlers::product::normalized;
use crate::state::AppState;
use crate::usecase::audit::{AuditQueries, AuditRecord, AuditStatistics, FieldChange};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditQuery {
    #[serde(default)]
    pub page: u64,
    pub size: Option<u64>,
    pub sort: Option<String>,
    pub product_name: Option<String>,
    pub username: Option<String>,
    pub rev_type: Option<i16>,
    /// ISO-8601 local date-time, interpreted as UTC.
    pub date_from: Option<NaiveDateTime>,
    pub date_to: Option<NaiveDateTime>,
}

impl AuditQuery {
    fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.size.unwrap_or(10))
    }

    fn sort_spec(&self) -> SortSpec {
        self.sort
            .as_deref()
            .map(SortSpec::parse)
            .unwrap_or_default()
    }

    /// `None` when `revType` is present but not a known change type — such a
    /// query can never match anything.
    fn filter(&self) -> Option<RevisionFilter> {
        let change_type = match self.rev_type {
            Some(v) => Some(ChangeType::from_i16(v)?),
            None => None,
        };
        Some(RevisionFilter {
            product_name: normalized(self.product_name.clone()),
            username: normalized(self.username.clone()),
            change_type,
            date_from: self.date_from.map(|dt| dt.and_utc()),
            date_to: self.date_to.map(|dt| dt.and_utc()),
        })
    }
}

// ── GET /api/auditoria/products ──────────────────────────────────────────────

pub async fn audit_listing(
    _identity: SsoIdentity,
    State(state): State<AppState>,
    Query(query): Query<AuditQuery>,
) -> Json<Page<AuditRecord>> {
    let queries = AuditQueries {
        repo: state.revision_repo(),
    };
    let page = match query.filter() {
        Some(filter) => {
            queries
                .list_records(&filter, query.page_request(), &query.sort_spec())
                .await
        }
        None => Page::empty(query.page_request()),
    };
    Json(page)
}

// ── GET /api/auditoria/products/{productId}/revision/{revision}/changes ──────

pub async fn revision_changes(
    _identity: SsoIdentity,
    State(state): State<AppState>,
    Path((product_id, revision)): Path<(i64, i64)>,
) -> Json<Vec<FieldChange>> {
    let queries = AuditQueries {
        repo: state.revision_repo(),
    };
    Json(queries.revision_changes(product_id, revision).await)
}

// ── GET /api/auditoria/products/{productId}/history ──────────────────────────

#[derive(Debug, Deserialize)]
pub struct AuditHistoryQuery {
    #[serde(default)]
    pub page: u64,
    pub size: Option<u64>,
}

pub async fn product_audit_history(
    _identity: SsoIdentity,
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
    Query(query): Query<AuditHistoryQuery>,
) -> Json<Page<AuditRecord>> {
    let queries = AuditQueries {
        repo: state.revision_repo(),
    };
    let page = queries
        .product_history(
            product_id,
            PageRequest::new(query.page, query.size.unwrap_or(10)),
        )
        .await;
    Json(page)
}

// ── GET /api/auditoria/products/export ───────────────────────────────────────

pub async fn export_audit_csv(
    _identity: SsoIdentity,
    State(state): State<AppState>,
    Query(query): Query<AuditQuery>,
) -> ([(header::HeaderName, String); 2], String) {
    let queries = AuditQueries {
        repo: state.revision_repo(),
    };
    let csv = match query.filter() {
        Some(filter) => queries.export_csv(&filter).await,
        None => format!("{}\n", crate::usecase::audit::CSV_HEADER),
    };

    let filename = format!(
        "audit_report_{}.csv",
        Utc::now().format("%Y-%m-%dT%H-%M-%S")
    );
    (
        [
            (
                header::CONTENT_TYPE,
                "application/octet-stream".to_owned(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    )
}

// ── GET /api/auditoria/products/stats ────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    pub date_from: Option<NaiveDateTime>,
    pub date_to: Option<NaiveDateTime>,
}

pub async fn audit_statistics(
    _identity: SsoIdentity,
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Json<AuditStatistics> {
    let queries = AuditQueries {
        repo: state.revision_repo(),
    };
    let stats = queries
        .statistics(
            query.date_from.map(|dt| dt.and_utc()),
            query.date_to.map(|dt| dt.and_utc()),
        )
        .await;
    Json(stats)
}

// ── GET /api/auditoria/products/stock-movements ──────────────────────────────

pub async fn stock_movements(
    _identity: SsoIdentity,
    State(state): State<AppState>,
    Query(query): Query<AuditQuery>,
) -> Json<Page<AuditRecord>> {
    let queries = AuditQueries {
        repo: state.revision_repo(),
    };
    // The stock-movement listing takes no change-type filter of its own; the
    // classification below decides which revisions qualify.
    let filter = RevisionFilter {
        product_name: normalized(query.product_name.clone()),
        username: normalized(query.username.clone()),
        change_type: None,
        date_from: query.date_from.map(|dt| dt.and_utc()),
        date_to: query.date_to.map(|dt| dt.and_utc()),
    };
    Json(queries.stock_movements(&filter, query.page_request()).await)
}
