//! End-to-end audit flows: product mutations append revisions through the
//! repository, and the audit queries read them back.

use chrono::{Duration, Utc};

use stockroom_domain::pagination::{PageRequest, SortSpec};
use stockroom_domain::revision::ChangeType;

use stockroom_inventory::domain::types::{ProductPatch, RevisionFilter};
use stockroom_inventory::usecase::audit::{AuditQueries, CSV_HEADER, FieldChangeKind};
use stockroom_inventory::usecase::product::{
    CreateProductUseCase, DeleteProductUseCase, UpdateProductUseCase, UpdateStockUseCase,
};

use crate::helpers::{InMemoryStore, StoreRevisionRepo, actor, new_product};

/// rev 1: alice creates Widget (stock 3); rev 2: bob edits the description;
/// rev 3: alice sets stock to 7; rev 4: carol creates Gadget (stock 0);
/// rev 5: alice deletes Widget. Returns (store, widget_id).
async fn seeded_store() -> (InMemoryStore, i64) {
    let store = InMemoryStore::new();
    let create = CreateProductUseCase {
        repo: store.product_repo(),
    };
    let update = UpdateProductUseCase {
        repo: store.product_repo(),
    };
    let update_stock = UpdateStockUseCase {
        repo: store.product_repo(),
    };
    let delete = DeleteProductUseCase {
        repo: store.product_repo(),
    };

    let widget = create
        .execute(new_product("Widget", "9.99", 3, Some(5)), &actor("alice"))
        .await
        .unwrap();
    update
        .execute(
            widget.id,
            ProductPatch {
                description: Some("steel widget".into()),
                ..Default::default()
            },
            &actor("bob"),
        )
        .await
        .unwrap();
    update_stock
        .execute(widget.id, 7, None, &actor("alice"))
        .await
        .unwrap();
    create
        .execute(new_product("Gadget", "5.00", 0, None), &actor("carol"))
        .await
        .unwrap();
    delete.execute(widget.id, &actor("alice")).await.unwrap();

    (store, widget.id)
}

fn audit(store: &InMemoryStore) -> AuditQueries<StoreRevisionRepo> {
    AuditQueries {
        repo: store.revision_repo(),
    }
}

#[tokio::test]
async fn should_list_all_revisions_newest_first() {
    let (store, widget_id) = seeded_store().await;
    let page = audit(&store)
        .list_records(
            &RevisionFilter::default(),
            PageRequest::new(0, 10),
            &SortSpec::default(),
        )
        .await;

    assert_eq!(page.total_elements, 5);
    let ops: Vec<&str> = page.content.iter().map(|r| r.operation).collect();
    assert_eq!(
        ops,
        vec!["DELETE", "CREATE", "UPDATE", "UPDATE", "CREATE"]
    );
    assert_eq!(page.content[0].product_id, widget_id);
    assert_eq!(page.content[0].username, "alice");
}

#[tokio::test]
async fn should_filter_by_username_product_name_and_change_type() {
    let (store, _) = seeded_store().await;
    let q = audit(&store);

    let by_user = q
        .list_records(
            &RevisionFilter {
                username: Some("car".into()),
                ..Default::default()
            },
            PageRequest::new(0, 10),
            &SortSpec::default(),
        )
        .await;
    assert_eq!(by_user.total_elements, 1);
    assert_eq!(by_user.content[0].product_name, "Gadget");

    let by_name = q
        .list_records(
            &RevisionFilter {
                product_name: Some("widg".into()),
                ..Default::default()
            },
            PageRequest::new(0, 10),
            &SortSpec::default(),
        )
        .await;
    assert_eq!(by_name.total_elements, 4);

    let deletions = q
        .list_records(
            &RevisionFilter {
                change_type: Some(ChangeType::Del),
                ..Default::default()
            },
            PageRequest::new(0, 10),
            &SortSpec::default(),
        )
        .await;
    assert_eq!(deletions.total_elements, 1);
    assert_eq!(deletions.content[0].operation, "DELETE");
}

#[tokio::test]
async fn should_return_empty_page_for_a_range_with_no_revisions() {
    let (store, _) = seeded_store().await;
    let filter = RevisionFilter {
        date_from: Some(Utc::now() + Duration::days(30)),
        date_to: Some(Utc::now() + Duration::days(60)),
        ..Default::default()
    };
    let page = audit(&store)
        .list_records(&filter, PageRequest::new(0, 10), &SortSpec::default())
        .await;

    assert!(page.content.is_empty());
    assert_eq!(page.total_elements, 0);
}

#[tokio::test]
async fn should_classify_stock_changes_but_not_field_edits_as_movements() {
    let (store, _) = seeded_store().await;
    let page = audit(&store)
        .stock_movements(&RevisionFilter::default(), PageRequest::new(0, 10))
        .await;

    // rev 2 (description only) is excluded; creations, deletions, and the
    // 3→7 stock write remain.
    let revs: Vec<i64> = page.content.iter().map(|r| r.revision).collect();
    assert_eq!(revs, vec![5, 4, 3, 1]);
}

#[tokio::test]
async fn should_not_report_a_noop_stock_write_as_a_movement() {
    let (store, _) = seeded_store().await;
    let update_stock = UpdateStockUseCase {
        repo: store.product_repo(),
    };
    // Gadget holds stock 0; rewrite it with the same value.
    let gadget_id = 2;
    update_stock
        .execute(gadget_id, 0, None, &actor("carol"))
        .await
        .unwrap();
    assert_eq!(store.revision_count(), 6);

    let page = audit(&store)
        .stock_movements(&RevisionFilter::default(), PageRequest::new(0, 10))
        .await;
    assert!(page.content.iter().all(|r| r.revision != 6));
}

#[tokio::test]
async fn should_diff_consecutive_revisions_per_field() {
    let (store, widget_id) = seeded_store().await;
    let q = audit(&store);

    let first = q.revision_changes(widget_id, 1).await;
    assert!(
        first
            .iter()
            .all(|c| c.change_type == FieldChangeKind::Added)
    );
    let fields: Vec<&str> = first.iter().map(|c| c.field_name).collect();
    assert_eq!(fields, vec!["name", "category", "price", "stock", "minimumStock"]);

    let stock_write = q.revision_changes(widget_id, 3).await;
    assert_eq!(stock_write.len(), 1);
    assert_eq!(stock_write[0].field_name, "stock");
    assert_eq!(stock_write[0].old_value.as_deref(), Some("3"));
    assert_eq!(stock_write[0].new_value.as_deref(), Some("7"));
}

#[tokio::test]
async fn should_page_a_single_products_history() {
    let (store, widget_id) = seeded_store().await;
    let page = audit(&store)
        .product_history(widget_id, PageRequest::new(1, 2))
        .await;

    assert_eq!(page.total_elements, 4);
    assert_eq!(page.total_pages, 2);
    let revs: Vec<i64> = page.content.iter().map(|r| r.revision).collect();
    assert_eq!(revs, vec![2, 1]);
}

#[tokio::test]
async fn should_export_filtered_rows_as_csv() {
    let (store, _) = seeded_store().await;
    let csv = audit(&store)
        .export_csv(&RevisionFilter {
            username: Some("alice".into()),
            ..Default::default()
        })
        .await;

    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], CSV_HEADER);
    // alice touched revisions 5, 3, 1.
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("5,"));
    assert!(lines[3].starts_with("1,"));
}

#[tokio::test]
async fn should_aggregate_statistics_over_the_log() {
    let (store, _) = seeded_store().await;
    let stats = audit(&store).statistics(None, None).await;

    assert_eq!(stats.total_records, 5);
    assert_eq!(stats.creation_count, 2);
    assert_eq!(stats.modification_count, 2);
    assert_eq!(stats.deletion_count, 1);
    assert_eq!(stats.most_active_user, "alice");
    assert_eq!(stats.most_modified_product, "Widget");
}

#[tokio::test]
async fn should_expose_point_in_time_snapshots_and_revision_numbers() {
    let (store, widget_id) = seeded_store().await;
    let q = audit(&store);

    assert_eq!(q.revision_numbers(widget_id).await, vec![1, 2, 3, 5]);

    let at_creation = q.product_at_revision(widget_id, 1).await.unwrap();
    assert_eq!(at_creation.stock, 3);
    let at_restock = q.product_at_revision(widget_id, 3).await.unwrap();
    assert_eq!(at_restock.stock, 7);
}
