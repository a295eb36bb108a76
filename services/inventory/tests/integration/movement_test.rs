use stockroom_inventory::domain::types::MovementDirection;
use stockroom_inventory::error::InventoryError;
use stockroom_inventory::usecase::movement::{MovementFilter, MovementQueries};
use stockroom_inventory::usecase::product::{
    CreateProductUseCase, RecordStockMovementUseCase,
};

use crate::helpers::{InMemoryStore, actor, new_product};

#[tokio::test]
async fn should_apply_relative_movements_and_reject_overdraw() {
    let store = InMemoryStore::new();
    let create = CreateProductUseCase {
        repo: store.product_repo(),
    };
    let movement = RecordStockMovementUseCase {
        repo: store.product_repo(),
    };

    let widget = create
        .execute(new_product("Widget", "9.99", 5, None), &actor("alice"))
        .await
        .unwrap();

    let after_in = movement
        .execute(widget.id, MovementDirection::In, 7, &actor("bob"))
        .await
        .unwrap();
    assert_eq!(after_in.stock, 12);

    let after_out = movement
        .execute(widget.id, MovementDirection::Out, 2, &actor("bob"))
        .await
        .unwrap();
    assert_eq!(after_out.stock, 10);

    let err = movement
        .execute(widget.id, MovementDirection::Out, 11, &actor("bob"))
        .await
        .unwrap_err();
    assert!(matches!(err, InventoryError::InsufficientStock));

    // The failed overdraw must not have written a revision.
    assert_eq!(store.revision_count(), 3);
}

#[tokio::test]
async fn should_reconstruct_movements_from_the_revision_log() {
    let store = InMemoryStore::new();
    let create = CreateProductUseCase {
        repo: store.product_repo(),
    };
    let movement = RecordStockMovementUseCase {
        repo: store.product_repo(),
    };

    let widget = create
        .execute(new_product("Widget", "9.99", 5, None), &actor("alice"))
        .await
        .unwrap();
    movement
        .execute(widget.id, MovementDirection::Out, 3, &actor("bob"))
        .await
        .unwrap();
    movement
        .execute(widget.id, MovementDirection::In, 8, &actor("alice"))
        .await
        .unwrap();

    let queries = MovementQueries {
        repo: store.revision_repo(),
    };
    let movements = queries.list(&MovementFilter::default()).await.unwrap();

    let summary: Vec<(&str, i32, i32, i32)> = movements
        .iter()
        .map(|m| {
            (
                m.direction.as_str(),
                m.quantity,
                m.previous_stock,
                m.new_stock,
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![("IN", 8, 2, 10), ("OUT", 3, 5, 2), ("IN", 5, 0, 5)]
    );
}

#[tokio::test]
async fn should_filter_reconstructed_movements_by_user_and_direction() {
    let store = InMemoryStore::new();
    let create = CreateProductUseCase {
        repo: store.product_repo(),
    };
    let movement = RecordStockMovementUseCase {
        repo: store.product_repo(),
    };

    let widget = create
        .execute(new_product("Widget", "9.99", 5, None), &actor("alice"))
        .await
        .unwrap();
    movement
        .execute(widget.id, MovementDirection::Out, 3, &actor("bob"))
        .await
        .unwrap();

    let queries = MovementQueries {
        repo: store.revision_repo(),
    };

    let bobs = queries
        .list(&MovementFilter {
            username: Some("bob".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(bobs.len(), 1);
    assert_eq!(bobs[0].direction, MovementDirection::Out);

    let inbound = queries
        .list(&MovementFilter {
            direction: Some(MovementDirection::In),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(inbound.len(), 1);
    assert_eq!(inbound[0].quantity, 5);
}
