use rust_decimal::Decimal;

use stockroom_domain::pagination::{PageRequest, Sort};
use stockroom_domain::stock::StockStatus;

use stockroom_inventory::domain::types::{ProductPatch, ProductSortBy};
use stockroom_inventory::error::InventoryError;
use stockroom_inventory::usecase::product::{
    BrowseProductsUseCase, CreateProductUseCase, DeleteProductUseCase, ProductStatsUseCase,
    UpdateProductUseCase, UpdateStockUseCase,
};

use crate::helpers::{InMemoryStore, actor, new_product};

#[tokio::test]
async fn should_create_product_with_low_stock_status() {
    let store = InMemoryStore::new();
    let create = CreateProductUseCase {
        repo: store.product_repo(),
    };

    let product = create
        .execute(new_product("Widget", "9.99", 3, Some(5)), &actor("alice"))
        .await
        .unwrap();

    assert!(product.is_low_stock());
    assert!(!product.is_out_of_stock());
    assert_eq!(product.stock_status(), StockStatus::LowStock);
    assert_eq!(store.revision_count(), 1);
}

#[tokio::test]
async fn should_mark_zero_stock_out_of_stock_regardless_of_minimum() {
    let store = InMemoryStore::new();
    let create = CreateProductUseCase {
        repo: store.product_repo(),
    };

    let product = create
        .execute(new_product("Widget", "9.99", 0, Some(5)), &actor("alice"))
        .await
        .unwrap();

    assert_eq!(product.stock_status(), StockStatus::OutOfStock);
    assert!(!product.is_low_stock());
}

#[tokio::test]
async fn should_reject_case_insensitive_duplicate_without_a_revision() {
    let store = InMemoryStore::new();
    let create = CreateProductUseCase {
        repo: store.product_repo(),
    };

    create
        .execute(new_product("Widget", "9.99", 3, None), &actor("alice"))
        .await
        .unwrap();
    let err = create
        .execute(new_product("wIdGeT", "1.00", 1, None), &actor("alice"))
        .await
        .unwrap_err();

    assert!(matches!(err, InventoryError::DuplicateProduct));
    // The failed create must not touch the revision log.
    assert_eq!(store.revision_count(), 1);
}

#[tokio::test]
async fn should_fail_delete_of_missing_product_and_leave_log_unchanged() {
    let store = InMemoryStore::new();
    let delete = DeleteProductUseCase {
        repo: store.product_repo(),
    };

    let err = delete.execute(404, &actor("alice")).await.unwrap_err();
    assert!(matches!(err, InventoryError::ProductNotFound));
    assert_eq!(store.revision_count(), 0);
}

#[tokio::test]
async fn should_apply_only_present_fields_on_update() {
    let store = InMemoryStore::new();
    let create = CreateProductUseCase {
        repo: store.product_repo(),
    };
    let update = UpdateProductUseCase {
        repo: store.product_repo(),
    };

    let created = create
        .execute(new_product("Widget", "9.99", 3, Some(5)), &actor("alice"))
        .await
        .unwrap();

    let updated = update
        .execute(
            created.id,
            ProductPatch {
                description: Some("steel widget".into()),
                ..Default::default()
            },
            &actor("bob"),
        )
        .await
        .unwrap();

    assert_eq!(updated.description.as_deref(), Some("steel widget"));
    assert_eq!(updated.name, "Widget");
    assert_eq!(updated.stock, 3);
    assert_eq!(updated.price, "9.99".parse::<Decimal>().unwrap());
}

#[tokio::test]
async fn should_skip_duplicate_check_for_unchanged_name_but_not_for_rename() {
    let store = InMemoryStore::new();
    let create = CreateProductUseCase {
        repo: store.product_repo(),
    };
    let update = UpdateProductUseCase {
        repo: store.product_repo(),
    };

    let widget = create
        .execute(new_product("Widget", "9.99", 3, None), &actor("alice"))
        .await
        .unwrap();
    create
        .execute(new_product("Gadget", "5.00", 1, None), &actor("alice"))
        .await
        .unwrap();

    // Re-writing the same name in a different case is not a collision.
    let updated = update
        .execute(
            widget.id,
            ProductPatch {
                name: Some("WIDGET".into()),
                ..Default::default()
            },
            &actor("alice"),
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "WIDGET");

    // Renaming onto another product is.
    let err = update
        .execute(
            widget.id,
            ProductPatch {
                name: Some("gadget".into()),
                ..Default::default()
            },
            &actor("alice"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, InventoryError::DuplicateProduct));
}

#[tokio::test]
async fn should_overwrite_stock_and_discard_the_reason() {
    let store = InMemoryStore::new();
    let create = CreateProductUseCase {
        repo: store.product_repo(),
    };
    let update_stock = UpdateStockUseCase {
        repo: store.product_repo(),
    };

    let created = create
        .execute(new_product("Widget", "9.99", 3, None), &actor("alice"))
        .await
        .unwrap();

    let updated = update_stock
        .execute(created.id, 12, Some("recount".into()), &actor("bob"))
        .await
        .unwrap();

    assert_eq!(updated.stock, 12);
    assert_eq!(store.revision_count(), 2);
}

#[tokio::test]
async fn should_keep_low_stock_and_out_of_stock_queries_disjoint() {
    let store = InMemoryStore::new();
    let create = CreateProductUseCase {
        repo: store.product_repo(),
    };
    let browse = BrowseProductsUseCase {
        repo: store.product_repo(),
    };

    create
        .execute(new_product("Plenty", "1.00", 50, Some(5)), &actor("a"))
        .await
        .unwrap();
    create
        .execute(new_product("Scarce", "1.00", 2, Some(5)), &actor("a"))
        .await
        .unwrap();
    create
        .execute(new_product("Gone", "1.00", 0, Some(5)), &actor("a"))
        .await
        .unwrap();

    let low = browse.low_stock().await.unwrap();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].name, "Scarce");

    let out = browse.out_of_stock().await.unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].name, "Gone");
}

#[tokio::test]
async fn should_count_low_stock_items_as_in_stock_in_the_stats() {
    let store = InMemoryStore::new();
    let create = CreateProductUseCase {
        repo: store.product_repo(),
    };
    let stats = ProductStatsUseCase {
        repo: store.product_repo(),
    };

    create
        .execute(new_product("Plenty", "1.00", 50, Some(5)), &actor("a"))
        .await
        .unwrap();
    create
        .execute(new_product("Scarce", "1.00", 2, Some(5)), &actor("a"))
        .await
        .unwrap();
    create
        .execute(new_product("Gone", "1.00", 0, Some(5)), &actor("a"))
        .await
        .unwrap();

    let stats = stats.execute().await.unwrap();
    assert_eq!(stats.total_products, 3);
    assert_eq!(stats.low_stock_products, 1);
    assert_eq!(stats.out_of_stock_products, 1);
    // total − outOfStock: the low-stock item still counts as "in stock" here,
    // unlike the per-item three-way status.
    assert_eq!(stats.in_stock_products, 2);
}

#[tokio::test]
async fn should_reject_invalid_price_ranges() {
    let store = InMemoryStore::new();
    let browse = BrowseProductsUseCase {
        repo: store.product_repo(),
    };

    let min = "10.00".parse::<Decimal>().unwrap();
    let max = "5.00".parse::<Decimal>().unwrap();
    let err = browse.by_price_range(min, max).await.unwrap_err();
    assert!(matches!(err, InventoryError::InvalidPriceRange));

    let negative = "-1.00".parse::<Decimal>().unwrap();
    let err = browse.by_price_range(negative, max).await.unwrap_err();
    assert!(matches!(err, InventoryError::InvalidPriceRange));
}

#[tokio::test]
async fn should_filter_by_inclusive_price_range() {
    let store = InMemoryStore::new();
    let create = CreateProductUseCase {
        repo: store.product_repo(),
    };
    let browse = BrowseProductsUseCase {
        repo: store.product_repo(),
    };

    create
        .execute(new_product("Cheap", "1.00", 1, None), &actor("a"))
        .await
        .unwrap();
    create
        .execute(new_product("Fair", "5.00", 1, None), &actor("a"))
        .await
        .unwrap();
    create
        .execute(new_product("Dear", "9.00", 1, None), &actor("a"))
        .await
        .unwrap();

    let in_range = browse
        .by_price_range(
            "1.00".parse::<Decimal>().unwrap(),
            "5.00".parse::<Decimal>().unwrap(),
        )
        .await
        .unwrap();
    let names: Vec<&str> = in_range.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Cheap", "Fair"]);
}

#[tokio::test]
async fn should_paginate_and_sort_the_listing() {
    let store = InMemoryStore::new();
    let create = CreateProductUseCase {
        repo: store.product_repo(),
    };
    let browse = BrowseProductsUseCase {
        repo: store.product_repo(),
    };

    for (name, price) in [("Alpha", "3.00"), ("Beta", "1.00"), ("Gamma", "2.00")] {
        create
            .execute(new_product(name, price, 1, None), &actor("a"))
            .await
            .unwrap();
    }

    let page = browse
        .paginated(PageRequest::new(0, 2), ProductSortBy::Price, Sort::Asc)
        .await
        .unwrap();
    assert_eq!(page.total_elements, 3);
    assert_eq!(page.total_pages, 2);
    let names: Vec<&str> = page.content.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Beta", "Gamma"]);
}

#[tokio::test]
async fn should_search_names_case_insensitively_and_reject_blank_search() {
    let store = InMemoryStore::new();
    let create = CreateProductUseCase {
        repo: store.product_repo(),
    };
    let browse = BrowseProductsUseCase {
        repo: store.product_repo(),
    };

    create
        .execute(new_product("Steel Widget", "2.00", 1, None), &actor("a"))
        .await
        .unwrap();

    let found = browse.search("wid").await.unwrap();
    assert_eq!(found.len(), 1);

    let err = browse.search("   ").await.unwrap_err();
    assert!(matches!(err, InventoryError::InvalidSearch));
}
