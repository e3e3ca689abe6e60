//! Integration tests for the checkout engine: atomicity, price snapshots,
//! total verification, and oversell prevention under concurrent orders.

mod common;

use common::*;
use mercado_core::{MovementDirection, MovementReason, OrderItem, Role};
use mercado_db::{OrderRequest, StoreError, UpdateProduct};

fn order(user_id: &str, items: Vec<(String, i64)>, total_cents: i64) -> OrderRequest {
    OrderRequest {
        user_id: user_id.to_string(),
        items: items
            .into_iter()
            .map(|(product_id, quantity)| OrderItem {
                product_id,
                quantity,
            })
            .collect(),
        declared_total_cents: total_cents,
        payment_method_id: "cash".to_string(),
    }
}

#[tokio::test]
async fn order_commits_header_lines_movement_and_stock_together() {
    let db = test_db().await;
    let user = seed_user(&db, Role::Customer).await;
    let product = seed_product(&db, "Pan integral", 100).await;
    seed_stock(&db, &product, &user, 10).await;

    let receipt = db
        .checkout()
        .place_order(order(&user, vec![(product.clone(), 4)], 400))
        .await
        .unwrap();

    assert_eq!(receipt.total_cents, 400);
    assert_eq!(stock_of(&db, &product).await, 6);

    let sale = db.sales().get(&receipt.sale_id).await.unwrap().unwrap();
    assert_eq!(sale.total_cents, 400);
    assert_eq!(sale.user_id, user);
    assert_eq!(sale.payment_method_id, "cash");

    let lines = db.sales().line_items(&receipt.sale_id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity, 4);
    assert_eq!(lines[0].unit_price_cents, 100);

    // Exactly one sale movement, referencing the sale id.
    let movements = db.sales().movements_for_product(&product).await.unwrap();
    let sale_movements: Vec<_> = movements
        .iter()
        .filter(|m| m.reason == MovementReason::Sale)
        .collect();
    assert_eq!(sale_movements.len(), 1);
    assert_eq!(sale_movements[0].quantity, 4);
    assert_eq!(sale_movements[0].direction, MovementDirection::Outbound);
    assert_eq!(sale_movements[0].document_ref, receipt.sale_id);
}

#[tokio::test]
async fn insufficient_stock_on_any_line_rolls_back_the_whole_order() {
    let db = test_db().await;
    let user = seed_user(&db, Role::Customer).await;
    let plenty = seed_product(&db, "Fideos 500g", 150).await;
    let scarce = seed_product(&db, "Aceite 1L", 800).await;
    seed_stock(&db, &plenty, &user, 50).await;
    seed_stock(&db, &scarce, &user, 1).await;

    let err = db
        .checkout()
        .place_order(order(
            &user,
            vec![(plenty.clone(), 3), (scarce.clone(), 5)],
            4450,
        ))
        .await
        .unwrap_err();

    match err {
        StoreError::InsufficientStock {
            product_id,
            available,
            requested,
        } => {
            assert_eq!(product_id, scarce);
            assert_eq!(available, 1);
            assert_eq!(requested, 5);
        }
        other => panic!("expected InsufficientStock, got {other:?}"),
    }

    // Nothing survived: no sale, no lines, both counters intact, and the
    // already-processed first line left no movement behind.
    assert_eq!(count(&db, "SELECT COUNT(*) FROM sales").await, 0);
    assert_eq!(count(&db, "SELECT COUNT(*) FROM sale_items").await, 0);
    assert_eq!(stock_of(&db, &plenty).await, 50);
    assert_eq!(stock_of(&db, &scarce).await, 1);
    let sale_movements = count(
        &db,
        "SELECT COUNT(*) FROM inventory_movements WHERE reason = 'sale'",
    )
    .await;
    assert_eq!(sale_movements, 0);
}

#[tokio::test]
async fn line_items_keep_the_price_at_time_of_sale() {
    let db = test_db().await;
    let user = seed_user(&db, Role::Customer).await;
    let product = seed_product(&db, "Yerba 1kg", 10_000).await;
    seed_stock(&db, &product, &user, 5).await;

    let receipt = db
        .checkout()
        .place_order(order(&user, vec![(product.clone(), 2)], 20_000))
        .await
        .unwrap();

    // Price rises after the sale; history must not move.
    db.products()
        .update(
            &product,
            UpdateProduct {
                name: "Yerba 1kg".to_string(),
                description: None,
                price_cents: 15_000,
                category_id: None,
                image_url: None,
                is_available: true,
            },
        )
        .await
        .unwrap();

    let lines = db.sales().line_items(&receipt.sale_id).await.unwrap();
    assert_eq!(lines[0].unit_price_cents, 10_000);

    let sale = db.sales().get(&receipt.sale_id).await.unwrap().unwrap();
    assert_eq!(sale.total_cents, 20_000);
}

#[tokio::test]
async fn declared_total_mismatch_rejects_the_order() {
    let db = test_db().await;
    let user = seed_user(&db, Role::Customer).await;
    let product = seed_product(&db, "Queso 300g", 1_200).await;
    seed_stock(&db, &product, &user, 10).await;

    let err = db
        .checkout()
        .place_order(order(&user, vec![(product.clone(), 2)], 999))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Validation(_)));
    assert_eq!(count(&db, "SELECT COUNT(*) FROM sales").await, 0);
    assert_eq!(stock_of(&db, &product).await, 10);
}

#[tokio::test]
async fn malformed_orders_fail_before_any_transaction() {
    let db = test_db().await;
    let user = seed_user(&db, Role::Customer).await;

    // Empty cart
    assert!(matches!(
        db.checkout().place_order(order(&user, vec![], 0)).await,
        Err(StoreError::Validation(_))
    ));

    // Zero quantity
    assert!(matches!(
        db.checkout()
            .place_order(order(&user, vec![("p1".to_string(), 0)], 0))
            .await,
        Err(StoreError::Validation(_))
    ));

    // Missing payment method
    let mut request = order(&user, vec![("p1".to_string(), 1)], 100);
    request.payment_method_id = "".to_string();
    assert!(matches!(
        db.checkout().place_order(request).await,
        Err(StoreError::Validation(_))
    ));

    assert_eq!(count(&db, "SELECT COUNT(*) FROM sales").await, 0);
}

#[tokio::test]
async fn unknown_or_unavailable_products_reject_the_order() {
    let db = test_db().await;
    let user = seed_user(&db, Role::Customer).await;

    let err = db
        .checkout()
        .place_order(order(&user, vec![("no-such-product".to_string(), 1)], 100))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Unexpected(_)));

    // A delisted product cannot be bought even with stock on hand.
    let delisted = seed_product(&db, "Descatalogado", 500).await;
    seed_stock(&db, &delisted, &user, 10).await;
    db.products()
        .update(
            &delisted,
            UpdateProduct {
                name: "Descatalogado".to_string(),
                description: None,
                price_cents: 500,
                category_id: None,
                image_url: None,
                is_available: false,
            },
        )
        .await
        .unwrap();

    let err = db
        .checkout()
        .place_order(order(&user, vec![(delisted.clone(), 1)], 500))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Unexpected(_)));
    assert_eq!(stock_of(&db, &delisted).await, 10);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_orders_never_oversell() {
    let db = test_db().await;
    let user = seed_user(&db, Role::Customer).await;
    let product = seed_product(&db, "Último stock", 100).await;
    seed_stock(&db, &product, &user, 5).await;

    // Two orders of 3 units race for 5 units of stock. Exactly one can win.
    let db_a = db.clone();
    let db_b = db.clone();
    let order_a = order(&user, vec![(product.clone(), 3)], 300);
    let order_b = order(&user, vec![(product.clone(), 3)], 300);

    let (result_a, result_b) = tokio::join!(
        tokio::spawn(async move { db_a.checkout().place_order(order_a).await }),
        tokio::spawn(async move { db_b.checkout().place_order(order_b).await }),
    );
    let result_a = result_a.unwrap();
    let result_b = result_b.unwrap();

    let successes = [&result_a, &result_b]
        .iter()
        .filter(|r| r.is_ok())
        .count();
    assert_eq!(successes, 1, "exactly one of the racing orders must win");

    let loser = if result_a.is_err() {
        result_a.unwrap_err()
    } else {
        result_b.unwrap_err()
    };
    assert!(matches!(loser, StoreError::InsufficientStock { .. }));

    assert_eq!(stock_of(&db, &product).await, 2);
    assert_eq!(count(&db, "SELECT COUNT(*) FROM sales").await, 1);
    let sale_movements = count(
        &db,
        "SELECT COUNT(*) FROM inventory_movements WHERE reason = 'sale'",
    )
    .await;
    assert_eq!(sale_movements, 1);
}
