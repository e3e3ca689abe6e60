//! Integration tests for the stock ledger: counter/log pairing, oversell
//! rejection, and the reconstructibility of stock from the movement log.

mod common;

use common::*;
use mercado_core::{MovementDirection, MovementReason, Role};
use mercado_db::{AdjustmentRequest, StoreError};

fn adjustment(
    product_id: &str,
    user_id: &str,
    direction: MovementDirection,
    quantity: i64,
) -> AdjustmentRequest {
    AdjustmentRequest {
        product_id: product_id.to_string(),
        direction,
        quantity,
        document_ref: "PO-100".to_string(),
        comment: Some("receiving".to_string()),
        user_id: user_id.to_string(),
    }
}

#[tokio::test]
async fn inbound_adjustment_creates_stock_row_and_logs_movement() {
    let db = test_db().await;
    let user = seed_user(&db, Role::Employee).await;
    let product = seed_product(&db, "Arroz 1kg", 250).await;

    // No stock row exists yet; the ledger creates it at zero first.
    let new_stock = db
        .ledger()
        .record_adjustment(adjustment(
            &product,
            &user,
            MovementDirection::Inbound,
            20,
        ))
        .await
        .unwrap();

    assert_eq!(new_stock, 20);
    assert_eq!(stock_of(&db, &product).await, 20);

    let movements = db.sales().movements_for_product(&product).await.unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].quantity, 20);
    assert_eq!(movements[0].direction, MovementDirection::Inbound);
    assert_eq!(movements[0].reason, MovementReason::ManualIn);
    assert_eq!(movements[0].document_ref, "PO-100");
    assert_eq!(movements[0].user_id, user);
}

#[tokio::test]
async fn outbound_then_inbound_tracks_the_counter() {
    let db = test_db().await;
    let user = seed_user(&db, Role::Employee).await;
    let product = seed_product(&db, "Leche 1L", 180).await;
    seed_stock(&db, &product, &user, 10).await;

    let after_out = db
        .ledger()
        .record_adjustment(adjustment(&product, &user, MovementDirection::Outbound, 4))
        .await
        .unwrap();
    assert_eq!(after_out, 6);

    let after_in = db
        .ledger()
        .record_adjustment(adjustment(&product, &user, MovementDirection::Inbound, 20))
        .await
        .unwrap();
    assert_eq!(after_in, 26);
    assert_eq!(stock_of(&db, &product).await, 26);
}

#[tokio::test]
async fn oversell_is_rejected_and_leaves_no_rows() {
    let db = test_db().await;
    let user = seed_user(&db, Role::Employee).await;
    let product = seed_product(&db, "Azúcar 1kg", 300).await;
    seed_stock(&db, &product, &user, 2).await;

    let err = db
        .ledger()
        .record_adjustment(adjustment(&product, &user, MovementDirection::Outbound, 5))
        .await
        .unwrap_err();

    match err {
        StoreError::InsufficientStock {
            available,
            requested,
            ..
        } => {
            assert_eq!(available, 2);
            assert_eq!(requested, 5);
        }
        other => panic!("expected InsufficientStock, got {other:?}"),
    }

    // Counter untouched, log has only the seed movement.
    assert_eq!(stock_of(&db, &product).await, 2);
    let movements = db.sales().movements_for_product(&product).await.unwrap();
    assert_eq!(movements.len(), 1);
}

#[tokio::test]
async fn invalid_requests_fail_before_any_transaction() {
    let db = test_db().await;
    let user = seed_user(&db, Role::Employee).await;
    let product = seed_product(&db, "Harina 1kg", 200).await;

    let bad_quantity = AdjustmentRequest {
        quantity: 0,
        ..adjustment(&product, &user, MovementDirection::Inbound, 0)
    };
    assert!(matches!(
        db.ledger().record_adjustment(bad_quantity).await,
        Err(StoreError::Validation(_))
    ));

    let missing_doc = AdjustmentRequest {
        document_ref: "   ".to_string(),
        ..adjustment(&product, &user, MovementDirection::Inbound, 5)
    };
    assert!(matches!(
        db.ledger().record_adjustment(missing_doc).await,
        Err(StoreError::Validation(_))
    ));

    assert_eq!(
        count(&db, "SELECT COUNT(*) FROM inventory_movements").await,
        0
    );
    assert_eq!(stock_of(&db, &product).await, 0);
}

#[tokio::test]
async fn unknown_product_surfaces_as_unexpected() {
    let db = test_db().await;
    let user = seed_user(&db, Role::Employee).await;

    let err = db
        .ledger()
        .record_adjustment(adjustment(
            "no-such-product",
            &user,
            MovementDirection::Inbound,
            5,
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Unexpected(_)));
}

#[tokio::test]
async fn stock_is_reconstructible_from_the_movement_log() {
    let db = test_db().await;
    let user = seed_user(&db, Role::Employee).await;
    let product = seed_product(&db, "Café 500g", 900).await;

    for (direction, quantity) in [
        (MovementDirection::Inbound, 30),
        (MovementDirection::Outbound, 7),
        (MovementDirection::Inbound, 12),
        (MovementDirection::Outbound, 5),
    ] {
        db.ledger()
            .record_adjustment(adjustment(&product, &user, direction, quantity))
            .await
            .unwrap();
    }

    let movements = db.sales().movements_for_product(&product).await.unwrap();
    let reconstructed: i64 = movements
        .iter()
        .map(|m| match m.direction {
            MovementDirection::Inbound => m.quantity,
            MovementDirection::Outbound => -m.quantity,
        })
        .sum();

    assert_eq!(reconstructed, 30);
    assert_eq!(stock_of(&db, &product).await, reconstructed);
}
