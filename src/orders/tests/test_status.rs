use super::*;
use crate::models::OrderStatus;
use crate::notify::NotifyEvent;
use crate::orders::OrderError;

fn place_order(service: &OrderService, user: &str, items: &[(&str, &str, u32)]) -> String {
    seed_user(service, user);
    let mut ids = Vec::new();
    for (cart_id, product_id, quantity) in items {
        seed_cart_item(service, cart_id, user, product_id, *quantity);
        ids.push(cart_id.to_string());
    }
    service.create_order(user, &ids).unwrap().id
}

#[test]
fn test_cancel_restores_stock() {
    let service = create_test_service();
    seed_product(&service, "p1", "Margherita", 500, 10);
    let order_id = place_order(&service, "alice", &[("c1", "p1", 3)]);
    assert_eq!(stock_of(&service, "p1"), 7);

    let order = service.change_status(&order_id, "Canceled").unwrap();

    assert_eq!(order.status, OrderStatus::Canceled);
    assert_eq!(stock_of(&service, "p1"), 10);
}

#[test]
fn test_cancel_restores_every_line_exactly() {
    let service = create_test_service();
    seed_product(&service, "p1", "Margherita", 500, 10);
    seed_product(&service, "p2", "Tiramisu", 300, 6);
    let order_id = place_order(&service, "alice", &[("c1", "p1", 4), ("c2", "p2", 2)]);
    assert_eq!(stock_of(&service, "p1"), 6);
    assert_eq!(stock_of(&service, "p2"), 4);

    service.change_status(&order_id, "Canceled").unwrap();

    assert_eq!(stock_of(&service, "p1"), 10);
    assert_eq!(stock_of(&service, "p2"), 6);
}

#[test]
fn test_unknown_status_rejected_and_order_unchanged() {
    let service = create_test_service();
    seed_product(&service, "p1", "Margherita", 500, 10);
    let order_id = place_order(&service, "alice", &[("c1", "p1", 3)]);

    let err = service.change_status(&order_id, "Shipped").unwrap_err();
    match err {
        OrderError::InvalidStatus { given, valid } => {
            assert_eq!(given, "Shipped");
            assert_eq!(valid, OrderStatus::VALID_VALUES);
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let stored = service.get_order(&order_id).unwrap();
    assert_eq!(stored.status, OrderStatus::Pending);
    assert_eq!(stock_of(&service, "p1"), 7);
}

#[test]
fn test_status_strings_parse_case_insensitively() {
    let service = create_test_service();
    seed_product(&service, "p1", "Margherita", 500, 10);
    let order_id = place_order(&service, "alice", &[("c1", "p1", 3)]);

    let order = service.change_status(&order_id, "canceled").unwrap();
    assert_eq!(order.status, OrderStatus::Canceled);
    assert_eq!(stock_of(&service, "p1"), 10);
}

#[test]
fn test_change_status_unknown_order() {
    let service = create_test_service();
    let err = service.change_status("ghost", "Completed").unwrap_err();
    assert!(matches!(err, OrderError::OrderNotFound(id) if id == "ghost"));
}

#[test]
fn test_double_cancel_credits_stock_once() {
    let service = create_test_service();
    seed_product(&service, "p1", "Margherita", 500, 10);
    let order_id = place_order(&service, "alice", &[("c1", "p1", 3)]);

    service.change_status(&order_id, "Canceled").unwrap();
    let err = service.change_status(&order_id, "Canceled").unwrap_err();

    match err {
        OrderError::OrderFinalized { order_id: id, status } => {
            assert_eq!(id, order_id);
            assert_eq!(status, OrderStatus::Canceled);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(stock_of(&service, "p1"), 10);
}

#[test]
fn test_completed_order_cannot_be_canceled() {
    let service = create_test_service();
    seed_product(&service, "p1", "Margherita", 500, 10);
    let order_id = place_order(&service, "alice", &[("c1", "p1", 3)]);

    service.change_status(&order_id, "Completed").unwrap();
    let err = service.change_status(&order_id, "Canceled").unwrap_err();

    assert!(matches!(err, OrderError::OrderFinalized { .. }));
    assert_eq!(stock_of(&service, "p1"), 7);
}

#[test]
fn test_completion_and_delivery_emit_notifications() {
    let service = create_test_service();
    seed_product(&service, "p1", "Margherita", 500, 10);
    seed_product(&service, "p2", "Tiramisu", 300, 10);
    let first = place_order(&service, "alice", &[("c1", "p1", 1)]);
    let second = place_order(&service, "bob", &[("c2", "p2", 1)]);

    let mut rx = service.notifier().subscribe();
    service.change_status(&first, "Completed").unwrap();
    service.change_status(&second, "Delivered").unwrap();

    assert_eq!(
        rx.try_recv().unwrap(),
        NotifyEvent::StatusChanged {
            order_id: first,
            status: OrderStatus::Completed,
        }
    );
    assert_eq!(
        rx.try_recv().unwrap(),
        NotifyEvent::StatusChanged {
            order_id: second,
            status: OrderStatus::Delivered,
        }
    );
}

#[test]
fn test_cancel_emits_no_notification() {
    let service = create_test_service();
    seed_product(&service, "p1", "Margherita", 500, 10);
    let order_id = place_order(&service, "alice", &[("c1", "p1", 1)]);

    let mut rx = service.notifier().subscribe();
    service.change_status(&order_id, "Canceled").unwrap();

    assert!(rx.try_recv().is_err());
}

#[test]
fn test_cancel_skips_credit_for_deleted_product() {
    let service = create_test_service();
    seed_product(&service, "p1", "Margherita", 500, 10);
    seed_product(&service, "p2", "Tiramisu", 300, 6);
    let order_id = place_order(&service, "alice", &[("c1", "p1", 3), ("c2", "p2", 2)]);

    service.storage().delete_product("p1").unwrap();

    let order = service.change_status(&order_id, "Canceled").unwrap();
    assert_eq!(order.status, OrderStatus::Canceled);

    // The surviving product is credited; the deleted one is skipped.
    assert!(service.storage().get_product("p1").unwrap().is_none());
    assert_eq!(stock_of(&service, "p2"), 6);
}
