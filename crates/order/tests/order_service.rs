mod common;

use common::{Harness, TOPIC, item, order_request};
use order::{
    abstract_trait::order::service::{OrderCommandServiceTrait, OrderQueryServiceTrait},
    domain::{requests::order::UpdateOrderStatusRequest, response::order::EventDelivery},
    model::order::OrderStatus,
};
use shared::{domain::event::OrderEvent, errors::ServiceError};
use std::{sync::atomic::Ordering, time::Duration};
use uuid::Uuid;

fn status(value: &str) -> UpdateOrderStatusRequest {
    UpdateOrderStatusRequest {
        status: value.to_string(),
    }
}

#[tokio::test]
async fn create_order_totals_items_and_starts_pending() {
    let h = Harness::new().await;

    let created = h
        .command
        .create_order(7, &order_request(vec![item(2, 10.0), item(1, 5.0)]))
        .await
        .unwrap();

    assert_eq!(created.order.total_price, 25.0);
    assert_eq!(created.order.status, OrderStatus::Pending);
    assert_eq!(created.order.user_id, 7);
    assert_eq!(created.order.items.len(), 2);
    assert_eq!(created.order.items[0].total, 20.0);
    assert_eq!(created.event, EventDelivery::Published);
    assert!(h.orders.stored(created.order.id).is_some());
}

#[tokio::test]
async fn create_order_publishes_one_new_order_event_keyed_by_id() {
    let h = Harness::new().await;

    let created = h
        .command
        .create_order(3, &order_request(vec![item(1, 9.99)]))
        .await
        .unwrap();

    let sent = h.kafka.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].topic, TOPIC);
    assert_eq!(sent[0].key, created.order.id.to_string());

    let event: OrderEvent = serde_json::from_slice(&sent[0].payload).unwrap();
    assert_eq!(
        event,
        OrderEvent::Created {
            order_id: created.order.id,
            user_id: 3,
        }
    );
}

#[tokio::test]
async fn create_order_does_not_prepopulate_cache() {
    let h = Harness::new().await;

    let created = h
        .command
        .create_order(1, &order_request(vec![item(1, 1.0)]))
        .await
        .unwrap();

    assert!(h.cache.entry(created.order.id).is_none());
}

#[tokio::test]
async fn empty_items_are_rejected_without_side_effects() {
    let h = Harness::new().await;

    let err = h
        .command
        .create_order(1, &order_request(vec![]))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Validation(_)));
    assert_eq!(h.orders.writes(), 0);
    assert!(h.kafka.sent().is_empty());
}

#[tokio::test]
async fn invalid_quantity_or_price_is_rejected_without_side_effects() {
    let h = Harness::new().await;

    for bad in [item(0, 1.0), item(-1, 1.0), item(1, 0.0), item(1, f64::NAN)] {
        let err = h
            .command
            .create_order(1, &order_request(vec![item(1, 2.0), bad]))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    assert_eq!(h.orders.writes(), 0);
    assert!(h.kafka.sent().is_empty());
}

#[tokio::test]
async fn publish_failure_keeps_the_committed_order() {
    let h = Harness::new().await;
    h.kafka.fail.store(true, Ordering::SeqCst);

    let created = h
        .command
        .create_order(5, &order_request(vec![item(1, 4.0)]))
        .await
        .unwrap();

    assert!(matches!(created.event, EventDelivery::Failed(_)));
    assert_eq!(h.command.publish_failures(), 1);

    let read = h.query.find_by_id(created.order.id).await.unwrap();
    assert_eq!(read, created.order);
}

#[tokio::test]
async fn store_failure_on_create_publishes_nothing() {
    let h = Harness::new().await;
    h.orders.fail.store(true, Ordering::SeqCst);

    let err = h
        .command
        .create_order(5, &order_request(vec![item(1, 4.0)]))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Repo(_)));
    assert!(h.kafka.sent().is_empty());
}

#[tokio::test]
async fn repeated_reads_are_identical_and_second_skips_the_store() {
    let h = Harness::new().await;
    let created = h
        .command
        .create_order(2, &order_request(vec![item(3, 2.5)]))
        .await
        .unwrap();

    let first = h.query.find_by_id(created.order.id).await.unwrap();
    let reads_after_first = h.orders.reads();
    let second = h.query.find_by_id(created.order.id).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(reads_after_first, 1);
    assert_eq!(h.orders.reads(), 1);
}

#[tokio::test]
async fn read_miss_populates_cache_with_configured_ttl() {
    let h = Harness::new().await;
    let created = h
        .command
        .create_order(2, &order_request(vec![item(1, 1.0)]))
        .await
        .unwrap();

    h.query.find_by_id(created.order.id).await.unwrap();

    let (cached, ttl) = h.cache.entry(created.order.id).unwrap();
    assert_eq!(cached, created.order);
    assert_eq!(ttl, Duration::from_secs(300));
}

#[tokio::test]
async fn unknown_order_is_not_found_and_not_cached() {
    let h = Harness::new().await;
    let missing = Uuid::new_v4();

    let err = h.query.find_by_id(missing).await.unwrap_err();

    assert!(matches!(err, ServiceError::NotFound(_)));
    assert!(h.cache.entry(missing).is_none());
}

#[tokio::test]
async fn cache_outage_falls_back_to_store() {
    let h = Harness::new().await;
    let created = h
        .command
        .create_order(2, &order_request(vec![item(1, 1.0)]))
        .await
        .unwrap();
    h.cache.fail.store(true, Ordering::SeqCst);

    let first = h.query.find_by_id(created.order.id).await.unwrap();
    let second = h.query.find_by_id(created.order.id).await.unwrap();

    assert_eq!(first, created.order);
    assert_eq!(second, created.order);
    assert_eq!(h.orders.reads(), 2);
}

#[tokio::test]
async fn update_status_invalidates_so_reads_never_see_old_status() {
    let h = Harness::new().await;
    let created = h
        .command
        .create_order(2, &order_request(vec![item(1, 1.0)]))
        .await
        .unwrap();
    let id = created.order.id;

    // Warm the cache with the pending snapshot.
    h.query.find_by_id(id).await.unwrap();
    assert!(h.cache.entry(id).is_some());

    let updated = h.command.update_order_status(id, &status("shipped")).await.unwrap();
    assert_eq!(updated.status, OrderStatus::Shipped);
    assert!(h.cache.entry(id).is_none());

    let read = h.query.find_by_id(id).await.unwrap();
    assert_eq!(read.status, OrderStatus::Shipped);
}

#[tokio::test]
async fn cache_failure_during_update_is_swallowed() {
    let h = Harness::new().await;
    let created = h
        .command
        .create_order(2, &order_request(vec![item(1, 1.0)]))
        .await
        .unwrap();
    h.cache.fail.store(true, Ordering::SeqCst);

    let updated = h
        .command
        .update_order_status(created.order.id, &status("paid"))
        .await
        .unwrap();

    assert_eq!(updated.status, OrderStatus::Paid);
    assert_eq!(h.cache.invalidations.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn illegal_status_is_rejected_and_order_unchanged() {
    let h = Harness::new().await;
    let created = h
        .command
        .create_order(2, &order_request(vec![item(1, 1.0)]))
        .await
        .unwrap();
    let reads = h.orders.reads();
    let writes = h.orders.writes();

    for bad in ["lost", "PAID", ""] {
        let err = h
            .command
            .update_order_status(created.order.id, &status(bad))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)), "{bad} accepted");
    }

    assert_eq!(h.orders.reads(), reads);
    assert_eq!(h.orders.writes(), writes);
    let stored = h.orders.stored(created.order.id).unwrap();
    assert_eq!(stored.status, OrderStatus::Pending);
}

#[tokio::test]
async fn update_of_unknown_order_is_not_found() {
    let h = Harness::new().await;

    let err = h
        .command
        .update_order_status(Uuid::new_v4(), &status("paid"))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::NotFound(_)));
    assert_eq!(h.orders.writes(), 0);
}

#[tokio::test]
async fn repeated_updates_tolerate_absent_cache_entries() {
    let h = Harness::new().await;
    let created = h
        .command
        .create_order(2, &order_request(vec![item(1, 1.0)]))
        .await
        .unwrap();

    h.command
        .update_order_status(created.order.id, &status("paid"))
        .await
        .unwrap();
    h.command
        .update_order_status(created.order.id, &status("paid"))
        .await
        .unwrap();

    assert_eq!(h.cache.invalidations.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn no_transition_graph_is_enforced() {
    let h = Harness::new().await;
    let created = h
        .command
        .create_order(2, &order_request(vec![item(1, 1.0)]))
        .await
        .unwrap();

    for next in ["canceled", "pending", "shipped"] {
        let updated = h
            .command
            .update_order_status(created.order.id, &status(next))
            .await
            .unwrap();
        assert_eq!(updated.status.as_str(), next);
    }
}

#[tokio::test]
async fn checkout_then_pay_scenario() {
    let h = Harness::new().await;

    let created = h
        .command
        .create_order(11, &order_request(vec![item(2, 10.0), item(1, 5.0)]))
        .await
        .unwrap();
    assert_eq!(created.order.total_price, 25.0);
    assert_eq!(created.order.status, OrderStatus::Pending);

    let paid = h
        .command
        .update_order_status(created.order.id, &status("paid"))
        .await
        .unwrap();
    assert_eq!(paid.status, OrderStatus::Paid);
    assert_eq!(paid.total_price, 25.0);

    let reads_before = h.orders.reads();
    let read = h.query.find_by_id(created.order.id).await.unwrap();
    assert_eq!(read.status, OrderStatus::Paid);
    assert_eq!(read.total_price, 25.0);
    assert_eq!(h.orders.reads(), reads_before + 1);
}

#[tokio::test]
async fn find_by_user_lists_newest_first() {
    let h = Harness::new().await;
    let base = chrono::Utc::now();
    let oldest = h.orders.insert_at(4, base - chrono::Duration::minutes(10));
    let newest = h.orders.insert_at(4, base);
    let middle = h.orders.insert_at(4, base - chrono::Duration::minutes(5));
    h.orders.insert_at(99, base);

    let orders = h.query.find_by_user(4).await.unwrap();
    let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();

    assert_eq!(ids, vec![newest, middle, oldest]);
}

#[tokio::test]
async fn find_by_user_without_orders_is_empty() {
    let h = Harness::new().await;

    let orders = h.query.find_by_user(404).await.unwrap();

    assert!(orders.is_empty());
}

#[tokio::test]
async fn service_metrics_are_registered() {
    let h = Harness::new().await;
    h.command
        .create_order(1, &order_request(vec![item(1, 1.0)]))
        .await
        .unwrap();

    let mut buffer = String::new();
    prometheus_client::encoding::text::encode(&mut buffer, &*h.registry.lock().await).unwrap();

    assert!(buffer.contains("order_command_service_request_counter"));
    assert!(buffer.contains("order_query_service_request_duration"));
    assert!(buffer.contains("order_event_publish_failures_total"));
}
