use futures_util::StreamExt;
use order_notifications::intake::OrderError;
use order_notifications::lifecycle::NotificationSystem;
use order_notifications::model::{AddOrderRequest, NotificationEvent, OrderLineDto};
use order_notifications::publisher::NotificationStream;
use std::time::Duration;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

fn request(lines: &[(&str, &str, i64)]) -> AddOrderRequest {
    AddOrderRequest {
        products: lines
            .iter()
            .map(|(name, price, quantity)| OrderLineDto {
                name: name.to_string(),
                price: price.parse().expect("valid decimal"),
                quantity: *quantity,
            })
            .collect(),
    }
}

async fn next_event(events: &mut NotificationStream) -> NotificationEvent {
    timeout(Duration::from_secs(2), events.next())
        .await
        .expect("timed out waiting for a notification")
        .expect("stream ended early")
}

async fn collect_messages(events: &mut NotificationStream, n: usize) -> Vec<String> {
    let mut messages = Vec::with_capacity(n);
    for _ in 0..n {
        messages.push(next_event(events).await.message);
    }
    messages
}

fn sample_orders() -> Vec<AddOrderRequest> {
    vec![
        request(&[("Widget", "9.99", 2)]),
        request(&[("Gadget", "12.50", 1), ("Sprocket", "0.75", 10)]),
        request(&[("Gizmo", "100", 3)]),
    ]
}

const SAMPLE_MESSAGES: [&str; 3] = [
    "New order, Summary: Widget x 2, at 9.99",
    "New order, Summary: Gadget x 1, at 12.50 , Sprocket x 10, at 0.75",
    "New order, Summary: Gizmo x 3, at 100",
];

/// Full end-to-end flow: orders in, one notification per order out, in
/// submission order with the exact summary text.
#[tokio::test]
async fn test_orders_produce_notifications_in_order() {
    let system = NotificationSystem::new();
    let mut events = system.publisher.subscribe(CancellationToken::new());

    for order in sample_orders() {
        system.orders.create_order(order).expect("order accepted");
    }

    let messages = collect_messages(&mut events, 3).await;
    assert_eq!(messages, SAMPLE_MESSAGES);

    let report = system.shutdown().await.expect("clean shutdown");
    assert_eq!(report.processed, 3);
    assert_eq!(report.failed, 0);

    // The hub was closed, so the stream ends
    assert!(events.next().await.is_none());
}

/// Two concurrent clients each receive every notification.
#[tokio::test]
async fn test_concurrent_clients_each_receive_every_event() {
    let system = NotificationSystem::new();
    let mut first = system.publisher.subscribe(CancellationToken::new());
    let mut second = system.publisher.subscribe(CancellationToken::new());
    assert_eq!(system.publisher.subscriber_count(), 2);

    for order in sample_orders() {
        system.orders.create_order(order).unwrap();
    }

    let (a, b) = tokio::join!(
        collect_messages(&mut first, 3),
        collect_messages(&mut second, 3)
    );
    assert_eq!(a, SAMPLE_MESSAGES);
    assert_eq!(b, SAMPLE_MESSAGES);

    system.shutdown().await.unwrap();
}

/// A client that connects after a notification went out does not get it.
#[tokio::test]
async fn test_late_client_misses_earlier_events() {
    let system = NotificationSystem::new();
    let mut early = system.publisher.subscribe(CancellationToken::new());

    system
        .orders
        .create_order(request(&[("Widget", "9.99", 2)]))
        .unwrap();
    assert_eq!(next_event(&mut early).await.message, SAMPLE_MESSAGES[0]);

    let mut late = system.publisher.subscribe(CancellationToken::new());
    system
        .orders
        .create_order(request(&[("Gizmo", "100", 3)]))
        .unwrap();

    assert_eq!(next_event(&mut early).await.message, SAMPLE_MESSAGES[2]);
    assert_eq!(next_event(&mut late).await.message, SAMPLE_MESSAGES[2]);

    system.shutdown().await.unwrap();
    assert!(late.next().await.is_none());
}

/// Cancelling a client ends its stream promptly and leaves the other client
/// and the processor untouched.
#[tokio::test]
async fn test_client_cancellation_ends_only_that_stream() {
    let system = NotificationSystem::new();
    let leaving = CancellationToken::new();
    let mut leaving_events = system.publisher.subscribe(leaving.clone());
    let mut staying_events = system.publisher.subscribe(CancellationToken::new());

    leaving.cancel();
    let ended = timeout(Duration::from_millis(500), leaving_events.next())
        .await
        .expect("cancelled stream did not end promptly");
    assert!(ended.is_none());

    drop(leaving_events);
    assert_eq!(system.publisher.subscriber_count(), 1);

    system
        .orders
        .create_order(request(&[("Widget", "9.99", 2)]))
        .unwrap();
    assert_eq!(next_event(&mut staying_events).await.message, SAMPLE_MESSAGES[0]);

    let report = system.shutdown().await.unwrap();
    assert_eq!(report.processed, 1);
}

/// Invalid orders are rejected at intake and produce no notification.
#[tokio::test]
async fn test_invalid_orders_never_notify() {
    let system = NotificationSystem::new();
    let mut events = system.publisher.subscribe(CancellationToken::new());

    let rejected = [
        request(&[]),
        request(&[("ab", "1", 1)]),
        request(&[("Widget", "0", 1)]),
        request(&[("Widget", "1", 0)]),
        request(&[("Widget", "1", -3)]),
    ];
    for order in rejected {
        assert!(system.orders.create_order(order).is_err());
    }
    assert_eq!(system.orders.pending(), 0);

    system
        .orders
        .create_order(request(&[("Gizmo", "100", 3)]))
        .unwrap();

    // The first notification is the only valid order
    assert_eq!(next_event(&mut events).await.message, SAMPLE_MESSAGES[2]);

    let report = system.shutdown().await.unwrap();
    assert_eq!(report, pipeline_framework::WorkerReport { processed: 1, failed: 0 });
}

/// The same orders on two fresh systems yield the same messages.
#[tokio::test]
async fn test_fresh_systems_produce_identical_messages() {
    let mut runs = Vec::new();

    for _ in 0..2 {
        let system = NotificationSystem::new();
        let mut events = system.publisher.subscribe(CancellationToken::new());
        for order in sample_orders() {
            system.orders.create_order(order).unwrap();
        }
        runs.push(collect_messages(&mut events, 3).await);
        system.shutdown().await.unwrap();
    }

    assert_eq!(runs[0], runs[1]);
}

/// After shutdown, intake reports the pipeline as closed.
#[tokio::test]
async fn test_submit_after_shutdown_fails() {
    let system = NotificationSystem::default();
    let orders = system.orders.clone();

    system.shutdown().await.unwrap();

    let result = orders.create_order(request(&[("Widget", "9.99", 2)]));
    assert_eq!(result, Err(OrderError::PipelineClosed));
}

/// Events carry a UTC timestamp taken when the processor built them.
#[tokio::test]
async fn test_event_timestamp_follows_submission() {
    let system = NotificationSystem::new();
    let mut events = system.publisher.subscribe(CancellationToken::new());

    let before = chrono::Utc::now();
    system
        .orders
        .create_order(request(&[("Widget", "9.99", 2)]))
        .unwrap();
    let event = next_event(&mut events).await;

    assert!(event.occurred_at >= before);
    assert!(event.occurred_at <= chrono::Utc::now());
    system.shutdown().await.unwrap();
}

/// A publisher handle kept past shutdown hands out streams that end at once
/// and leave no registration behind.
#[tokio::test]
async fn test_subscribe_after_shutdown_ends_immediately() {
    let system = NotificationSystem::new();
    let publisher = system.publisher.clone();

    system.shutdown().await.unwrap();

    let mut events = publisher.subscribe(CancellationToken::new());
    let ended = timeout(Duration::from_millis(500), events.next())
        .await
        .expect("stream on a stopped pipeline did not end");
    assert!(ended.is_none());
    assert_eq!(publisher.subscriber_count(), 0);
}
