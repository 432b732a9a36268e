mod common;

use async_trait::async_trait;
use common::{eventually, MockBackend};
use farm_monitor::{query_key, FeedObserver, LiveFeed, QueryCache};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Default)]
struct Counter {
    connects: AtomicUsize,
    disconnects: AtomicUsize,
}

#[async_trait]
impl FeedObserver for Counter {
    async fn on_connect(&self) {
        self.connects.fetch_add(1, Ordering::SeqCst);
    }

    async fn on_disconnect(&self) {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn test_feed_invalidates_equipment_queries() {
    let backend = MockBackend::start().await;
    let cache = QueryCache::new(Duration::from_secs(60));
    cache.set_data(query_key!["pumps", 0u32, 10u32], 1u8);
    cache.set_data(query_key!["statistics", "dashboard"], 1u8);
    cache.set_data(query_key!["farmers", 0u32, 10u32], 1u8);

    let feed = LiveFeed::from_config(&backend.config())
        .unwrap()
        .start(cache.clone());

    assert!(
        eventually(|| feed.last_message().is_some()).await,
        "no message received"
    );
    let message = feed.last_message().unwrap();
    assert_eq!(message.event_type(), Some("EQUIPMENT_FAILURE"));
    assert_eq!(message.as_event().unwrap().message, "Pump stopped");

    assert!(cache.is_stale(&query_key!["pumps", 0u32, 10u32]));
    assert!(cache.is_stale(&query_key!["statistics", "dashboard"]));
    assert!(!cache.is_stale(&query_key!["farmers", 0u32, 10u32]));

    feed.disconnect().await;
    assert!(!feed.is_connected());
}

#[tokio::test]
async fn test_feed_reconnects_after_close() {
    let backend = MockBackend::start().await;
    let counter = Arc::new(Counter::default());

    let feed = LiveFeed::from_config(&backend.config())
        .unwrap()
        .with_reconnect_delay(Duration::from_millis(20))
        .with_observer(counter.clone())
        .start(QueryCache::default());

    // the mock closes every connection right after one event
    assert!(eventually(|| backend.state.ws_connections.load(Ordering::SeqCst) >= 3).await);
    assert!(counter.connects.load(Ordering::SeqCst) >= 2);
    assert!(counter.disconnects.load(Ordering::SeqCst) >= 1);

    feed.disconnect().await;
    // let a handshake that was cut short reach the mock
    tokio::time::sleep(Duration::from_millis(50)).await;
    let after = backend.state.ws_connections.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(backend.state.ws_connections.load(Ordering::SeqCst), after);
}

#[tokio::test]
async fn test_unreachable_feed_keeps_retrying_until_disconnect() {
    let counter = Arc::new(Counter::default());
    let feed = LiveFeed::new("ws://127.0.0.1:1/ws-events")
        .with_reconnect_delay(Duration::from_millis(10))
        .with_observer(counter.clone())
        .start(QueryCache::default());

    assert!(eventually(|| counter.disconnects.load(Ordering::SeqCst) >= 2).await);
    assert!(!feed.is_connected());
    assert_eq!(counter.connects.load(Ordering::SeqCst), 0);
    feed.disconnect().await;
}
