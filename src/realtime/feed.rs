//! Reconnecting WebSocket feed of equipment events.
//!
//! One task owns the socket. Every text frame is parsed as JSON, kept as the
//! latest message and broadcast to subscribers. Messages whose `eventType`
//! mentions equipment, sensors or maintenance mark the equipment, event and
//! statistics queries stale. When the socket closes or fails the task waits
//! a fixed delay and connects again, forever, until the handle disconnects.

use crate::api::ClientConfig;
use crate::error::{DashboardError, Result};
use crate::models::EquipmentEvent;
use crate::query::QueryCache;
use crate::query_key;
use crate::resources::{EVENTS_KEY, PUMPS_KEY, SENSORS_KEY, STATISTICS_KEY};
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::Stream;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

/// Query groups refreshed by equipment, sensor and maintenance events.
pub const REFRESH_GROUPS: [&str; 4] = [PUMPS_KEY, SENSORS_KEY, EVENTS_KEY, STATISTICS_KEY];

const REFRESH_MARKERS: [&str; 3] = ["EQUIPMENT", "SENSOR", "MAINTENANCE"];

/// A parsed feed payload. Any JSON value is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedMessage(pub serde_json::Value);

impl FeedMessage {
    /// The `eventType` field, when it is a string.
    pub fn event_type(&self) -> Option<&str> {
        self.0.get("eventType").and_then(serde_json::Value::as_str)
    }

    /// Whether this message should refresh [`REFRESH_GROUPS`].
    pub fn triggers_refresh(&self) -> bool {
        self.event_type()
            .is_some_and(|kind| REFRESH_MARKERS.iter().any(|marker| kind.contains(marker)))
    }

    /// Decode as a full event record, if it is one.
    pub fn as_event(&self) -> Option<EquipmentEvent> {
        serde_json::from_value(self.0.clone()).ok()
    }
}

/// Connection lifecycle callbacks.
#[async_trait]
pub trait FeedObserver: Send + Sync {
    async fn on_connect(&self) {}

    async fn on_disconnect(&self) {}

    async fn on_error(&self, _error: &DashboardError) {}
}

/// Feed settings. Call [`start`](LiveFeed::start) to connect.
#[derive(Clone)]
pub struct LiveFeed {
    url: String,
    reconnect_delay: Duration,
    enabled: bool,
    observer: Option<Arc<dyn FeedObserver>>,
}

impl std::fmt::Debug for LiveFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveFeed")
            .field("url", &self.url)
            .field("reconnect_delay", &self.reconnect_delay)
            .field("enabled", &self.enabled)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl LiveFeed {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reconnect_delay: Duration::from_millis(crate::DEFAULT_RECONNECT_DELAY_MS),
            enabled: true,
            observer: None,
        }
    }

    /// Feed settings from the client configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let url = config.feed_url()?;
        Ok(Self::new(url.as_str())
            .with_reconnect_delay(config.reconnect_delay())
            .with_enabled(config.live_updates))
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// A disabled feed never opens a connection.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn FeedObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Connect in the background and return the controlling handle.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(self, cache: QueryCache) -> FeedHandle {
        let (messages, _) = broadcast::channel(256);
        let handle = FeedHandle {
            shared: Arc::new(FeedShared {
                feed: self,
                cache,
                connected: AtomicBool::new(false),
                last_message: RwLock::new(None),
                messages,
            }),
            worker: Mutex::new(None),
        };
        handle.spawn_worker();
        handle
    }
}

struct FeedShared {
    feed: LiveFeed,
    cache: QueryCache,
    connected: AtomicBool,
    last_message: RwLock<Option<FeedMessage>>,
    messages: broadcast::Sender<FeedMessage>,
}

struct Worker {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

enum SessionEnd {
    Shutdown,
    Closed,
    Failed(DashboardError),
}

/// Controls a running feed. Dropping the handle tears the feed down.
pub struct FeedHandle {
    shared: Arc<FeedShared>,
    worker: Mutex<Option<Worker>>,
}

impl std::fmt::Debug for FeedHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedHandle")
            .field("url", &self.shared.feed.url)
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl FeedHandle {
    pub fn is_connected(&self) -> bool {
        self.shared.connected.load(Ordering::SeqCst)
    }

    pub fn is_enabled(&self) -> bool {
        self.shared.feed.enabled
    }

    /// The most recent message that parsed as JSON.
    pub fn last_message(&self) -> Option<FeedMessage> {
        self.shared
            .last_message
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Receive every parsed message from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<FeedMessage> {
        self.shared.messages.subscribe()
    }

    /// Parsed messages as a stream. Messages missed by a slow reader are skipped.
    pub fn messages(&self) -> impl Stream<Item = FeedMessage> {
        tokio_stream::StreamExt::filter_map(BroadcastStream::new(self.subscribe()), |item| item.ok())
    }

    /// Cancel any pending reconnect and close the socket.
    pub async fn disconnect(&self) {
        let worker = self.take_worker();
        if let Some(worker) = worker {
            let _ = worker.shutdown.send(true);
            if let Err(e) = worker.task.await {
                warn!("Live feed task ended abnormally: {}", e);
            }
        }
        self.shared.connected.store(false, Ordering::SeqCst);
    }

    /// Drop the current connection, if any, and connect again right away.
    pub async fn reconnect(&self) {
        self.disconnect().await;
        self.spawn_worker();
    }

    fn spawn_worker(&self) {
        if !self.shared.feed.enabled {
            debug!("Live feed disabled; not connecting");
            return;
        }
        let (shutdown, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(run(Arc::clone(&self.shared), shutdown_rx));
        *self.lock_worker() = Some(Worker { shutdown, task });
    }

    fn take_worker(&self) -> Option<Worker> {
        self.lock_worker().take()
    }

    fn lock_worker(&self) -> std::sync::MutexGuard<'_, Option<Worker>> {
        self.worker
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for FeedHandle {
    fn drop(&mut self) {
        if let Some(worker) = self.take_worker() {
            // The task closes the socket on its own once it sees the signal
            let _ = worker.shutdown.send(true);
        }
    }
}

async fn run(shared: Arc<FeedShared>, mut shutdown: watch::Receiver<bool>) {
    let observer = shared.feed.observer.clone();
    loop {
        let end = shared.session(&mut shutdown).await;
        shared.connected.store(false, Ordering::SeqCst);

        match end {
            SessionEnd::Shutdown => break,
            SessionEnd::Closed => info!("Live feed disconnected"),
            SessionEnd::Failed(e) => {
                error!("Live feed error: {}", e);
                if let Some(observer) = &observer {
                    observer.on_error(&e).await;
                }
            }
        }
        if let Some(observer) = &observer {
            observer.on_disconnect().await;
        }

        debug!("Reconnecting in {:?}", shared.feed.reconnect_delay);
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = tokio::time::sleep(shared.feed.reconnect_delay) => {}
        }
        info!("Attempting to reconnect...");
    }
    debug!("Live feed stopped");
}

impl FeedShared {
    async fn session(&self, shutdown: &mut watch::Receiver<bool>) -> SessionEnd {
        let connect = tokio_tungstenite::connect_async(self.feed.url.as_str());
        let stream = tokio::select! {
            _ = shutdown.changed() => return SessionEnd::Shutdown,
            result = connect => match result {
                Ok((stream, _)) => stream,
                Err(e) => return SessionEnd::Failed(e.into()),
            },
        };

        self.connected.store(true, Ordering::SeqCst);
        info!("Live feed connected to {}", self.feed.url);
        if let Some(observer) = &self.feed.observer {
            observer.on_connect().await;
        }

        let (mut write, mut read) = stream.split();
        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if let Err(e) = write.send(Message::Close(None)).await {
                        debug!("Close frame not sent: {}", e);
                    }
                    return SessionEnd::Shutdown;
                }
                frame = read.next() => match frame {
                    Some(Ok(Message::Text(text))) => self.handle_text(&text),
                    Some(Ok(Message::Binary(bytes))) => match std::str::from_utf8(&bytes) {
                        Ok(text) => self.handle_text(text),
                        Err(_) => warn!("Ignoring non-UTF-8 binary frame"),
                    },
                    Some(Ok(Message::Close(_))) | None => return SessionEnd::Closed,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return SessionEnd::Failed(e.into()),
                },
            }
        }
    }

    fn handle_text(&self, text: &str) {
        let message: FeedMessage = match serde_json::from_str(text) {
            Ok(message) => message,
            Err(e) => {
                error!("Error parsing live feed message: {}", e);
                return;
            }
        };

        if message.triggers_refresh() {
            debug!(
                "Refreshing equipment queries for {}",
                message.event_type().unwrap_or_default()
            );
            for group in REFRESH_GROUPS {
                self.cache.invalidate(&query_key![group]);
            }
        }

        *self
            .last_message
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(message.clone());
        // No subscribers is fine
        let _ = self.messages.send(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(json: &str) -> FeedMessage {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_refresh_markers() {
        assert!(message(r#"{"eventType":"EQUIPMENT_FAILURE"}"#).triggers_refresh());
        assert!(message(r#"{"eventType":"SENSOR_OFFLINE"}"#).triggers_refresh());
        assert!(message(r#"{"eventType":"MAINTENANCE_SCHEDULED"}"#).triggers_refresh());
        assert!(!message(r#"{"eventType":"BATTERY_LOW"}"#).triggers_refresh());
        assert!(!message(r#"{"eventType":"SYSTEM_ALERT"}"#).triggers_refresh());
        assert!(!message(r#"{"message":"hello"}"#).triggers_refresh());
        assert!(!message(r#"{"eventType":42}"#).triggers_refresh());
        assert!(!message("[1,2,3]").triggers_refresh());
    }

    #[test]
    fn test_as_event_decodes_records() {
        let msg = message(r#"{"id":"e-1","eventType":"STATUS_CHANGED","severity":"INFO"}"#);
        let event = msg.as_event().unwrap();
        assert_eq!(event.id, "e-1");
        assert!(message("17").as_event().is_none());
    }

    #[tokio::test]
    async fn test_disabled_feed_never_connects() {
        let handle = LiveFeed::new("ws://127.0.0.1:1/ws-events")
            .with_enabled(false)
            .start(QueryCache::default());
        assert!(!handle.is_enabled());
        handle.reconnect().await;
        assert!(!handle.is_connected());
        assert!(handle.last_message().is_none());
        handle.disconnect().await;
    }

    #[test]
    fn test_handle_text_invalidates_groups() {
        let cache = QueryCache::default();
        for key in [
            query_key!["pumps", 0u32, 10u32],
            query_key!["sensors", "s-1"],
            query_key!["events", 0u32, 20u32],
            query_key!["statistics", "dashboard"],
            query_key!["farmers", 0u32, 10u32],
        ] {
            cache.set_data(key, 0u8);
        }
        let (messages, _) = broadcast::channel(4);
        let shared = FeedShared {
            feed: LiveFeed::new("ws://unused"),
            cache: cache.clone(),
            connected: AtomicBool::new(false),
            last_message: RwLock::new(None),
            messages,
        };

        shared.handle_text("not json");
        assert!(shared.last_message.read().unwrap().is_none());

        shared.handle_text(r#"{"eventType":"BATTERY_LOW"}"#);
        assert!(!cache.is_stale(&query_key!["pumps", 0u32, 10u32]));

        shared.handle_text(r#"{"eventType":"SENSOR_OFFLINE"}"#);
        assert!(cache.is_stale(&query_key!["pumps", 0u32, 10u32]));
        assert!(cache.is_stale(&query_key!["sensors", "s-1"]));
        assert!(cache.is_stale(&query_key!["events", 0u32, 20u32]));
        assert!(cache.is_stale(&query_key!["statistics", "dashboard"]));
        assert!(!cache.is_stale(&query_key!["farmers", 0u32, 10u32]));
        assert_eq!(
            shared.last_message.read().unwrap().as_ref().and_then(|m| m.event_type()),
            Some("SENSOR_OFFLINE")
        );
    }
}
