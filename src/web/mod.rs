//! Local browser dashboard.
//!
//! Serves the dashboard page, JSON endpoints computed from the backend through
//! the shared [`Resources`], and a `/ws` endpoint relaying live-feed messages
//! to every connected browser.

pub mod config;
pub mod handlers;
pub mod router;
pub mod websocket;

// Re-export commonly used items
pub use config::WebConfig;
pub use router::create_app;

use crate::error::{DashboardError, Result};
use crate::realtime::{FeedHandle, FeedMessage};
use crate::resources::Resources;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, OwnedSemaphorePermit, RwLock, Semaphore};
use tokio_stream::StreamExt;
use tracing::{debug, info};

/// A browser connected to `/ws`.
#[derive(Debug, Clone)]
pub struct Client {
    pub id: String,
    pub connected_at: chrono::DateTime<chrono::Utc>,
}

/// Shared state behind every route.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: WebConfig,
    pub resources: Resources,
    relay: broadcast::Sender<FeedMessage>,
    clients: Arc<RwLock<HashMap<String, Client>>>,
    slots: Arc<Semaphore>,
}

impl AppState {
    pub fn new(config: WebConfig, resources: Resources) -> Self {
        let (relay, _) = broadcast::channel(100);
        let slots = Arc::new(Semaphore::new(
            config.max_websocket_connections.min(Semaphore::MAX_PERMITS),
        ));
        Self {
            config,
            resources,
            relay,
            clients: Arc::new(RwLock::new(HashMap::new())),
            slots,
        }
    }

    /// Send `message` to every connected browser. Returns how many
    /// receivers got it.
    pub fn broadcast(&self, message: FeedMessage) -> usize {
        self.relay.send(message).unwrap_or(0)
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<FeedMessage> {
        self.relay.subscribe()
    }

    /// Reserve one of the `max_websocket_connections` slots. The slot frees
    /// when the permit drops.
    pub(crate) fn reserve_slot(&self) -> Option<OwnedSemaphorePermit> {
        Arc::clone(&self.slots).try_acquire_owned().ok()
    }

    pub async fn client_count(&self) -> usize {
        self.clients.read().await.len()
    }

    pub async fn clients(&self) -> Vec<Client> {
        self.clients.read().await.values().cloned().collect()
    }

    pub(crate) async fn register(&self, client: Client) {
        self.clients.write().await.insert(client.id.clone(), client);
    }

    pub(crate) async fn unregister(&self, id: &str) {
        self.clients.write().await.remove(id);
    }
}

/// Forward every message of `feed` to the browsers of `state`.
pub fn spawn_relay(state: AppState, feed: &FeedHandle) -> tokio::task::JoinHandle<()> {
    let mut messages = Box::pin(feed.messages());
    tokio::spawn(async move {
        while let Some(message) = messages.next().await {
            let receivers = state.broadcast(message);
            debug!("Relayed feed message to {} browsers", receivers);
        }
    })
}

/// Serve the dashboard on an already bound listener.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let app = create_app(state)?;
    axum::serve(listener, app)
        .await
        .map_err(|e| DashboardError::web_server_error(format!("Server error: {}", e)))
}

/// Bind to the configured address and serve until the process stops.
///
/// When a live feed is given its messages are relayed to `/ws`.
pub async fn start_web_server(
    config: WebConfig,
    resources: Resources,
    feed: Option<&FeedHandle>,
) -> Result<()> {
    let addr = config.bind_address()?;
    let state = AppState::new(config, resources);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| DashboardError::web_server_error(format!("Failed to bind to address: {}", e)))?;

    info!("Starting farm monitor dashboard on http://{}", addr);
    info!("API endpoints: http://{}/api/dashboard, /api/alerts, /api/distribution", addr);
    info!("WebSocket endpoint: ws://{}/ws", addr);

    let _relay = feed.map(|feed| spawn_relay(state.clone(), feed));
    serve(listener, state).await
}
