//! `/ws`: live-feed relay to browsers.

use super::{AppState, Client};
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::OwnedSemaphorePermit;
use tracing::{debug, error, info, warn};

/// WebSocket upgrade handler. Refuses upgrades past the connection limit.
pub async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let Some(slot) = state.reserve_slot() else {
        warn!(
            "Rejecting WebSocket client: {} connections already open",
            state.config.max_websocket_connections
        );
        return (StatusCode::SERVICE_UNAVAILABLE, "Too many WebSocket connections").into_response();
    };
    ws.on_upgrade(move |socket| handle_websocket(socket, state, slot))
}

async fn handle_websocket(socket: WebSocket, state: AppState, _slot: OwnedSemaphorePermit) {
    let client_id = uuid::Uuid::new_v4().to_string();
    info!("WebSocket client connected: {}", client_id);
    // subscribed before registering so a counted client never misses a message
    let mut rx = state.subscribe();
    state
        .register(Client {
            id: client_id.clone(),
            connected_at: chrono::Utc::now(),
        })
        .await;

    let (mut sender, mut receiver) = socket.split();

    let client_id_recv = client_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Close(_)) => break,
                Ok(Message::Text(text)) => {
                    debug!("Ignoring message from {}: {}", client_id_recv, text);
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("WebSocket error for client {}: {}", client_id_recv, e);
                    break;
                }
            }
        }
    });

    let client_id_send = client_id.clone();
    let mut send_task = tokio::spawn(async move {
        loop {
            let message = match rx.recv().await {
                Ok(message) => message,
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Client {} lagged, skipped {} messages", client_id_send, skipped);
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            match serde_json::to_string(&message) {
                Ok(json) => {
                    if let Err(e) = sender.send(Message::Text(json)).await {
                        warn!("Failed to send message to client {}: {}", client_id_send, e);
                        break;
                    }
                }
                Err(e) => error!("Failed to serialize message for {}: {}", client_id_send, e),
            }
        }
    });

    // whichever side ends first takes the other down, and the relay
    // receiver is dropped before the client is unregistered
    tokio::select! {
        _ = &mut recv_task => {
            debug!("Receive task completed for client {}", client_id);
            send_task.abort();
            let _ = send_task.await;
        }
        _ = &mut send_task => {
            debug!("Send task completed for client {}", client_id);
            recv_task.abort();
            let _ = recv_task.await;
        }
    }

    state.unregister(&client_id).await;
    info!("WebSocket client disconnected: {}", client_id);
}
