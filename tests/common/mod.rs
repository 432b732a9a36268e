//! In-process stand-in for the farm-monitoring backend.

#![allow(dead_code)]

use axum::extract::ws::{Message, WebSocketUpgrade};
use axum::extract::{OriginalUri, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use farm_monitor::{AuthStore, ClientConfig, Resources};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Credentials seen on one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seen {
    pub path: String,
    pub authorization: Option<String>,
    pub farmer_id: Option<String>,
}

#[derive(Default)]
pub struct MockState {
    pub seen: Mutex<Vec<Seen>>,
    pub farmer_list_hits: AtomicUsize,
    pub ws_connections: AtomicUsize,
}

impl MockState {
    fn record(&self, path: &str, headers: &HeaderMap) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        self.seen.lock().unwrap().push(Seen {
            path: path.to_string(),
            authorization: header("authorization"),
            farmer_id: header("x-farmer-id"),
        });
    }

    pub fn last_seen(&self) -> Option<Seen> {
        self.seen.lock().unwrap().last().cloned()
    }
}

pub struct MockBackend {
    pub addr: SocketAddr,
    pub state: Arc<MockState>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .route("/api/farmers", get(list_farmers).post(create_farmer))
            .route("/api/farmers/:id", get(get_farmer))
            .route("/api/pumps", get(list_pumps))
            .route("/api/sensors", get(list_sensors))
            .route("/api/events", get(list_events))
            .route("/api/private", get(unauthorized))
            .route("/ws-events", get(feed))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self { addr, state }
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(format!("http://{}", self.addr))
            .with_ws_url(format!("ws://{}/ws-events", self.addr))
            .with_timeout_ms(5_000)
            .with_reconnect_delay_ms(50)
    }

    pub fn resources(&self, auth: Arc<AuthStore>) -> Resources {
        Resources::from_config(&self.config(), auth).unwrap()
    }
}

pub fn farmer(id: &str, first: &str, last: &str, active: bool) -> Value {
    json!({
        "id": id,
        "firstName": first,
        "lastName": last,
        "email": format!("{}@example.com", first.to_lowercase()),
        "phoneNumber": "+1234567890",
        "address": "1 Farm Road",
        "dateOfBirth": "1980-04-02",
        "active": active,
        "registrationDate": "2024-01-15T08:00:00"
    })
}

fn page(content: Vec<Value>, total: u64) -> Value {
    json!({
        "content": content,
        "totalElements": total,
        "totalPages": 1,
        "number": 0,
        "size": 1000
    })
}

async fn list_farmers(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Json<Value> {
    state.record("/api/farmers", &headers);
    state.farmer_list_hits.fetch_add(1, Ordering::SeqCst);
    // slow enough for concurrent callers to overlap
    tokio::time::sleep(Duration::from_millis(50)).await;
    Json(page(
        vec![
            farmer("f-1", "John", "Doe", true),
            farmer("f-2", "Jane", "Roe", true),
            farmer("f-3", "Ada", "Poe", false),
        ],
        3,
    ))
}

/// Records the raw request path, so encoding is visible to tests.
async fn get_farmer(
    State(state): State<Arc<MockState>>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Json<Value> {
    state.record(uri.path(), &headers);
    Json(farmer(&id, "John", "Doe", true))
}

async fn create_farmer(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record("/api/farmers", &headers);
    if body["email"] == "taken@example.com" {
        return (
            StatusCode::CONFLICT,
            Json(json!({
                "status": 409,
                "error": "Conflict",
                "message": "Email already registered",
                "path": "/api/farmers"
            })),
        )
            .into_response();
    }
    let mut created = body;
    created["id"] = json!("f-new");
    created["active"] = json!(true);
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn list_pumps() -> Json<Value> {
    Json(page(
        vec![
            json!({"id": "p-1", "status": "ACTIVE", "model": "AquaMax"}),
            json!({"id": "p-2", "status": "MAINTENANCE", "maintenanceOverdue": true,
                   "nextMaintenanceDate": "2024-05-01"}),
        ],
        2,
    ))
}

async fn list_sensors() -> Json<Value> {
    Json(page(
        vec![
            json!({"id": "s-1", "type": "HUMIDITY", "battery": 12, "batteryCritical": true,
                   "active": true, "online": true}),
            json!({"id": "s-2", "type": "TEMPERATURE", "battery": 80, "active": false,
                   "online": false, "lastCommunication": "2024-05-02T10:00:00Z"}),
        ],
        2,
    ))
}

async fn list_events() -> Json<Value> {
    Json(page(
        vec![json!({"id": "e-1", "eventType": "EQUIPMENT_FAILURE", "severity": "CRITICAL",
                    "equipmentId": "p-1", "equipmentType": "PUMP", "message": "Pump failure",
                    "timestamp": "2024-05-03T09:00:00Z", "acknowledged": false})],
        1,
    ))
}

async fn unauthorized(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.record("/api/private", &headers);
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"status": 401, "message": "Token expired"})),
    )
        .into_response()
}

/// Sends one equipment event, then closes.
async fn feed(State(state): State<Arc<MockState>>, ws: WebSocketUpgrade) -> Response {
    let n = state.ws_connections.fetch_add(1, Ordering::SeqCst) + 1;
    ws.on_upgrade(move |mut socket| async move {
        let event = json!({
            "id": format!("e-live-{n}"),
            "eventType": "EQUIPMENT_FAILURE",
            "severity": "CRITICAL",
            "message": "Pump stopped"
        });
        let _ = socket.send(Message::Text(event.to_string())).await;
        let _ = socket.send(Message::Text("not json".to_string())).await;
        let _ = socket.send(Message::Close(None)).await;
    })
}

/// Poll `check` until it holds or two seconds pass.
pub async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    check()
}
