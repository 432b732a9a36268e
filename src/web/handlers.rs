//! HTTP handlers for the dashboard endpoints.

use super::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, Json},
};
use serde_json::{json, Value};
use std::path::Path;
use tracing::error;

/// Health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": crate::NAME,
        "version": crate::VERSION,
        "backend": state.resources.api().base_url(),
        "clients": state.client_count().await,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Overview counters.
pub async fn get_dashboard(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let stats = state.resources.overview_stats().await;
    to_json(&stats)
}

/// Active alerts, most urgent first.
pub async fn get_alerts(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let alerts = state.resources.active_alerts().await;
    to_json(&alerts)
}

/// Status distribution and equipment-type totals.
pub async fn get_distribution(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let distribution = state.resources.status_distribution().await;
    to_json(&distribution)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Json<Value>, StatusCode> {
    serde_json::to_value(value).map(Json).map_err(|e| {
        error!("Failed to serialize response: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Serve `index.html` from the configured static directory.
pub async fn serve_index(State(state): State<AppState>) -> Result<Html<String>, StatusCode> {
    let Some(dir) = state.config.static_path.as_deref() else {
        return Ok(Html(DEFAULT_INDEX_HTML.to_string()));
    };
    match tokio::fs::read_to_string(Path::new(dir).join("index.html")).await {
        Ok(content) => Ok(Html(content)),
        Err(e) => {
            error!("Failed to read index.html: {}", e);
            Err(StatusCode::NOT_FOUND)
        }
    }
}

/// Built-in dashboard page used when no static directory is configured.
pub async fn default_index() -> Html<&'static str> {
    Html(DEFAULT_INDEX_HTML)
}

const DEFAULT_INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Farm Monitor</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: #f4f7f2;
            color: #1f2d1b;
            margin: 0;
            padding: 24px;
        }
        h1 { margin: 0 0 4px; color: #2f6b2a; }
        .grid {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
            gap: 16px;
            margin: 24px 0;
        }
        .card {
            background: white;
            border-radius: 10px;
            padding: 16px 20px;
            box-shadow: 0 2px 8px rgba(0,0,0,0.08);
        }
        .card h3 { margin: 0 0 8px; font-size: 0.95rem; color: #5b6b57; }
        .card .value { font-size: 2rem; font-weight: bold; }
        .card .hint { color: #7a8876; font-size: 0.85rem; }
        table { width: 100%; border-collapse: collapse; }
        td, th { text-align: left; padding: 6px 8px; border-bottom: 1px solid #e3e8e0; }
        .high { color: #c0392b; font-weight: 600; }
        .medium { color: #d68910; font-weight: 600; }
        #status { font-size: 0.9rem; }
        #status.error { color: #c0392b; }
    </style>
</head>
<body>
    <h1>Farm Monitor</h1>
    <div id="status">Connecting to live feed...</div>

    <div class="grid">
        <div class="card"><h3>Farmers</h3><div class="value" id="farmers">-</div></div>
        <div class="card"><h3>Active equipment</h3><div class="value" id="equipment">-</div><div class="hint" id="equipment-hint"></div></div>
        <div class="card"><h3>Battery alerts</h3><div class="value" id="battery">-</div><div class="hint" id="battery-hint"></div></div>
        <div class="card"><h3>Unacknowledged events</h3><div class="value" id="events">-</div><div class="hint" id="events-hint"></div></div>
    </div>

    <div class="card">
        <h3>Active alerts</h3>
        <table>
            <thead><tr><th>Severity</th><th>Equipment</th><th>Message</th><th>Time</th></tr></thead>
            <tbody id="alerts"></tbody>
        </table>
    </div>

    <script>
        async function refresh() {
            try {
                const stats = await (await fetch('/api/dashboard')).json();
                document.getElementById('farmers').textContent = stats.totalFarmers;
                document.getElementById('equipment').textContent = `${stats.activeEquipment}/${stats.totalEquipment}`;
                document.getElementById('equipment-hint').textContent = `${stats.activePumps} pumps, ${stats.activeSensors} sensors`;
                document.getElementById('battery').textContent = stats.lowBatterySensors;
                document.getElementById('battery-hint').textContent = `${stats.criticalSensors} critical, ${stats.offlineSensors} offline`;
                document.getElementById('events').textContent = stats.unacknowledgedEvents;
                document.getElementById('events-hint').textContent = `${stats.criticalEvents} critical, ${stats.warningEvents} warning`;

                const alerts = await (await fetch('/api/alerts')).json();
                const body = document.getElementById('alerts');
                body.innerHTML = '';
                for (const alert of alerts) {
                    const row = document.createElement('tr');
                    for (const [text, cls] of [[alert.severity, alert.severity], [`${alert.equipmentType} ${alert.equipmentId}`, ''], [alert.message, ''], [alert.timestamp, '']]) {
                        const cell = document.createElement('td');
                        cell.textContent = text;
                        if (cls) cell.className = cls;
                        row.appendChild(cell);
                    }
                    body.appendChild(row);
                }
            } catch (e) {
                console.error('Failed to refresh dashboard:', e);
            }
        }

        function connectWebSocket() {
            const protocol = window.location.protocol === 'https:' ? 'wss:' : 'ws:';
            const ws = new WebSocket(`${protocol}//${window.location.host}/ws`);
            const status = document.getElementById('status');

            ws.onopen = () => {
                status.textContent = 'Live updates connected';
                status.className = '';
            };
            ws.onmessage = (event) => {
                try {
                    const data = JSON.parse(event.data);
                    status.textContent = `Last event: ${data.eventType || 'update'}`;
                    refresh();
                } catch (e) {
                    console.error('Failed to parse WebSocket message:', e);
                }
            };
            ws.onclose = () => {
                status.textContent = 'Live updates disconnected, retrying...';
                status.className = 'error';
                setTimeout(connectWebSocket, 5000);
            };
        }

        refresh();
        setInterval(refresh, 30000);
        connectWebSocket();
    </script>
</body>
</html>"#;
