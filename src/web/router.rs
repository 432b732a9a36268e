//! Routes and middleware.

use super::{handlers, websocket, AppState};
use crate::error::Result;
use axum::{routing::get, Router};
use std::path::PathBuf;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{info, warn};

/// Build the dashboard application.
pub fn create_app(state: AppState) -> Result<Router> {
    let mut app = Router::new()
        .route("/api/health", get(handlers::health_check))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/alerts", get(handlers::get_alerts))
        .route("/api/distribution", get(handlers::get_distribution))
        .route("/ws", get(websocket::websocket_handler));

    let static_dir = state.config.static_path.as_ref().map(PathBuf::from);
    match static_dir {
        Some(dir) if dir.join("index.html").exists() => {
            info!("Serving dashboard from {:?}", dir);
            app = app
                .route("/", get(handlers::serve_index))
                .nest_service("/static", ServeDir::new(dir));
        }
        Some(dir) => {
            warn!("No index.html in {:?}, serving the built-in dashboard", dir);
            app = app.route("/", get(handlers::default_index));
        }
        None => {
            app = app.route("/", get(handlers::default_index));
        }
    }

    let enable_cors = state.config.enable_cors;
    let trace_requests = state.config.trace_requests;
    let mut app = app.with_state(state);

    if enable_cors {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }
    if trace_requests {
        app = app.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));
    }

    Ok(app)
}
