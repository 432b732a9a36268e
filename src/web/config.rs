//! Local dashboard server configuration.

use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Configuration for the browser dashboard server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// Host to bind the server to
    pub host: String,
    /// Port to bind the server to
    pub port: u16,
    /// Whether to allow cross-origin requests
    pub enable_cors: bool,
    /// Whether to log every request through `TraceLayer`
    pub trace_requests: bool,
    /// Directory holding a custom `index.html` and assets
    pub static_path: Option<String>,
    /// Browser connections accepted on `/ws` at once
    pub max_websocket_connections: usize,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: crate::DEFAULT_WEB_PORT,
            enable_cors: false,
            trace_requests: true,
            static_path: None,
            max_websocket_connections: 32,
        }
    }
}

impl WebConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_cors(mut self, enable_cors: bool) -> Self {
        self.enable_cors = enable_cors;
        self
    }

    pub fn with_request_tracing(mut self, enabled: bool) -> Self {
        self.trace_requests = enabled;
        self
    }

    pub fn with_static_path(mut self, path: Option<String>) -> Self {
        self.static_path = path;
        self
    }

    pub fn with_max_websocket_connections(mut self, max: usize) -> Self {
        self.max_websocket_connections = max;
        self
    }

    /// `host:port`, parsed.
    pub fn bind_address(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| DashboardError::config_error(format!("Invalid bind address: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address() {
        let config = WebConfig::default().with_port(9000);
        assert_eq!(config.bind_address().unwrap().port(), 9000);
        assert!(WebConfig::new("not a host", 80).bind_address().is_err());
    }
}
