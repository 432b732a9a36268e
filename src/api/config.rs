//! Backend client configuration.

use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Environment variable holding the REST base URL.
pub const API_BASE_URL_ENV: &str = "FARM_API_BASE_URL";

/// Environment variable holding the live-feed WebSocket URL.
pub const WS_URL_ENV: &str = "FARM_WS_URL";

/// Configuration for talking to the farm-monitoring backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the REST API (paths under `/api/...` are appended)
    pub api_base_url: String,
    /// WebSocket endpoint of the live event feed
    pub ws_url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Delay before the live feed reconnects, in milliseconds
    pub reconnect_delay_ms: u64,
    /// How long cached query data counts as fresh, in milliseconds
    pub stale_time_ms: u64,
    /// File the auth store persists to
    pub auth_path: Option<String>,
    /// Whether the live feed should connect at all
    pub live_updates: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: crate::DEFAULT_API_BASE_URL.to_string(),
            ws_url: crate::DEFAULT_WS_URL.to_string(),
            timeout_ms: crate::DEFAULT_TIMEOUT_MS,
            reconnect_delay_ms: crate::DEFAULT_RECONNECT_DELAY_MS,
            stale_time_ms: crate::DEFAULT_STALE_TIME_MS,
            auth_path: None,
            live_updates: true,
        }
    }
}

impl ClientConfig {
    /// Create a configuration pointing at `api_base_url`.
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            ..Default::default()
        }
    }

    /// Defaults overridden by `FARM_API_BASE_URL` and `FARM_WS_URL` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(API_BASE_URL_ENV) {
            if !url.trim().is_empty() {
                config.api_base_url = url;
            }
        }
        if let Ok(url) = std::env::var(WS_URL_ENV) {
            if !url.trim().is_empty() {
                config.ws_url = url;
            }
        }
        config
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_ws_url(mut self, url: impl Into<String>) -> Self {
        self.ws_url = url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_reconnect_delay_ms(mut self, delay_ms: u64) -> Self {
        self.reconnect_delay_ms = delay_ms;
        self
    }

    pub fn with_stale_time_ms(mut self, stale_time_ms: u64) -> Self {
        self.stale_time_ms = stale_time_ms;
        self
    }

    pub fn with_auth_path(mut self, path: Option<String>) -> Self {
        self.auth_path = path;
        self
    }

    pub fn with_live_updates(mut self, enabled: bool) -> Self {
        self.live_updates = enabled;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    pub fn stale_time(&self) -> Duration {
        Duration::from_millis(self.stale_time_ms)
    }

    /// Parsed REST base URL; must be http or https.
    pub fn api_url(&self) -> Result<Url> {
        let url = Url::parse(&self.api_base_url).map_err(|e| {
            DashboardError::config_error(format!("Invalid API base URL {}: {}", self.api_base_url, e))
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(DashboardError::config_error(format!(
                "API base URL must be http or https, got {}",
                other
            ))),
        }
    }

    /// Parsed WebSocket URL; must be ws or wss.
    pub fn feed_url(&self) -> Result<Url> {
        let url = Url::parse(&self.ws_url).map_err(|e| {
            DashboardError::config_error(format!("Invalid WebSocket URL {}: {}", self.ws_url, e))
        })?;
        match url.scheme() {
            "ws" | "wss" => Ok(url),
            other => Err(DashboardError::config_error(format!(
                "WebSocket URL must be ws or wss, got {}",
                other
            ))),
        }
    }

    /// Check both URLs.
    pub fn validate(&self) -> Result<()> {
        self.api_url()?;
        self.feed_url()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:8080");
        assert_eq!(config.ws_url, "ws://localhost:8080/ws-events");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.reconnect_delay(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_chain() {
        let config = ClientConfig::new("https://farm.example.com")
            .with_ws_url("wss://farm.example.com/ws-events")
            .with_timeout_ms(1_000)
            .with_live_updates(false);
        assert_eq!(config.api_url().unwrap().host_str(), Some("farm.example.com"));
        assert_eq!(config.timeout_ms, 1_000);
        assert!(!config.live_updates);
    }

    #[test]
    fn test_rejects_wrong_schemes() {
        assert!(ClientConfig::new("ftp://farm").api_url().is_err());
        assert!(ClientConfig::default()
            .with_ws_url("http://localhost/ws")
            .feed_url()
            .is_err());
        assert!(ClientConfig::new("not a url").validate().is_err());
    }
}
