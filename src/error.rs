//! Error handling for the farm monitor crate.

use crate::forms::FieldErrors;
use std::collections::HashMap;
use std::sync::Arc;

/// A specialized `Result` type for farm monitor operations.
pub type Result<T> = std::result::Result<T, DashboardError>;

/// The main error type for farm monitor operations.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The request never produced a response (connect, timeout, TLS)
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status
    #[error(
        "API error ({status}){}",
        .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
    )]
    Api {
        status: u16,
        message: Option<String>,
        path: Option<String>,
        validation_errors: HashMap<String, String>,
    },

    /// Form values were rejected before anything was sent
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Live feed connection error
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Web server error
    #[error("Web server error: {0}")]
    WebServer(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Export failed
    #[error("Export error: {0}")]
    Export(String),

    /// Failure of a fetch shared by several de-duplicated callers
    #[error(transparent)]
    Shared(Arc<DashboardError>),
}

impl DashboardError {
    /// Create a new network error
    pub fn network_error(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a new API error carrying only a message
    pub fn api_error(status: u16, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        Self::Api {
            status,
            message: (!msg.is_empty()).then_some(msg),
            path: None,
            validation_errors: HashMap::new(),
        }
    }

    /// Create a new WebSocket error
    pub fn websocket_error(msg: impl Into<String>) -> Self {
        Self::WebSocket(msg.into())
    }

    /// Create a new web server error
    pub fn web_server_error(msg: impl Into<String>) -> Self {
        Self::WebServer(msg.into())
    }

    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new export error
    pub fn export_error(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// HTTP status reported by the backend, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Shared(inner) => inner.status(),
            _ => None,
        }
    }

    /// The message the backend put in its error payload, if any.
    ///
    /// This is what gets shown to the user after a failed mutation.
    pub fn api_message(&self) -> Option<&str> {
        match self {
            Self::Api {
                message: Some(message),
                ..
            } if !message.is_empty() => Some(message.as_str()),
            Self::Shared(inner) => inner.api_message(),
            _ => None,
        }
    }

    /// Whether the backend rejected our credentials.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Whether the backend reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for DashboardError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::WebSocket(err.to_string())
    }
}

impl From<Arc<DashboardError>> for DashboardError {
    fn from(err: Arc<DashboardError>) -> Self {
        Self::Shared(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_message_prefers_backend_text() {
        let err = DashboardError::api_error(409, "Email already registered");
        assert_eq!(err.api_message(), Some("Email already registered"));
        assert_eq!(err.status(), Some(409));

        let blank = DashboardError::api_error(500, "");
        assert_eq!(blank.api_message(), None);

        let network = DashboardError::network_error("connection refused");
        assert_eq!(network.api_message(), None);
        assert_eq!(network.status(), None);
    }

    #[test]
    fn test_shared_error_delegates() {
        let inner = Arc::new(DashboardError::api_error(401, "Token expired"));
        let shared = DashboardError::from(inner);
        assert!(shared.is_unauthorized());
        assert_eq!(shared.api_message(), Some("Token expired"));
        assert!(format!("{}", shared).contains("Token expired"));
    }
}
