//! HTTP client for the farm-monitoring REST API.
//!
//! Every request passes through the same two hooks: one attaches the bearer
//! token and farmer id from the [`AuthStore`], the other logs the outcome and
//! turns error statuses into [`DashboardError::Api`] using the backend's error
//! payload when it sent one.

use crate::api::config::ClientConfig;
use crate::auth::AuthStore;
use crate::error::{DashboardError, Result};
use crate::models::ErrorResponse;
use reqwest::{header, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Header carrying the signed-in farmer's id.
pub const FARMER_ID_HEADER: &str = "X-Farmer-Id";

/// Percent-encode one path segment so ids cannot rewrite the request path.
pub(crate) fn segment(raw: &str) -> String {
    // form encoding writes spaces as '+', which a path would keep literally
    url::form_urlencoded::byte_serialize(raw.as_bytes())
        .map(|chunk| if chunk == "+" { "%20" } else { chunk })
        .collect()
}

/// Thin JSON client over `reqwest`. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    auth: Arc<AuthStore>,
}

impl ApiClient {
    /// Build a client from `config`, sharing `auth` for credentials.
    pub fn new(config: &ClientConfig, auth: Arc<AuthStore>) -> Result<Self> {
        let base_url = config.api_url()?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| DashboardError::config_error(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// The REST base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The credential store this client reads from.
    pub fn auth(&self) -> &Arc<AuthStore> {
        &self.auth
    }

    /// `GET path?query` and decode the JSON body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        self.send::<T, ()>(Method::GET, path, query, None).await
    }

    /// `POST path` with a JSON body.
    pub async fn post<T, B>(&self, path: &str, query: &[(&str, String)], body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::POST, path, query, Some(body)).await
    }

    /// `PUT path` with a JSON body.
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::PUT, path, &[], Some(body)).await
    }

    /// `PATCH path` with a JSON body.
    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::PATCH, path, &[], Some(body)).await
    }

    /// `DELETE path`. An empty response body decodes as `()`.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send::<T, ()>(Method::DELETE, path, &[], None).await
    }

    async fn send<T, B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method.clone(), &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            let json = serde_json::to_value(body)?;
            debug!("API request: {} {} {}", method, url, json);
            request = request.json(&json);
        } else {
            debug!("API request: {} {}", method, url);
        }

        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| {
                error!("Network error: no response from {} {}: {}", method, url, e);
                DashboardError::network_error(format!("{} {} failed: {}", method, url, e))
            })?;

        let response = self.check_status(response).await?;
        let bytes = response.bytes().await?;
        debug!("API response: {} {} ({} bytes)", method, url, bytes.len());

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::from_value(serde_json::Value::Null)?);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Attach credentials from the auth store.
    fn authorize(&self, mut request: RequestBuilder) -> RequestBuilder {
        if let Some(token) = self.auth.token() {
            request = request.bearer_auth(token);
        }
        if let Some(farmer_id) = self.auth.farmer_id() {
            request = request.header(FARMER_ID_HEADER, farmer_id);
        }
        request
    }

    /// Pass success responses through; turn the rest into `DashboardError::Api`.
    async fn check_status(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        let payload: ErrorResponse = serde_json::from_str(&body).unwrap_or_default();
        let message = payload.message.clone().filter(|m| !m.is_empty());

        error!(
            "API error: status={} url={} message={} path={:?} validation_errors={:?}",
            status.as_u16(),
            url,
            message.as_deref().unwrap_or("Unknown error occurred"),
            payload.path,
            payload.validation_errors,
        );

        match status {
            StatusCode::UNAUTHORIZED => self.handle_unauthorized(),
            StatusCode::FORBIDDEN => error!("Forbidden: Insufficient permissions"),
            StatusCode::NOT_FOUND => error!("Resource not found"),
            StatusCode::INTERNAL_SERVER_ERROR => error!("Internal server error"),
            StatusCode::SERVICE_UNAVAILABLE => error!("Service temporarily unavailable"),
            _ => {}
        }

        Err(DashboardError::Api {
            status: status.as_u16(),
            message,
            path: payload.path,
            validation_errors: payload.validation_errors.unwrap_or_default(),
        })
    }

    fn handle_unauthorized(&self) {
        warn!("Unauthorized: clearing stored credentials");
        if let Err(e) = self.auth.logout() {
            warn!("Failed to clear auth store: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let config = ClientConfig::new("http://localhost:9000/");
        let client = tokio_test::assert_ok!(ApiClient::new(&config, Arc::new(AuthStore::in_memory())));
        assert_eq!(client.base_url(), "http://localhost:9000");
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let config = ClientConfig::new("localhost");
        tokio_test::assert_err!(ApiClient::new(&config, Arc::new(AuthStore::in_memory())));
    }

    #[test]
    fn test_path_segments_are_encoded() {
        assert_eq!(segment("f-42"), "f-42");
        assert_eq!(segment("a/b?c#d"), "a%2Fb%3Fc%23d");
        assert_eq!(segment("north field+1"), "north%20field%2B1");
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let config = ClientConfig::new("http://127.0.0.1:1").with_timeout_ms(2_000);
        let client = ApiClient::new(&config, Arc::new(AuthStore::in_memory())).unwrap();
        let err = client
            .get::<serde_json::Value>("/api/farmers", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::Network(_)), "{err:?}");
        assert_eq!(err.api_message(), None);
    }
}
