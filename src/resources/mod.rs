//! Per-resource queries and mutations.
//!
//! [`Resources`] wraps the [`ApiClient`] in the [`QueryCache`]: reads go
//! through the cache under fixed keys, writes invalidate the keys they affect
//! and report their outcome as a toast.

pub mod equipment;
pub mod events;
pub mod farmers;

use crate::api::{ApiClient, ClientConfig};
use crate::auth::AuthStore;
use crate::error::Result;
use crate::notify::Notifier;
use crate::query::{QueryCache, QueryKey};
use std::sync::Arc;

pub const FARMERS_KEY: &str = "farmers";
pub const FARMS_KEY: &str = "farms";
pub const PUMPS_KEY: &str = "pumps";
pub const SENSORS_KEY: &str = "sensors";
pub const EQUIPMENT_KEY: &str = "equipment";
pub const MAINTENANCE_KEY: &str = "maintenance";
pub const EVENTS_KEY: &str = "events";
pub const STATISTICS_KEY: &str = "statistics";

/// API client, query cache and notifier bundled together.
#[derive(Debug, Clone)]
pub struct Resources {
    api: ApiClient,
    cache: QueryCache,
    notifier: Notifier,
}

impl Resources {
    pub fn new(api: ApiClient, cache: QueryCache, notifier: Notifier) -> Self {
        Self {
            api,
            cache,
            notifier,
        }
    }

    /// Build the whole stack from configuration.
    pub fn from_config(config: &ClientConfig, auth: Arc<AuthStore>) -> Result<Self> {
        let api = ApiClient::new(config, auth)?;
        let cache = QueryCache::new(config.stale_time());
        Ok(Self::new(api, cache, Notifier::new()))
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Finish a mutation: invalidate and toast on success, toast the
    /// backend's message (or `fallback`) on failure. The result is passed on.
    fn settle<T>(
        &self,
        result: Result<T>,
        invalidate: &[QueryKey],
        success: &str,
        fallback: &str,
    ) -> Result<T> {
        match result {
            Ok(value) => {
                for key in invalidate {
                    self.cache.invalidate(key);
                }
                self.notifier.success(success);
                Ok(value)
            }
            Err(e) => {
                self.notifier.error(e.api_message().unwrap_or(fallback));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashboardError;
    use crate::notify::ToastLevel;
    use crate::query_key;

    fn resources() -> Resources {
        Resources::from_config(&ClientConfig::default(), Arc::new(AuthStore::in_memory())).unwrap()
    }

    #[tokio::test]
    async fn test_settle_success_invalidates_and_toasts() {
        let resources = resources();
        let key = query_key![FARMERS_KEY, 0u32, 10u32];
        resources.cache().set_data(key.clone(), 1u8);
        let mut toasts = resources.notifier().subscribe();

        let value = resources
            .settle(Ok(5), &[query_key![FARMERS_KEY]], "Farmer created successfully", "Failed to create farmer")
            .unwrap();

        assert_eq!(value, 5);
        assert!(resources.cache().is_stale(&key));
        let toast = toasts.recv().await.unwrap();
        assert_eq!(toast.level, ToastLevel::Success);
        assert_eq!(toast.message, "Farmer created successfully");
    }

    #[tokio::test]
    async fn test_settle_failure_prefers_backend_message() {
        let resources = resources();
        let mut toasts = resources.notifier().subscribe();

        let with_message: Result<()> = Err(DashboardError::api_error(409, "Email already registered"));
        assert!(resources
            .settle(with_message, &[], "ok", "Failed to create farmer")
            .is_err());
        assert_eq!(toasts.recv().await.unwrap().message, "Email already registered");

        let without: Result<()> = Err(DashboardError::network_error("refused"));
        assert!(resources.settle(without, &[], "ok", "Failed to create farmer").is_err());
        let toast = toasts.recv().await.unwrap();
        assert_eq!(toast.level, ToastLevel::Error);
        assert_eq!(toast.message, "Failed to create farmer");
    }
}
