//! # Farm Monitor
//!
//! Client for a farm-equipment monitoring backend: farmers and their farms,
//! irrigation pumps, field sensors and the events they raise.
//!
//! ## Features
//!
//! - **Typed REST client** with bearer-token and farmer-id headers
//! - **Query cache** keyed by hierarchical keys, with prefix invalidation and
//!   in-flight de-duplication
//! - **Live feed** over WebSocket that refreshes cached equipment data and
//!   reconnects on its own
//! - **Forms** with the same validation rules as the backend's admin UI
//! - **Dashboard** aggregations, text views and CSV export
//! - **Web dashboard** relaying the live feed to browsers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use farm_monitor::{AuthStore, ClientConfig, LiveFeed, PageRequest, Resources};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::from_env();
//!     let resources = Resources::from_config(&config, Arc::new(AuthStore::in_memory()))?;
//!
//!     // Keep cached pumps, sensors and events fresh
//!     let _feed = LiveFeed::from_config(&config)?.start(resources.cache().clone());
//!
//!     let farmers = resources.farmers(PageRequest::default()).await;
//!     if let Some(page) = farmers.data() {
//!         println!("{} farmers", page.total_elements);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod forms;
pub mod models;
pub mod notify;
pub mod query;
pub mod realtime;
pub mod resources;
pub mod views;
pub mod web;

// Re-export public API
pub use api::{ApiClient, ClientConfig};
pub use auth::{AuthStore, User};
pub use dashboard::{Alert, DashboardData, OverviewStats, StatusDistribution};
pub use error::{DashboardError, Result};
pub use export::Exporter;
pub use forms::{submit, FieldErrors, FormSchema, SubmitOutcome};
pub use models::{Page, PageRequest};
pub use notify::{Notifier, Toast, ToastLevel};
pub use query::{QueryCache, QueryKey, QueryState};
pub use realtime::{FeedHandle, FeedMessage, FeedObserver, LiveFeed, Poller};
pub use resources::Resources;
pub use web::{start_web_server, WebConfig};

/// Crate name, as reported by the health endpoint
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The default REST base URL
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// The default live-feed endpoint
pub const DEFAULT_WS_URL: &str = "ws://localhost:8080/ws-events";

/// The default request timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// The default delay before the live feed reconnects, in milliseconds
pub const DEFAULT_RECONNECT_DELAY_MS: u64 = 5_000;

/// How long cached query data stays fresh by default, in milliseconds
pub const DEFAULT_STALE_TIME_MS: u64 = 30_000;

/// The default page size for list views
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// The default page size for event lists
pub const DEFAULT_EVENTS_PAGE_SIZE: u32 = 20;

/// The default dashboard server port
pub const DEFAULT_WEB_PORT: u16 = 3000;
