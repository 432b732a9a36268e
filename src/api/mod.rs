//! REST client for the farm-monitoring backend.
//!
//! [`ApiClient`] owns transport, credentials and error mapping. The resource
//! modules add one typed method per backend endpoint.

pub mod client;
pub mod config;
pub mod equipment;
pub mod events;
pub mod farmers;

// Re-export commonly used items
pub use client::{ApiClient, FARMER_ID_HEADER};
pub(crate) use client::segment;
pub use config::ClientConfig;
