//! Caching query layer.
//!
//! Results are cached under hierarchical [`QueryKey`]s. Invalidating a key
//! marks every entry it prefixes as stale, and concurrent fetches of the same
//! key share a single request.

pub mod cache;
pub mod key;
pub mod state;

// Re-export commonly used items
pub use cache::QueryCache;
pub use key::{KeyPart, QueryKey};
pub use state::QueryState;
