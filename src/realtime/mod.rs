//! Real-time updates: the live WebSocket feed and a polling fallback.

pub mod feed;
pub mod polling;

// Re-export commonly used items
pub use feed::{FeedHandle, FeedMessage, FeedObserver, LiveFeed, REFRESH_GROUPS};
pub use polling::{Poller, DEFAULT_POLL_INTERVAL, MIN_POLL_INTERVAL};
