//! Interval-driven invalidation for screens that cannot rely on the feed.

use crate::query::{QueryCache, QueryKey};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Shortest accepted interval; tokio rejects a zero period.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Invalidates one key prefix every `interval` until stopped or dropped.
#[derive(Debug)]
pub struct Poller {
    key: QueryKey,
    task: JoinHandle<()>,
}

impl Poller {
    /// Start polling. The first invalidation happens one interval from now.
    /// Intervals below [`MIN_POLL_INTERVAL`] are raised to it.
    pub fn start(cache: QueryCache, key: QueryKey, interval: Duration) -> Self {
        if interval < MIN_POLL_INTERVAL {
            warn!("Poll interval {:?} too short, using {:?}", interval, MIN_POLL_INTERVAL);
        }
        let interval = interval.max(MIN_POLL_INTERVAL);
        let prefix = key.clone();
        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                debug!("Polling {}", prefix);
                cache.invalidate(&prefix);
            }
        });
        Self { key, task }
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    pub fn stop(self) {
        // Drop aborts the task
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_key;

    #[tokio::test(start_paused = true)]
    async fn test_poller_invalidates_each_interval() {
        let cache = QueryCache::new(Duration::from_secs(3600));
        let mut rx = cache.subscribe();
        let poller = Poller::start(cache.clone(), query_key!["events", "unacknowledged"], Duration::from_secs(30));

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(rx.recv().await.unwrap(), query_key!["events", "unacknowledged"]);
        assert_eq!(rx.recv().await.unwrap(), query_key!["events", "unacknowledged"]);

        poller.stop();
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_still_polls() {
        let cache = QueryCache::new(Duration::from_secs(3600));
        let mut rx = cache.subscribe();
        let _poller = Poller::start(cache.clone(), query_key!["pumps"], Duration::ZERO);

        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(rx.recv().await.unwrap(), query_key!["pumps"]);
    }
}
