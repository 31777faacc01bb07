//! Sliding-window request counter keyed by client identity.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use waitlist_core::config::RateLimitPolicy;

/// Outcome of a [`SlidingWindowLimiter::sweep`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Keys dropped because every timestamp had expired.
    pub removed_empty: usize,
    /// Keys dropped to get back under the tracked-key ceiling.
    pub evicted: usize,
}

/// In-memory sliding-window rate limiter.
///
/// Each key keeps the timestamps of its accepted requests inside the
/// current window, oldest first. Rejected requests are not recorded.
#[derive(Debug)]
pub struct SlidingWindowLimiter {
    /// Label used in logs (`signup`, `status`).
    name: &'static str,
    /// Requests allowed per window.
    max_requests: usize,
    /// Trailing window length.
    window: Duration,
    /// Ceiling on tracked keys enforced by [`Self::sweep`].
    max_keys: usize,
    /// Key → accepted request timestamps.
    windows: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl SlidingWindowLimiter {
    /// Creates a new limiter.
    pub fn new(name: &'static str, max_requests: u32, window: Duration, max_keys: usize) -> Self {
        Self {
            name,
            max_requests: max_requests as usize,
            window,
            max_keys,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a limiter from a configured policy.
    pub fn from_policy(name: &'static str, policy: &RateLimitPolicy, max_keys: usize) -> Self {
        Self::new(name, policy.max_requests, policy.window(), max_keys)
    }

    /// The limiter's log label.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The trailing window length.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Records a request for `key` if it fits in the current window.
    ///
    /// Cost is proportional to the key's own window, never to the number
    /// of tracked keys.
    pub async fn is_allowed(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;

        let timestamps = windows.entry(key.to_string()).or_default();
        prune(timestamps, now, self.window);

        if timestamps.len() >= self.max_requests {
            debug!(limiter = self.name, key, "Request rejected by rate limiter");
            return false;
        }

        timestamps.push_back(now);
        true
    }

    /// Drops expired keys, then evicts the least recently active keys until
    /// at most `max_keys` remain.
    pub async fn sweep(&self) -> SweepStats {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;
        let before = windows.len();

        windows.retain(|_, timestamps| {
            prune(timestamps, now, self.window);
            !timestamps.is_empty()
        });
        let removed_empty = before - windows.len();

        let mut evicted = 0;
        if windows.len() > self.max_keys {
            let excess = windows.len() - self.max_keys;
            let mut by_activity: Vec<(Instant, String)> = windows
                .iter()
                .filter_map(|(key, timestamps)| timestamps.back().map(|ts| (*ts, key.clone())))
                .collect();
            by_activity.sort_unstable_by_key(|(last_seen, _)| *last_seen);

            for (_, key) in by_activity.into_iter().take(excess) {
                windows.remove(&key);
                evicted += 1;
            }
        }

        SweepStats {
            removed_empty,
            evicted,
        }
    }

    /// Number of keys currently tracked.
    pub async fn tracked_keys(&self) -> usize {
        self.windows.lock().await.len()
    }
}

/// Pops timestamps that have fallen out of the window ending at `now`.
fn prune(timestamps: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(oldest) = timestamps.front() {
        if now.duration_since(*oldest) >= window {
            timestamps.pop_front();
        } else {
            break;
        }
    }
}
