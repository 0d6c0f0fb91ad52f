//! Per-client sliding window rate limiter.
//!
//! In-memory and per-process: the window map resets on restart and is not
//! shared between instances. Identifiers whose newest request has left the
//! window are swept lazily so the map only holds recently active clients.

use crate::traits::RateLimiter;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// Default window width in milliseconds.
pub const DEFAULT_WINDOW_MS: i64 = 60_000;

/// Default number of admitted requests per window.
pub const DEFAULT_MAX_REQUESTS: usize = 3;

/// Default interval between idle-identifier sweeps in milliseconds.
pub const DEFAULT_SWEEP_INTERVAL_MS: i64 = 300_000;

struct Windows {
    entries: HashMap<String, Vec<i64>>,
    next_sweep_ms: Option<i64>,
}

/// Sliding window limiter keyed by client identifier.
pub struct SlidingWindowLimiter {
    windows: Mutex<Windows>,
    window_ms: i64,
    max_requests: usize,
    sweep_interval_ms: i64,
}

impl Default for SlidingWindowLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_MS, DEFAULT_MAX_REQUESTS)
    }
}

impl SlidingWindowLimiter {
    /// Create a limiter admitting `max_requests` per `window_ms`.
    pub fn new(window_ms: i64, max_requests: usize) -> Self {
        Self::with_sweep_interval(window_ms, max_requests, DEFAULT_SWEEP_INTERVAL_MS)
    }

    /// Create a limiter with a custom sweep interval.
    pub fn with_sweep_interval(window_ms: i64, max_requests: usize, sweep_interval_ms: i64) -> Self {
        Self {
            windows: Mutex::new(Windows {
                entries: HashMap::new(),
                next_sweep_ms: None,
            }),
            window_ms,
            max_requests,
            sweep_interval_ms,
        }
    }

    /// Evaluate a request for `key` at `now_ms` (epoch milliseconds).
    ///
    /// Returns `true` when the request is rejected. Rejected requests are not
    /// recorded, so a client hammering the endpoint still regains access one
    /// window after its oldest admitted request.
    pub fn is_limited_at(&self, key: &str, now_ms: i64) -> bool {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        self.maybe_sweep(&mut windows, now_ms);

        let timestamps = windows.entries.entry(key.to_string()).or_default();
        timestamps.retain(|&t| now_ms - t < self.window_ms);
        if timestamps.len() >= self.max_requests {
            return true;
        }
        timestamps.push(now_ms);
        false
    }

    /// Number of identifiers currently tracked.
    pub fn tracked(&self) -> usize {
        self.windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .entries
            .len()
    }

    fn maybe_sweep(&self, windows: &mut Windows, now_ms: i64) {
        let due = match windows.next_sweep_ms {
            Some(at) => now_ms >= at,
            None => {
                windows.next_sweep_ms = Some(now_ms + self.sweep_interval_ms);
                false
            }
        };
        if !due {
            return;
        }

        let before = windows.entries.len();
        let window_ms = self.window_ms;
        windows
            .entries
            .retain(|_, ts| ts.last().is_some_and(|&newest| now_ms - newest < window_ms));
        windows.next_sweep_ms = Some(now_ms + self.sweep_interval_ms);

        let evicted = before - windows.entries.len();
        if evicted > 0 {
            debug!("rate limiter: evicted {evicted} idle identifiers");
        }
    }
}

impl RateLimiter for SlidingWindowLimiter {
    fn is_limited(&self, key: &str) -> bool {
        self.is_limited_at(key, chrono::Utc::now().timestamp_millis())
    }
}
