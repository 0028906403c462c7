use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use dashmap::DashMap;

/// Fixed-window counter for one client key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitEntry {
    pub count: u32,
    /// Epoch milliseconds after which the window restarts.
    pub reset_time: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed {
        remaining: u32,
        reset_time: i64,
    },
    Limited {
        retry_after_secs: u64,
        reset_time: i64,
    },
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitDecision::Allowed { .. })
    }

    pub fn reset_at(&self) -> DateTime<Utc> {
        let ms = match self {
            RateLimitDecision::Allowed { reset_time, .. } => *reset_time,
            RateLimitDecision::Limited { reset_time, .. } => *reset_time,
        };
        DateTime::from_timestamp_millis(ms).unwrap_or_else(Utc::now)
    }
}

/// Per-IP request counters shared by every worker.
///
/// Windows are fixed, not sliding: a burst straddling a window boundary may
/// see up to twice the limit.
#[derive(Clone)]
pub struct RateLimiterStore {
    map: Arc<DashMap<String, RateLimitEntry>>,
    limit: u32,
    window: Duration,
}

impl RateLimiterStore {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            map: Arc::new(DashMap::new()),
            limit,
            window,
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn entry(&self, key: &str) -> Option<RateLimitEntry> {
        self.map.get(key).map(|e| *e)
    }

    pub fn check(&self, key: &str) -> RateLimitDecision {
        self.check_at(key, Utc::now().timestamp_millis())
    }

    /// Counts one request for `key` at `now_ms`.
    pub fn check_at(&self, key: &str, now_ms: i64) -> RateLimitDecision {
        let window_ms = self.window.as_millis() as i64;

        let mut entry = self.map
            .entry(key.to_string())
            .or_insert(RateLimitEntry { count: 0, reset_time: 0 });

        if entry.count == 0 || now_ms > entry.reset_time {
            *entry = RateLimitEntry {
                count: 1,
                reset_time: now_ms + window_ms,
            };
            return RateLimitDecision::Allowed {
                remaining: self.limit.saturating_sub(1),
                reset_time: entry.reset_time,
            };
        }

        if entry.count < self.limit {
            entry.count += 1;
            return RateLimitDecision::Allowed {
                remaining: self.limit - entry.count,
                reset_time: entry.reset_time,
            };
        }

        let wait_ms = (entry.reset_time - now_ms).max(0);
        RateLimitDecision::Limited {
            retry_after_secs: ((wait_ms + 999) / 1000) as u64,
            reset_time: entry.reset_time,
        }
    }

    /// Drops entries whose window closed before `now_ms`. Returns how many were removed.
    pub fn purge_expired(&self, now_ms: i64) -> usize {
        let before = self.map.len();
        self.map.retain(|_, entry| entry.reset_time >= now_ms);
        before.saturating_sub(self.map.len())
    }
}
