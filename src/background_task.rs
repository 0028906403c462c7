use chrono::Utc;
use tokio::time::{interval, Duration};

use crate::limiter::rate_limiter::RateLimiterStore;

/// Periodically drops rate-limit entries whose window has closed.
pub async fn start_rate_limit_sweep(store: RateLimiterStore, every: Duration) {
    let mut interval = interval(every);

    loop {
        interval.tick().await;

        let purged = store.purge_expired(Utc::now().timestamp_millis());
        if purged > 0 {
            tracing::debug!(purged, remaining = store.len(), "Swept expired rate-limit entries");
        }
    }
}
