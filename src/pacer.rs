//! Spacing between consecutive requests.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Enforces a minimum delay between consecutive requests.
///
/// The reporting service throttles callers to about one request per second,
/// so the client spreads calls out instead of letting a burst trip the
/// limit. Clones share one schedule.
#[derive(Debug, Clone)]
pub struct RequestPacer {
    interval: Duration,
    last_pass: Arc<Mutex<Option<Instant>>>,
}

impl RequestPacer {
    /// A pacer with the given minimum spacing between requests.
    /// `Duration::ZERO` disables pacing.
    pub fn new(interval: Duration) -> Self {
        RequestPacer {
            interval,
            last_pass: Arc::new(Mutex::new(None)),
        }
    }

    /// Wait until the next request may go out.
    ///
    /// The first call passes immediately. The slot is held across the
    /// sleep, so concurrent callers line up one interval apart instead of
    /// waking together.
    pub async fn pause(&self) {
        if self.interval.is_zero() {
            return;
        }

        let mut last_pass = self.last_pass.lock().await;
        if let Some(last) = *last_pass {
            let due = last + self.interval;
            if due > Instant::now() {
                tokio::time::sleep_until(due).await;
            }
        }
        *last_pass = Some(Instant::now());
    }
}

impl Default for RequestPacer {
    /// One request per second, matching the service's published limit.
    fn default() -> Self {
        RequestPacer::new(Duration::from_secs(1))
    }
}
