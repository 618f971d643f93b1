//! Rolling-window rate limiter shared by every worker

use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Caps outbound calls to `calls` per rolling `window`.
///
/// Keeps the start time of every call still inside the window. A caller that
/// finds the window full sleeps until the oldest call ages out; calls are
/// delayed, never rejected. The log stays locked while a caller waits, and
/// the tokio mutex queues lockers in order, so callers are served in arrival
/// order.
#[derive(Debug)]
pub struct RateLimiter {
    calls: usize,
    window: Duration,
    history: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Create a limiter allowing `calls` per `window`
    pub fn new(calls: usize, window: Duration) -> Self {
        let calls = calls.max(1);
        Self {
            calls,
            window,
            history: Mutex::new(VecDeque::with_capacity(calls)),
        }
    }

    /// Wait for a free slot and claim it
    pub async fn acquire(&self) {
        let mut history = self.history.lock().await;
        let now = Instant::now();

        while let Some(&oldest) = history.front() {
            if now.duration_since(oldest) >= self.window {
                history.pop_front();
            } else {
                break;
            }
        }

        if history.len() >= self.calls {
            if let Some(oldest) = history.pop_front() {
                let ready = oldest + self.window;
                tracing::trace!("Rate limit reached, waiting {:?}", ready - now);
                tokio::time::sleep_until(ready).await;
            }
        }

        history.push_back(Instant::now());
    }
}
