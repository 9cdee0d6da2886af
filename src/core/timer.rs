//! # Pending re-invocation timer.
//!
//! A [`PendingTimer`] is the cancellable handle for the one cycle a poller may
//! have scheduled. The timer itself is a spawned task that races
//! `tokio::time::sleep(delay)` against a [`CancellationToken`]:
//!
//! ```text
//! arm(delay, fire) ──► spawn ──► select! {
//!                                  token.cancelled() → exit, fire is dropped
//!                                  sleep(delay)      → fire.await
//!                                }
//! ```
//!
//! Cancelling after the sleep has elapsed has no effect on the running
//! `fire` future; the cycle's own status guard covers that window.

use std::future::Future;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time;
use tokio_util::sync::CancellationToken;

/// Cancellable handle to a scheduled cycle.
#[derive(Debug)]
pub(crate) struct PendingTimer {
    token: CancellationToken,
}

impl PendingTimer {
    /// Spawns a timer on `runtime` that runs `fire` after `delay` unless cancelled first.
    pub(crate) fn arm<F>(runtime: &Handle, delay: Duration, fire: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let cancelled = token.clone();

        runtime.spawn(async move {
            let elapsed = tokio::select! {
                biased;
                _ = cancelled.cancelled() => false,
                _ = time::sleep(delay) => true,
            };
            if elapsed {
                fire.await;
            }
        });

        Self { token }
    }

    /// Cancels the timer. Idempotent.
    pub(crate) fn cancel(&self) {
        self.token.cancel();
    }

    #[cfg(test)]
    pub(crate) fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn flag() -> (Arc<AtomicBool>, impl Future<Output = ()> + Send + 'static) {
        let fired = Arc::new(AtomicBool::new(false));
        let setter = Arc::clone(&fired);
        (fired, async move { setter.store(true, Ordering::SeqCst) })
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let (fired, fire) = flag();
        let _timer = PendingTimer::arm(&Handle::current(), Duration::from_millis(100), fire);

        time::sleep(Duration::from_millis(99)).await;
        assert!(!fired.load(Ordering::SeqCst));

        time::sleep(Duration::from_millis(2)).await;
        tokio::task::yield_now().await;
        assert!(fired.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_fire() {
        let (fired, fire) = flag();
        let timer = PendingTimer::arm(&Handle::current(), Duration::from_millis(100), fire);

        timer.cancel();
        timer.cancel();
        assert!(timer.is_cancelled());

        time::sleep(Duration::from_millis(500)).await;
        assert!(!fired.load(Ordering::SeqCst));
    }
}
