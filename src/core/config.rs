//! # Poller configuration.
//!
//! Provides [`Config`], the timing and retry settings of a poller.
//!
//! Config is used in two ways:
//! 1. **Whole**: `PollerBuilder::config(cfg)`
//! 2. **Per field**: `PollerBuilder::delay(..)` / `PollerBuilder::max_retries(..)`
//!
//! ## Sentinel values
//! - `max_retries = 0` → the first failure ends polling with an `Error` event

use std::time::Duration;

/// Timing and retry settings of a poller. Immutable once the poller is built.
///
/// ## Field semantics
/// - `delay`: pause between the end of one cycle and the start of the next;
///   also applied before every retry
/// - `max_retries`: consecutive failures tolerated before polling ends (`0` = none)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Delay before the next cycle (after a success) or the next retry (after a failure).
    pub delay: Duration,

    /// Consecutive failures tolerated before polling terminates.
    ///
    /// The counter resets on every successful probe and on every `start()`,
    /// so the bound applies to *consecutive* failures, not lifetime failures.
    pub max_retries: u32,
}

impl Config {
    /// True if at least one retry is allowed.
    #[inline]
    pub fn retries_enabled(&self) -> bool {
        self.max_retries > 0
    }

    /// True if another retry is allowed after `retries` consecutive failures.
    #[inline]
    pub(crate) fn may_retry(&self, retries: u32) -> bool {
        self.retries_enabled() && retries < self.max_retries
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `delay = 5s`
    /// - `max_retries = 3`
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(5000),
            max_retries: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.delay, Duration::from_secs(5));
        assert_eq!(cfg.max_retries, 3);
        assert!(cfg.retries_enabled());
    }

    #[test]
    fn test_may_retry_bound() {
        let cfg = Config {
            delay: Duration::from_millis(10),
            max_retries: 2,
        };
        assert!(cfg.may_retry(0));
        assert!(cfg.may_retry(1));
        assert!(!cfg.may_retry(2));

        let none = Config {
            max_retries: 0,
            ..cfg
        };
        assert!(!none.retries_enabled());
        assert!(!none.may_retry(0));
    }
}
