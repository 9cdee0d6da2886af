//! # Poller lifecycle status.
//!
//! ```text
//!            start()              stop() / predicate / retries exhausted
//!   Idle ───────────────► Polling ─────────────────────────────────► Finished
//!    ▲                      │                                          (absorbing)
//!    └──────── pause() ─────┘
//! ```
//!
//! [`Status::replace`] is the guarded assignment used by every transition:
//! it reports a change only when the value actually differs, which is what
//! keeps `StatusChange` events from being emitted twice.

use std::fmt;

/// Lifecycle status of a [`Poller`](crate::Poller).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    /// Not scheduling. Initial status, and the status after `pause()`.
    #[default]
    Idle,
    /// A poll cycle is scheduled or in flight.
    Polling,
    /// Terminal. No further cycles will be scheduled.
    Finished,
}

impl Status {
    /// Returns a short stable label for logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Status::Idle => "idle",
            Status::Polling => "polling",
            Status::Finished => "finished",
        }
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        matches!(self, Status::Finished)
    }

    /// Stores `next` and returns `Some(next)` if the status changed,
    /// `None` if it was already `next`.
    #[inline]
    pub(crate) fn replace(&mut self, next: Status) -> Option<Status> {
        if *self == next {
            return None;
        }
        *self = next;
        Some(next)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}
