//! # Events emitted by a poller.
//!
//! [`EventKind`] is the key listeners subscribe under; [`Event`] is the typed
//! payload they receive.
//!
//! | Kind           | Payload                         | Emitted when                                  |
//! |----------------|---------------------------------|-----------------------------------------------|
//! | `Poll`         | `result`, current `status`      | after every successful probe                  |
//! | `StatusChange` | new `status`                    | whenever the status actually changes          |
//! | `End`          | last known `result`, `Finished` | on `stop()`, including predicate-driven stops |
//! | `Error`        | `error`, `Finished`             | when retries are exhausted                    |
//!
//! ## Example
//! ```rust
//! use pollvisor::{Event, EventKind, Status};
//!
//! let ev: Event<&str, String> = Event::Poll { result: "ready", status: Status::Polling };
//! assert_eq!(ev.kind(), EventKind::Poll);
//! assert_eq!(ev.status(), Status::Polling);
//! assert_eq!(ev.result(), Some(&"ready"));
//! ```

use crate::core::Status;
use crate::error::CycleError;

/// Classification of poller events, used as the subscription key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A probe cycle succeeded.
    Poll,
    /// The poller status changed.
    StatusChange,
    /// Polling ended normally (`stop()` or the stop predicate).
    End,
    /// Polling ended because retries were exhausted.
    Error,
}

impl EventKind {
    /// Every kind, in declaration order.
    pub const ALL: [EventKind; 4] = [
        EventKind::Poll,
        EventKind::StatusChange,
        EventKind::End,
        EventKind::Error,
    ];

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            EventKind::Poll => "poll",
            EventKind::StatusChange => "status_change",
            EventKind::End => "end",
            EventKind::Error => "error",
        }
    }
}

/// Event payload delivered to listeners.
///
/// `R` is the probe's result type, `E` its error type.
#[derive(Debug)]
pub enum Event<R, E> {
    /// Fired after every successful probe with the new result.
    Poll { result: R, status: Status },
    /// Fired with the new status whenever it changes.
    StatusChange { status: Status },
    /// Fired once when polling stops; `result` is the last successful result, if any.
    End { result: Option<R>, status: Status },
    /// Fired once when the retry bound is exhausted.
    Error { error: CycleError<E>, status: Status },
}

impl<R, E> Event<R, E> {
    /// Returns the subscription key for this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Poll { .. } => EventKind::Poll,
            Event::StatusChange { .. } => EventKind::StatusChange,
            Event::End { .. } => EventKind::End,
            Event::Error { .. } => EventKind::Error,
        }
    }

    /// Status carried by the event.
    pub fn status(&self) -> Status {
        match self {
            Event::Poll { status, .. }
            | Event::StatusChange { status }
            | Event::End { status, .. }
            | Event::Error { status, .. } => *status,
        }
    }

    /// Probe result carried by the event, if any.
    pub fn result(&self) -> Option<&R> {
        match self {
            Event::Poll { result, .. } => Some(result),
            Event::End { result, .. } => result.as_ref(),
            Event::StatusChange { .. } | Event::Error { .. } => None,
        }
    }

    /// Cycle error carried by an `Error` event.
    pub fn error(&self) -> Option<&CycleError<E>> {
        match self {
            Event::Error { error, .. } => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_status() {
        let ev: Event<u32, String> = Event::StatusChange { status: Status::Idle };
        assert_eq!(ev.kind(), EventKind::StatusChange);
        assert_eq!(ev.status(), Status::Idle);
        assert!(ev.result().is_none());

        let ev: Event<u32, String> = Event::End { result: None, status: Status::Finished };
        assert_eq!(ev.kind(), EventKind::End);
        assert!(ev.result().is_none());
    }

    #[test]
    fn test_error_accessor() {
        let ev: Event<u32, &str> = Event::Error {
            error: CycleError::Probe("refused"),
            status: Status::Finished,
        };
        assert_eq!(ev.kind(), EventKind::Error);
        assert_eq!(ev.error().and_then(|e| e.probe_error()), Some(&"refused"));
    }

    #[test]
    fn test_labels_are_unique() {
        let mut labels: Vec<_> = EventKind::ALL.iter().map(EventKind::as_label).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), EventKind::ALL.len());
    }
}
