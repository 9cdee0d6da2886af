//! Error types used by the poller and its cycles.
//!
//! This module defines two error enums:
//!
//! - [`PollerError`]: errors raised while constructing a [`Poller`](crate::Poller).
//! - [`CycleError`]: failures of a single poll cycle (probe error, probe panic or
//!   predicate panic).
//!
//! Both provide `as_label` for logs/metrics. Cycle errors never escape
//! [`Poller::start`](crate::Poller::start); they are delivered through
//! [`Event::Error`](crate::Event::Error) once retries are exhausted.

use std::any::Any;

use thiserror::Error;

/// # Errors produced while building a poller.
///
/// Construction errors are fatal: no poller is created.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PollerError {
    /// A required argument was missing or unusable.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the argument.
        reason: &'static str,
    },

    /// `build()` was called outside of a tokio runtime.
    #[error("no tokio runtime available to drive the poller")]
    NoRuntime,
}

impl PollerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use pollvisor::PollerError;
    ///
    /// let err = PollerError::InvalidArgument { reason: "probe is not set" };
    /// assert_eq!(err.as_label(), "poller_invalid_argument");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            PollerError::InvalidArgument { .. } => "poller_invalid_argument",
            PollerError::NoRuntime => "poller_no_runtime",
        }
    }
}

/// # Failure of a single poll cycle.
///
/// `E` is the probe's own error type. Every variant is retryable up to
/// [`Config::max_retries`](crate::Config::max_retries).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CycleError<E> {
    /// The probe resolved with an error.
    #[error("probe failed: {0}")]
    Probe(E),

    /// The probe panicked, either when called or while its future was polled.
    #[error("probe panicked: {message}")]
    ProbePanicked {
        /// Panic payload rendered as text.
        message: String,
    },

    /// The stop predicate panicked while judging a successful result.
    #[error("stop predicate panicked: {message}")]
    Predicate {
        /// Panic payload rendered as text.
        message: String,
    },
}

impl<E> CycleError<E> {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            CycleError::Probe(_) => "cycle_probe_failed",
            CycleError::ProbePanicked { .. } => "cycle_probe_panicked",
            CycleError::Predicate { .. } => "cycle_predicate_panicked",
        }
    }

    /// Borrows the probe error, if this failure came from the probe.
    pub fn probe_error(&self) -> Option<&E> {
        match self {
            CycleError::Probe(e) => Some(e),
            CycleError::ProbePanicked { .. } | CycleError::Predicate { .. } => None,
        }
    }

    /// Consumes the error, returning the probe error if there is one.
    pub fn into_probe_error(self) -> Option<E> {
        match self {
            CycleError::Probe(e) => Some(e),
            CycleError::ProbePanicked { .. } | CycleError::Predicate { .. } => None,
        }
    }
}

/// Renders a `catch_unwind` payload as text.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poller_error_labels() {
        assert_eq!(PollerError::NoRuntime.as_label(), "poller_no_runtime");
        let err = PollerError::InvalidArgument { reason: "probe is not set" };
        assert_eq!(err.to_string(), "invalid argument: probe is not set");
    }

    #[test]
    fn test_cycle_error_accessors() {
        let err: CycleError<String> = CycleError::Probe("timeout".into());
        assert_eq!(err.as_label(), "cycle_probe_failed");
        assert_eq!(err.to_string(), "probe failed: timeout");
        assert_eq!(err.probe_error().map(String::as_str), Some("timeout"));

        let err: CycleError<String> = CycleError::Predicate { message: "bad".into() };
        assert_eq!(err.as_label(), "cycle_predicate_panicked");
        assert!(err.into_probe_error().is_none());

        let err: CycleError<String> = CycleError::ProbePanicked { message: "boom".into() };
        assert_eq!(err.as_label(), "cycle_probe_panicked");
        assert_eq!(err.to_string(), "probe panicked: boom");
        assert!(err.probe_error().is_none());
    }

    fn static_panic() {
        panic!("static str");
    }

    fn formatted_panic() {
        panic!("{} {}", "formatted", 1);
    }

    #[test]
    fn test_panic_message_payloads() {
        let caught = std::panic::catch_unwind(static_panic).unwrap_err();
        assert_eq!(panic_message(caught.as_ref()), "static str");

        let caught = std::panic::catch_unwind(formatted_panic).unwrap_err();
        assert_eq!(panic_message(caught.as_ref()), "formatted 1");
    }
}
