//! # Simple logging listener for debugging and demos.
//!
//! [`LogWriter`] renders every poller event through `tracing`, one line per
//! event. This is primarily useful for development, debugging, and demos.
//!
//! ## Output format
//! ```text
//! [status] probe=gateway status=polling
//! [poll] probe=gateway status=polling result="and"
//! [end] probe=gateway status=finished result=Some("done!")
//! [error] probe=gateway status=finished err=probe failed: 503
//! ```
//!
//! ## Example
//! ```rust
//! # use pollvisor::{LogWriter, Poller, ProbeFn};
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), pollvisor::PollerError> {
//! let poller = Poller::builder()
//!     .probe(ProbeFn::new("health", |_: ()| async { Ok::<u16, String>(200) }))
//!     .build()?;
//! LogWriter::new("health").attach(&poller);
//! # Ok(())
//! # }
//! ```

use std::borrow::Cow;
use std::fmt::{Debug, Display};
use std::sync::Arc;

use tracing::{info, warn};

use crate::core::Poller;
use crate::events::{Event, EventKind, Listener};

/// Listener that logs every event it receives.
///
/// Enabled via the `logging` feature. Not intended for production use:
/// subscribe your own listener for structured logging or metrics.
#[derive(Debug, Clone)]
pub struct LogWriter {
    label: Cow<'static, str>,
}

impl LogWriter {
    /// Creates a writer that tags its lines with `label`.
    pub fn new(label: impl Into<Cow<'static, str>>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// Renders one event.
    pub fn write<R, E>(&self, e: &Event<R, E>)
    where
        R: Debug,
        E: Display,
    {
        let probe = self.label.as_ref();
        match e {
            Event::Poll { result, status } => {
                info!("[poll] probe={probe} status={status} result={result:?}");
            }
            Event::StatusChange { status } => {
                info!("[status] probe={probe} status={status}");
            }
            Event::End { result, status } => {
                info!("[end] probe={probe} status={status} result={result:?}");
            }
            Event::Error { error, status } => {
                warn!("[error] probe={probe} status={status} err={error}");
            }
        }
    }

    /// Wraps this writer as a [`Listener`].
    pub fn listener<R, E>(self) -> Listener<R, E>
    where
        R: Debug + 'static,
        E: Display + 'static,
    {
        Arc::new(move |e: &Event<R, E>| self.write(e))
    }

    /// Subscribes this writer to every event kind of `poller`.
    pub fn attach<P, R, E>(self, poller: &Poller<P, R, E>) -> Listener<R, E>
    where
        R: Debug + 'static,
        E: Display + 'static,
    {
        let listener = self.listener();
        for kind in EventKind::ALL {
            poller.subscribe(kind, Arc::clone(&listener));
        }
        listener
    }
}

impl Default for LogWriter {
    fn default() -> Self {
        Self::new("poller")
    }
}
