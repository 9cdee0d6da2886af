//! # Poller: the public control surface.
//!
//! [`Poller`] is a cheap, cloneable handle over shared state. Control
//! operations are synchronous; the cycles they start run on the tokio runtime
//! captured when the poller was built.
//!
//! ## Operations
//! ```text
//! start()  Idle ─► Polling; retries = 0; probe invoked before returning
//!          no-op while Polling or once Finished
//! pause()  Polling ─► Idle; pending timer cancelled; no End event
//!          no-op once Finished
//! stop()   * ─► Finished; pending timer cancelled; End(previous, Finished)
//!          no-op once Finished (idempotent)
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use pollvisor::{Event, EventKind, Poller, ProbeFn, Status};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let probe = ProbeFn::new("counter", |n: u32| async move { Ok::<u32, String>(n + 1) });
//!
//!     let poller = Poller::builder()
//!         .probe(probe)
//!         .param(41)
//!         .stop_when(|current: &u32, _previous: Option<&u32>| *current == 42)
//!         .delay(Duration::from_millis(10))
//!         .build()?;
//!
//!     poller.on(EventKind::End, |ev: &Event<u32, String>| {
//!         assert_eq!(ev.result(), Some(&42));
//!     });
//!
//!     poller.start();
//!     tokio::time::sleep(Duration::from_millis(50)).await;
//!     assert_eq!(poller.status(), Status::Finished);
//!     Ok(())
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tracing::info;

use super::builder::PollerBuilder;
use super::config::Config;
use super::status::Status;
use super::timer::PendingTimer;
use crate::events::{Event, EventKind, Listener, Notifier};
use crate::probes::ProbeRef;

/// Decides from `(current, previous)` whether polling should stop.
pub type StopPredicate<R> = Arc<dyn Fn(&R, Option<&R>) -> bool + Send + Sync>;

/// Mutable poller state. Guarded by `Inner::state`.
pub(crate) struct State<R> {
    pub(crate) status: Status,
    /// Most recent successful result; never cleared.
    pub(crate) previous: Option<R>,
    /// Consecutive failures since the last success or `start()`.
    pub(crate) retries: u32,
    /// Run id; advanced by `start`, `pause`, `stop` and retry exhaustion.
    pub(crate) run: u64,
    pub(crate) timer: Option<PendingTimer>,
}

impl<R> State<R> {
    fn new() -> Self {
        Self {
            status: Status::Idle,
            previous: None,
            retries: 0,
            run: 0,
            timer: None,
        }
    }

    /// True if a cycle launched for `run` is still wanted.
    #[inline]
    pub(crate) fn is_current(&self, run: u64) -> bool {
        self.status == Status::Polling && self.run == run
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }
}

/// Shared core of a poller: immutable configuration plus guarded state.
pub(crate) struct Inner<P, R, E> {
    pub(crate) probe: ProbeRef<P, R, E>,
    pub(crate) param: P,
    pub(crate) stop_when: Option<StopPredicate<R>>,
    pub(crate) cfg: Config,
    pub(crate) state: Mutex<State<R>>,
    pub(crate) notifier: Notifier<R, E>,
    pub(crate) runtime: Handle,
}

impl<P, R, E> Inner<P, R, E>
where
    R: Clone,
{
    pub(crate) fn new(
        probe: ProbeRef<P, R, E>,
        param: P,
        stop_when: Option<StopPredicate<R>>,
        cfg: Config,
        notifier: Notifier<R, E>,
        runtime: Handle,
    ) -> Self {
        Self {
            probe,
            param,
            stop_when,
            cfg,
            state: Mutex::new(State::new()),
            notifier,
            runtime,
        }
    }

    pub(crate) fn emit_status(&self, changed: Option<Status>) {
        if let Some(status) = changed {
            self.notifier.emit(&Event::StatusChange { status });
        }
    }

    /// Terminates polling and emits `End` with the last known result.
    pub(crate) fn stop(&self) {
        self.finish(None);
    }

    /// Like [`stop`](Inner::stop), but only while `run` is still the current run.
    pub(crate) fn stop_run(&self, run: u64) {
        self.finish(Some(run));
    }

    fn finish(&self, run: Option<u64>) {
        let (changed, previous) = {
            let mut state = self.state.lock();
            let active = match run {
                Some(run) => state.is_current(run),
                None => !state.status.is_finished(),
            };
            if !active {
                return;
            }
            let changed = state.status.replace(Status::Finished);
            state.run += 1;
            state.cancel_timer();
            (changed, state.previous.clone())
        };

        info!(probe = self.probe.name(), "polling stopped");
        self.emit_status(changed);
        self.notifier.emit(&Event::End {
            result: previous,
            status: Status::Finished,
        });
    }
}

/// Handle to an asynchronous polling controller.
///
/// Clones share the same state. Dropping every handle does **not** stop a
/// running poller (its pending timer keeps it alive); call [`Poller::stop`].
pub struct Poller<P, R, E> {
    inner: Arc<Inner<P, R, E>>,
}

impl<P, R, E> Clone for Poller<P, R, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P, R, E> Poller<P, R, E> {
    /// Returns a builder; the probe is the only required input.
    pub fn builder() -> PollerBuilder<P, R, E> {
        PollerBuilder::new()
    }

    pub(crate) fn from_inner(inner: Inner<P, R, E>) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Current lifecycle status.
    pub fn status(&self) -> Status {
        self.inner.state.lock().status
    }

    /// True once polling has terminated.
    pub fn is_finished(&self) -> bool {
        self.status().is_finished()
    }

    /// Consecutive failures since the last success or `start()`.
    pub fn retries(&self) -> u32 {
        self.inner.state.lock().retries
    }

    /// Configuration the poller was built with.
    pub fn config(&self) -> &Config {
        &self.inner.cfg
    }

    /// Name of the probe being polled.
    pub fn probe_name(&self) -> &str {
        self.inner.probe.name()
    }

    /// Registers `listener` for events of `kind`.
    pub fn subscribe(&self, kind: EventKind, listener: Listener<R, E>) {
        self.inner.notifier.subscribe(kind, listener);
    }

    /// Removes every registration of `listener` under `kind`.
    ///
    /// Returns `true` if anything was removed.
    pub fn unsubscribe(&self, kind: EventKind, listener: &Listener<R, E>) -> bool {
        self.inner.notifier.unsubscribe(kind, listener)
    }

    /// Registers a closure for events of `kind` and returns its handle for
    /// a later [`unsubscribe`](Poller::unsubscribe).
    pub fn on<F>(&self, kind: EventKind, f: F) -> Listener<R, E>
    where
        F: Fn(&Event<R, E>) + Send + Sync + 'static,
    {
        let listener: Listener<R, E> = Arc::new(f);
        self.subscribe(kind, Arc::clone(&listener));
        listener
    }
}

impl<P, R, E> Poller<P, R, E>
where
    R: Clone,
{
    /// Most recent successful result, if any.
    pub fn previous(&self) -> Option<R> {
        self.inner.state.lock().previous.clone()
    }
}

impl<P, R, E> Poller<P, R, E>
where
    P: Clone + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
    E: Send + 'static,
{
    /// Begins polling. The first probe is invoked before this returns.
    ///
    /// No-op while already polling, and once finished.
    pub fn start(&self) {
        let (changed, run) = {
            let mut state = self.inner.state.lock();
            if state.status != Status::Idle {
                return;
            }
            state.retries = 0;
            state.run += 1;
            (state.status.replace(Status::Polling), state.run)
        };

        info!(probe = self.inner.probe.name(), run, "polling started");
        self.inner.emit_status(changed);
        if let Some(cycle) = self.inner.launch(run) {
            self.inner.runtime.spawn(cycle);
        }
    }

    /// Terminates polling and emits `End` with the last known result.
    ///
    /// Idempotent: once finished, further calls do nothing.
    pub fn stop(&self) {
        self.inner.stop();
    }

    /// Suspends polling without emitting `End`. Resume with [`start`](Poller::start),
    /// which probes immediately.
    ///
    /// A probe already in flight runs to completion but its result is discarded.
    pub fn pause(&self) {
        let changed = {
            let mut state = self.inner.state.lock();
            if state.status.is_finished() {
                return;
            }
            state.run += 1;
            state.cancel_timer();
            state.status.replace(Status::Idle)
        };

        if changed.is_some() {
            info!(probe = self.inner.probe.name(), "polling paused");
        }
        self.inner.emit_status(changed);
    }
}

impl<P, R, E> fmt::Debug for Poller<P, R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Poller")
            .field("probe", &self.inner.probe.name())
            .field("status", &state.status)
            .field("retries", &state.retries)
            .field("config", &self.inner.cfg)
            .field("listeners", &self.inner.notifier)
            .finish()
    }
}
