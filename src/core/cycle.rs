//! # Poll cycle: one probe invocation plus its reschedule/retry decision.
//!
//! ## Flow
//! ```text
//! launch(run)
//!   ├─► guard: status == Polling && run is current   (else: no effect)
//!   ├─► cancel stale timer
//!   ├─► probe.call(param)            (invoked synchronously)
//!   └─► await ──► settle(run, outcome)
//!                   │
//!                   ├─ stale run ─────────────────► discard
//!                   │
//!                   ├─ Ok(result)
//!                   │    ├─► done = stop_when(&result, previous)
//!                   │    ├─► previous = result; emit Poll
//!                   │    ├─ done  ─► stop()                      (End)
//!                   │    └─ else  ─► retries = 0; arm timer(delay) ─► launch(run)
//!                   │
//!                   └─ Err / probe panic / predicate panic
//!                        ├─ retries < max_retries ─► retries += 1; arm timer(delay) ─► launch(run)
//!                        └─ else ─► Finished; emit Error
//! ```
//!
//! ## Rules
//! - A cycle belongs to the run it was launched for. `start()`, `pause()` and
//!   `stop()` advance the run, so a probe that settles after any of them is
//!   discarded without events or rescheduling.
//! - Retries are deferred: a failure schedules another cycle, it never loops
//!   in place. Every retry therefore honours `delay` and the same guard.
//! - The state lock is never held while the probe runs or listeners are called.
//! - A panic in the probe (at call time or while its future is polled) is a
//!   cycle failure like an `Err` result, so it is retried and finally reported.
//!
//! ## Stale results
//! A result that settles after its run was superseded is dropped entirely:
//! `previous` keeps its value and no `Poll` event is emitted, even if the
//! poller was restarted in the meantime. Only results of the current run are
//! ever observable, and a stale cycle can never stop or reschedule a newer run.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::{debug, error, warn};

use super::poller::Inner;
use super::status::Status;
use super::timer::PendingTimer;
use crate::error::{CycleError, panic_message};
use crate::events::Event;

impl<P, R, E> Inner<P, R, E>
where
    P: Clone + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
    E: Send + 'static,
{
    /// Starts one cycle for `run`.
    ///
    /// Returns `None` if the guard rejects the cycle. Otherwise the probe has
    /// already been invoked and the returned future settles it.
    pub(crate) fn launch(self: &Arc<Self>, run: u64) -> Option<BoxFuture<'static, ()>> {
        {
            let mut state = self.state.lock();
            if state.status != Status::Polling || state.run != run {
                debug!(probe = self.probe.name(), run, "cycle skipped: run no longer active");
                return None;
            }
            if let Some(stale) = state.timer.take() {
                stale.cancel();
            }
        }

        debug!(probe = self.probe.name(), run, "cycle started");
        let called = catch_unwind(AssertUnwindSafe(|| self.probe.call(self.param.clone())));
        let this = Arc::clone(self);
        Some(
            async move {
                let outcome = match called {
                    Ok(pending) => AssertUnwindSafe(pending).catch_unwind().await,
                    Err(payload) => Err(payload),
                };
                this.settle(run, outcome);
            }
            .boxed(),
        )
    }

    fn settle(self: &Arc<Self>, run: u64, outcome: Result<Result<R, E>, Box<dyn Any + Send>>) {
        match outcome {
            Ok(Ok(result)) => self.on_success(run, result),
            Ok(Err(err)) => self.on_failure(run, CycleError::Probe(err)),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(probe = self.probe.name(), run, panic = %message, "probe panicked");
                self.on_failure(run, CycleError::ProbePanicked { message });
            }
        }
    }

    fn on_success(self: &Arc<Self>, run: u64, result: R) {
        let previous = {
            let state = self.state.lock();
            if !state.is_current(run) {
                debug!(probe = self.probe.name(), run, "result discarded: run superseded");
                return;
            }
            state.previous.clone()
        };

        let done = match &self.stop_when {
            None => false,
            Some(stop_when) => {
                match catch_unwind(AssertUnwindSafe(|| stop_when(&result, previous.as_ref()))) {
                    Ok(done) => done,
                    Err(payload) => {
                        let message = panic_message(payload.as_ref());
                        warn!(probe = self.probe.name(), panic = %message, "stop predicate panicked");
                        self.on_failure(run, CycleError::Predicate { message });
                        return;
                    }
                }
            }
        };

        let status = {
            let mut state = self.state.lock();
            // The predicate runs unlocked and may have paused or restarted the poller.
            if !state.is_current(run) {
                debug!(probe = self.probe.name(), run, "result discarded: run superseded");
                return;
            }
            state.previous = Some(result.clone());
            state.status
        };
        self.notifier.emit(&Event::Poll { result, status });

        if done {
            debug!(probe = self.probe.name(), run, "stop predicate satisfied");
            self.stop_run(run);
            return;
        }

        let mut state = self.state.lock();
        // A listener may have paused or stopped the poller during `Poll`.
        if !state.is_current(run) {
            return;
        }
        state.retries = 0;
        state.timer = Some(self.schedule(run));
    }

    fn on_failure(self: &Arc<Self>, run: u64, error: CycleError<E>) {
        let mut state = self.state.lock();
        if !state.is_current(run) {
            debug!(probe = self.probe.name(), run, "failure discarded: run superseded");
            return;
        }
        if let Some(stale) = state.timer.take() {
            stale.cancel();
        }

        if self.cfg.may_retry(state.retries) {
            state.retries += 1;
            debug!(
                probe = self.probe.name(),
                run,
                retries = state.retries,
                max_retries = self.cfg.max_retries,
                reason = error.as_label(),
                "retry scheduled"
            );
            state.timer = Some(self.schedule(run));
            return;
        }

        let changed = state.status.replace(Status::Finished);
        state.run += 1;
        let retries = state.retries;
        drop(state);

        error!(
            probe = self.probe.name(),
            retries,
            reason = error.as_label(),
            "retries exhausted; polling finished"
        );
        self.emit_status(changed);
        self.notifier.emit(&Event::Error {
            error,
            status: Status::Finished,
        });
    }

    /// Arms the timer for the next cycle of `run`.
    fn schedule(self: &Arc<Self>, run: u64) -> PendingTimer {
        let this = Arc::clone(self);
        let delay_ms = u64::try_from(self.cfg.delay.as_millis()).unwrap_or(u64::MAX);
        debug!(probe = self.probe.name(), run, delay_ms, "next cycle scheduled");

        PendingTimer::arm(&self.runtime, self.cfg.delay, async move {
            if let Some(cycle) = this.launch(run) {
                cycle.await;
            }
        })
    }
}
