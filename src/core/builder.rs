use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;

use super::config::Config;
use super::poller::{Inner, Poller, StopPredicate};
use crate::error::PollerError;
use crate::events::{EventKind, Listener, Notifier};
use crate::probes::{Probe, ProbeRef};

/// Builder for constructing a [`Poller`].
///
/// Only the probe is required. Everything else falls back to:
/// - `param`: `P::default()`
/// - `stop_when`: never stop
/// - `config`: [`Config::default()`] (5s delay, 3 retries)
pub struct PollerBuilder<P, R, E> {
    probe: Option<ProbeRef<P, R, E>>,
    param: Option<P>,
    stop_when: Option<StopPredicate<R>>,
    cfg: Config,
    listeners: Vec<(EventKind, Listener<R, E>)>,
}

impl<P, R, E> PollerBuilder<P, R, E> {
    /// Creates an empty builder with the default configuration.
    pub fn new() -> Self {
        Self {
            probe: None,
            param: None,
            stop_when: None,
            cfg: Config::default(),
            listeners: Vec::new(),
        }
    }

    /// Sets the probe invoked on every cycle.
    pub fn probe<T>(mut self, probe: T) -> Self
    where
        T: Probe<P, R, E> + 'static,
    {
        self.probe = Some(Arc::new(probe));
        self
    }

    /// Sets the parameter passed (cloned) to every probe invocation.
    pub fn param(mut self, param: P) -> Self {
        self.param = Some(param);
        self
    }

    /// Sets the predicate deciding from `(current, previous)` whether to stop.
    ///
    /// It runs only after successful probes; `previous` is `None` on the
    /// first success.
    pub fn stop_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&R, Option<&R>) -> bool + Send + Sync + 'static,
    {
        self.stop_when = Some(Arc::new(predicate));
        self
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, cfg: Config) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets [`Config::delay`].
    pub fn delay(mut self, delay: Duration) -> Self {
        self.cfg.delay = delay;
        self
    }

    /// Sets [`Config::max_retries`].
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.cfg.max_retries = max_retries;
        self
    }

    /// Registers a listener before the poller exists.
    pub fn subscribe(mut self, kind: EventKind, listener: Listener<R, E>) -> Self {
        self.listeners.push((kind, listener));
        self
    }
}

impl<P, R, E> PollerBuilder<P, R, E>
where
    P: Default,
    R: Clone,
{
    /// Builds the poller in [`Status::Idle`](crate::Status::Idle).
    ///
    /// # Errors
    /// - [`PollerError::InvalidArgument`] if no probe was set.
    /// - [`PollerError::NoRuntime`] if called outside a tokio runtime.
    pub fn build(self) -> Result<Poller<P, R, E>, PollerError> {
        let probe = self.probe.ok_or(PollerError::InvalidArgument {
            reason: "probe is not set",
        })?;
        let runtime = Handle::try_current().map_err(|_| PollerError::NoRuntime)?;

        let notifier = Notifier::new();
        for (kind, listener) in self.listeners {
            notifier.subscribe(kind, listener);
        }

        tracing::debug!(
            probe = probe.name(),
            delay_ms = u64::try_from(self.cfg.delay.as_millis()).unwrap_or(u64::MAX),
            max_retries = self.cfg.max_retries,
            "poller built"
        );

        Ok(Poller::from_inner(Inner::new(
            probe,
            self.param.unwrap_or_default(),
            self.stop_when,
            self.cfg,
            notifier,
            runtime,
        )))
    }
}

impl<P, R, E> Default for PollerBuilder<P, R, E> {
    fn default() -> Self {
        Self::new()
    }
}
