//! # Probe abstraction.
//!
//! A [`Probe`] is the opaque external operation a poller invokes on every
//! cycle. It receives a clone of the configured parameter and returns a boxed
//! future resolving to `Result<R, E>`.
//!
//! `call` is a plain (non-async) method: the probe is *invoked* at the moment
//! the cycle launches, and only the returned future is awaited. This is what
//! lets [`Poller::start`](crate::Poller::start) trigger the first probe before
//! it returns.

use std::sync::Arc;

use futures::future::BoxFuture;

/// Boxed future returned by [`Probe::call`].
pub type BoxProbeFuture<R, E> = BoxFuture<'static, Result<R, E>>;

/// # Shared handle to a probe object.
pub type ProbeRef<P, R, E> = Arc<dyn Probe<P, R, E>>;

/// # Asynchronous operation polled on a schedule.
///
/// # Example
/// ```
/// use futures::FutureExt;
/// use pollvisor::{BoxProbeFuture, Probe};
///
/// struct Health;
///
/// impl Probe<String, u16, String> for Health {
///     fn name(&self) -> &str { "health" }
///
///     fn call(&self, url: String) -> BoxProbeFuture<u16, String> {
///         async move {
///             if url.is_empty() { Err("empty url".to_string()) } else { Ok(200) }
///         }
///         .boxed()
///     }
/// }
/// ```
pub trait Probe<P, R, E>: Send + Sync {
    /// Returns a stable, human-readable probe name (used in logs).
    fn name(&self) -> &str;

    /// Starts one probe invocation with `param`.
    ///
    /// The returned future is awaited to completion; there is no mid-flight
    /// cancellation and no timeout.
    fn call(&self, param: P) -> BoxProbeFuture<R, E>;
}
