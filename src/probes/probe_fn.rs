//! # Function-backed probe (`ProbeFn`)
//!
//! [`ProbeFn`] wraps a closure `F: Fn(P) -> Fut`, producing a fresh future per
//! invocation. Shared state between invocations must be captured explicitly
//! (`Arc<...>`) inside the closure.
//!
//! ## Example
//! ```rust
//! use pollvisor::{Probe, ProbeFn};
//!
//! let probe = ProbeFn::new("echo", |n: u32| async move { Ok::<u32, String>(n * 2) });
//! assert_eq!(Probe::<u32, u32, String>::name(&probe), "echo");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;

use super::probe::{BoxProbeFuture, Probe};

/// Function-backed probe implementation.
///
/// Wraps a closure that *creates* a new future per call.
#[derive(Debug)]
pub struct ProbeFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> ProbeFn<F> {
    /// Creates a new function-backed probe.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the probe and returns it behind an `Arc`, ready to be shared
    /// between pollers.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F, Fut, P, R, E> Probe<P, R, E> for ProbeFn<F>
where
    F: Fn(P) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, param: P) -> BoxProbeFuture<R, E> {
        (self.f)(param).boxed()
    }
}

impl<P, R, E, T> Probe<P, R, E> for Arc<T>
where
    T: Probe<P, R, E> + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn call(&self, param: P) -> BoxProbeFuture<R, E> {
        (**self).call(param)
    }
}
