//! # Probe abstractions.
//!
//! - [`Probe`] - trait for the operation a poller invokes every cycle
//! - [`ProbeFn`] - closure-backed probe implementation
//! - [`ProbeRef`] - shared reference to a probe (`Arc<dyn Probe>`)
//! - [`BoxProbeFuture`] - the future a probe call returns

mod probe;
mod probe_fn;

pub use probe::{BoxProbeFuture, Probe, ProbeRef};
pub use probe_fn::ProbeFn;
