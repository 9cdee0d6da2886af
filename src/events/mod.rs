//! Poller events: types and listener registry.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and typed payloads
//! - [`Notifier`] listener registry with synchronous, panic-isolated fan-out
//!
//! ## Quick reference
//! - **Publisher**: the poller's cycle and control surface (`core`).
//! - **Consumers**: user [`Listener`]s, and the optional `LogWriter`.

mod event;
mod notifier;

pub use event::{Event, EventKind};
pub use notifier::{Listener, Notifier};
