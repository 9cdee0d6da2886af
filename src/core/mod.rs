//! Runtime core: poller state machine and cycle scheduling.
//!
//! The public API from this module is [`Poller`] (built through
//! [`PollerBuilder`]) together with its [`Config`] and [`Status`].
//!
//! Internal modules:
//! - [`poller`]: control surface (`start`/`pause`/`stop`) and shared state;
//! - [`cycle`]: one probe invocation and its reschedule/retry decision;
//! - [`timer`]: cancellable timer for the next scheduled cycle;
//! - [`builder`]: validated construction;
//! - [`status`]: lifecycle states.

mod builder;
mod config;
mod cycle;
mod poller;
mod status;
mod timer;

pub use builder::PollerBuilder;
pub use config::Config;
pub use poller::{Poller, StopPredicate};
pub use status::Status;
