//! Built-in listeners.
//!
//! - [`LogWriter`]: renders every event through `tracing` (feature `logging`).

#[cfg(feature = "logging")]
mod log;

#[cfg(feature = "logging")]
pub use log::LogWriter;
