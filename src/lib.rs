//! # pollvisor
//!
//! **Pollvisor** is a lightweight asynchronous polling controller for Rust.
//!
//! Given an async probe, it invokes the probe on a fixed delay, tracks a
//! lifecycle status, supports pause/resume/stop, consults a stop predicate
//! after every success, retries consecutive failures up to a bound, and
//! notifies listeners of what happened.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   ┌──────────────────────┐        ┌──────────────────────┐
//!   │   Poller (handle)    │        │     PollerBuilder    │
//!   │ start / pause / stop │◄───────│ probe, param, delay, │
//!   │ subscribe / status   │ build  │ max_retries, pred.   │
//!   └──────────┬───────────┘        └──────────────────────┘
//!              ▼
//! ┌───────────────────────────────────────────────────────────┐
//! │  Inner (shared state, behind Arc)                         │
//! │  - State { status, previous, retries, run, timer }        │
//! │  - Notifier (listeners keyed by EventKind)                │
//! │  - runtime Handle (where cycles and timers are spawned)   │
//! └──────┬─────────────────────────────────────────────┬──────┘
//!        ▼                                             │
//!  ┌──────────────┐    delay    ┌──────────────┐       │
//!  │ cycle(run)   │────────────►│ PendingTimer │       │
//!  │ probe.call() │◄────────────│ (cancellable)│       │
//!  └──────┬───────┘    fire     └──────────────┘       │
//!         │ Poll / StatusChange / End / Error          │
//!         ▼                                            ▼
//! ┌───────────────────────────────────────────────────────────┐
//! │                 Notifier::emit (synchronous)              │
//! └──────────┬──────────────────┬─────────────────┬───────────┘
//!            ▼                  ▼                 ▼
//!        listener1          listener2        LogWriter
//! ```
//!
//! ### Lifecycle
//! ```text
//! start() ──► Polling, retries = 0, run += 1 ──► cycle(run)
//!
//! cycle(run) {
//!   ├─► guard: status == Polling && run is current (else: no effect)
//!   ├─► result = probe.call(param).await
//!   │       │
//!   │       ├─ Ok  ──► done = stop_when(&result, previous)
//!   │       │          ├─► previous = result; emit Poll
//!   │       │          ├─ done ─► stop() ─► Finished; emit End(previous)
//!   │       │          └─ else ─► retries = 0; timer(delay) ─► cycle(run)
//!   │       │
//!   │       └─ Err ──► retries < max_retries
//!   │                  ├─ yes ─► retries += 1; timer(delay) ─► cycle(run)
//!   │                  └─ no  ─► Finished; emit Error
//!   │
//!   └─ a result whose run was superseded (pause/stop/restart) is discarded
//! }
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                   |
//! |-------------------|---------------------------------------------------------------|--------------------------------------|
//! | **Control**       | Start, pause, resume and stop polling.                        | [`Poller`], [`Status`]               |
//! | **Construction**  | Validated builder with defaults.                              | [`PollerBuilder`], [`Config`]        |
//! | **Probes**        | The async operation being polled, as a trait or a closure.   | [`Probe`], [`ProbeFn`], [`ProbeRef`] |
//! | **Events**        | Subscribe to polls, status changes, termination and errors.  | [`Event`], [`EventKind`], [`Listener`] |
//! | **Errors**        | Typed construction and cycle errors.                          | [`PollerError`], [`CycleError`]      |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in `LogWriter` listener _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use pollvisor::{EventKind, Poller, ProbeFn, Status};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let probe = ProbeFn::new("job-status", |id: u64| async move {
//!         // Pretend the job finishes immediately.
//!         Ok::<String, String>(format!("job {id}: done"))
//!     });
//!
//!     let poller = Poller::builder()
//!         .probe(probe)
//!         .param(7)
//!         .stop_when(|current: &String, _: Option<&String>| current.ends_with("done"))
//!         .delay(Duration::from_millis(100))
//!         .max_retries(2)
//!         .build()?;
//!
//!     #[cfg(feature = "logging")]
//!     pollvisor::LogWriter::new("job-status").attach(&poller);
//!
//!     poller.on(EventKind::End, |ev| println!("finished with {:?}", ev.result()));
//!
//!     poller.start();
//!     tokio::time::sleep(Duration::from_millis(10)).await;
//!     assert_eq!(poller.status(), Status::Finished);
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod listeners;
mod probes;

// ---- Public re-exports ----

pub use core::{Config, Poller, PollerBuilder, Status, StopPredicate};
pub use error::{CycleError, PollerError};
pub use events::{Event, EventKind, Listener, Notifier};
pub use probes::{BoxProbeFuture, Probe, ProbeFn, ProbeRef};

// Optional: expose a simple built-in logger listener (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use listeners::LogWriter;
