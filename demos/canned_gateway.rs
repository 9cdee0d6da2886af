//! Polls a fake gateway that replays canned responses until it answers
//! `"done!"` right after `"and"`.
//!
//! Two of the responses are failures; with the default `max_retries = 2` they
//! are tolerated. Pass a smaller bound to watch the poller give up:
//!
//! ```text
//! cargo run --example canned_gateway --features logging
//! cargo run --example canned_gateway --features logging -- 1
//! POLLVISOR_LOG=debug cargo run --example canned_gateway --features logging
//! ```

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use futures::FutureExt;
use parking_lot::Mutex;
use pollvisor::{BoxProbeFuture, Event, EventKind, LogWriter, Poller, Probe};
use tokio::sync::Notify;
use tracing_subscriber::EnvFilter;

const RESPONSES: [&str; 10] = [
    "just started",
    "wait for it",
    "not yet",
    "error",
    "error",
    "almost there!",
    "hold on tight",
    "and",
    "done!",
    "that wont show up",
];

/// Replays [`RESPONSES`], one per call, each after a simulated round trip.
struct CannedGateway {
    responses: Mutex<VecDeque<&'static str>>,
    latency: Duration,
}

impl CannedGateway {
    fn new(latency: Duration) -> Self {
        Self {
            responses: Mutex::new(RESPONSES.into_iter().collect()),
            latency,
        }
    }
}

impl Probe<(), &'static str, String> for CannedGateway {
    fn name(&self) -> &str {
        "canned-gateway"
    }

    fn call(&self, _: ()) -> BoxProbeFuture<&'static str, String> {
        let next = self.responses.lock().pop_front();
        let latency = self.latency;
        async move {
            tokio::time::sleep(latency).await;
            match next {
                Some("error") => {
                    tracing::warn!("network response error");
                    Err("network response error".to_string())
                }
                Some(body) => Ok(body),
                None => Err("gateway has nothing left to say".to_string()),
            }
        }
        .boxed()
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("POLLVISOR_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let max_retries = match std::env::args().nth(1) {
        Some(arg) => arg.parse().context("max_retries must be a non-negative integer")?,
        None => 2,
    };

    let poller = Poller::builder()
        .probe(CannedGateway::new(Duration::from_secs(1)))
        .stop_when(|current: &&str, previous: Option<&&str>| {
            *current == "done!" && previous == Some(&"and")
        })
        .delay(Duration::from_secs(1))
        .max_retries(max_retries)
        .build()?;

    LogWriter::new("canned-gateway").attach(&poller);

    let finished = Arc::new(Notify::new());
    for kind in [EventKind::End, EventKind::Error] {
        let finished = Arc::clone(&finished);
        poller.on(kind, move |_: &Event<&'static str, String>| finished.notify_one());
    }

    poller.start();
    finished.notified().await;

    tracing::info!(
        status = %poller.status(),
        last = ?poller.previous(),
        "gateway polling finished"
    );
    Ok(())
}
