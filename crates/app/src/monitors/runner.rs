//! Monitor loop: tick, sleep, repeat until shutdown.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use facility_domain::error::MonitorTickError;
use facility_domain::time::{Timestamp, now};

use crate::actuation::error_chain;
use crate::event_log::EventLog;

/// A periodic control loop body.
pub trait Monitor: Send {
    /// Human-readable name used in log messages (`"Climate"`, …).
    fn name(&self) -> &'static str;

    /// Run one iteration at wall-clock time `now`.
    fn tick(&mut self, now: Timestamp) -> impl Future<Output = Result<(), MonitorTickError>> + Send;
}

/// How often a monitor runs, and how long it waits after a failed tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    pub interval: Duration,
    pub backoff: Duration,
}

impl Cadence {
    #[must_use]
    pub const fn from_secs(interval: u64, backoff: u64) -> Self {
        Self {
            interval: Duration::from_secs(interval),
            backoff: Duration::from_secs(backoff),
        }
    }
}

/// Drive `monitor` until `shutdown` flips to `true` (or its sender is
/// dropped).
///
/// The first tick runs immediately. Shutdown is only observed between ticks;
/// a tick in progress always completes. A failed tick is logged and followed
/// by the backoff delay instead of the regular interval.
pub async fn run<M: Monitor>(
    mut monitor: M,
    cadence: Cadence,
    log: Arc<EventLog>,
    mut shutdown: watch::Receiver<bool>,
) {
    let name = monitor.name();
    tracing::info!(monitor = name, "monitor started");
    loop {
        if *shutdown.borrow_and_update() {
            break;
        }
        let delay = match monitor.tick(now()).await {
            Ok(()) => cadence.interval,
            Err(err) => {
                let cause = err.source.as_ref();
                tracing::warn!(monitor = name, error = %error_chain(cause), "tick failed");
                log.error(format!("{name} monitoring error: {}", error_chain(cause)));
                cadence.backoff
            }
        };
        tokio::select! {
            () = tokio::time::sleep(delay) => {}
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
    tracing::info!(monitor = name, "monitor stopped");
}
