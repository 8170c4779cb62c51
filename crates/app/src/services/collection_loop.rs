//! Collection loop — repeats the collection cycle on a fixed interval.

use std::time::Duration;

use tokio::sync::watch;

use crate::ports::{RadioLink, RadioScanner, Reporter};
use crate::services::collection_cycle::CollectionCycle;

/// Runs [`CollectionCycle::run_cycle`] forever, sleeping `interval` between
/// cycles, until the shutdown flag turns `true` or its sender is dropped.
///
/// A failed cycle is logged and the loop continues after the normal sleep.
pub struct CollectionLoop<R, P> {
    cycle: CollectionCycle<R, P>,
    interval: Duration,
    shutdown: watch::Receiver<bool>,
}

impl<R, P> CollectionLoop<R, P>
where
    R: RadioScanner + RadioLink,
    P: Reporter,
{
    /// Wire a cycle to a shutdown flag. The same flag stops the cycle between
    /// device sessions.
    #[must_use]
    pub fn new(
        cycle: CollectionCycle<R, P>,
        interval: Duration,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            cycle: cycle.with_shutdown(shutdown.clone()),
            interval,
            shutdown,
        }
    }

    /// Run until shutdown.
    pub async fn run(mut self) {
        tracing::info!(interval_secs = self.interval.as_secs(), "collection loop started");

        loop {
            if *self.shutdown.borrow() {
                break;
            }

            if let Err(err) = self.cycle.run_cycle().await {
                tracing::warn!(error = ?err, "collection cycle failed, retrying next interval");
            }

            tokio::select! {
                () = tokio::time::sleep(self.interval) => {}
                changed = self.shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        tracing::info!("collection loop stopped");
    }
}
