//! Refresh heartbeat.
//!
//! The clock waits one interval, runs a cycle to completion, and only then
//! waits again. A slow cycle delays the next one instead of overlapping it.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

/// Self-rescheduling timer.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    interval: Duration,
}

impl Clock {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Run `cycle` every interval until `shutdown` changes or its sender is
    /// dropped.
    ///
    /// Shutdown is only observed between cycles; a running cycle is awaited
    /// to completion.
    pub async fn run<F, Fut>(&self, mut cycle: F, mut shutdown: watch::Receiver<bool>)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ()>,
    {
        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = shutdown.changed() => break,
            }
            if *shutdown.borrow() {
                break;
            }
            cycle().await;
        }
        debug!("Clock stopped");
    }
}
