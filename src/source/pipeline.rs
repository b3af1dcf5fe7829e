//! Data source backed by the refresh pipeline.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::info;

use super::channel::poll_watch;
use super::DataSource;
use crate::clock::Clock;
use crate::data::Board;
use crate::pipeline::Pipeline;
use crate::provider::MetricsProvider;

/// Runs a [`Pipeline`] on a background task and publishes every board it
/// produces.
///
/// The first cycle runs immediately; later cycles follow the clock.
/// Dropping the source stops the task after the running cycle, if any.
#[derive(Debug)]
pub struct PipelineSource {
    receiver: watch::Receiver<Board>,
    description: String,
    initial_returned: bool,
    error: Option<String>,
    // Dropping the sender is the shutdown signal.
    _shutdown: watch::Sender<bool>,
}

impl PipelineSource {
    /// Spawn the refresh task. Must be called inside a tokio runtime.
    pub fn spawn<P>(pipeline: Pipeline<P>, clock: Clock) -> Self
    where
        P: MetricsProvider + 'static,
    {
        let description = pipeline.description();
        let (board_tx, board_rx) = watch::channel(Board::default());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let board_tx = Arc::new(board_tx);
        let pipeline = Arc::new(Mutex::new(pipeline));

        tokio::spawn(async move {
            let cycle = move || {
                let pipeline = pipeline.clone();
                let board_tx = board_tx.clone();
                async move {
                    let board = pipeline.lock().await.tick().await;
                    board_tx.send_replace(board);
                }
            };

            cycle().await;
            clock.run(cycle, shutdown_rx).await;
            info!("Refresh task stopped");
        });

        Self {
            receiver: board_rx,
            description,
            initial_returned: false,
            error: None,
            _shutdown: shutdown_tx,
        }
    }
}

impl DataSource for PipelineSource {
    fn poll(&mut self) -> Option<Board> {
        if self.receiver.has_changed().is_err() && self.error.is_none() {
            self.error = Some("Refresh task stopped".to_string());
        }
        poll_watch(&mut self.receiver, &mut self.initial_returned)
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
