//! The refresh pipeline.
//!
//! Each tick lists queues (until a nonempty list has been cached), fetches
//! a metric snapshot for every cached queue, and re-evaluates the quadrants.
//! Provider failures are absorbed into status messages so the next tick
//! simply tries again.

use tracing::{debug, info, warn};

use crate::config::WallboardConfig;
use crate::data::metrics::QUEUE_GROUPING;
use crate::data::{current_metrics, evaluate_all, Board, MetricSnapshot, QuadrantConfig, StatusMessage};
use crate::error::ProviderError;
use crate::provider::{
    CurrentMetricData, CurrentMetricRequest, Filters, MetricsProvider, QueueSummary,
    MAX_QUEUES_PER_REQUEST,
};

/// Where the pipeline got to on its last tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Required settings are missing; nothing is ever fetched.
    Unconfigured,
    LoadingQueues,
    QueuesLoaded { count: usize },
    FetchingMetrics,
    MetricsReady,
    MetricsEmpty,
}

/// Mutable state owned by one pipeline.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Cached once nonempty, never cleared.
    pub queues: Option<Vec<QueueSummary>>,
    pub snapshot: Option<MetricSnapshot>,
    pub status: Option<StatusMessage>,
}

#[derive(Debug)]
pub struct Pipeline<P> {
    provider: Option<P>,
    instance_id: String,
    queue_types: Vec<String>,
    group_by_queue: bool,
    quadrants: Vec<QuadrantConfig>,
    session: Session,
    phase: Phase,
}

impl<P: MetricsProvider> Pipeline<P> {
    pub fn new(provider: P, config: &WallboardConfig) -> Self {
        Self {
            provider: Some(provider),
            instance_id: config.instance_id.clone(),
            queue_types: config.queue_types.clone(),
            group_by_queue: config.group_by_queue,
            quadrants: config.quadrants.clone(),
            session: Session::default(),
            phase: Phase::LoadingQueues,
        }
    }

    /// A pipeline that permanently reports a configuration problem.
    pub fn unconfigured(reason: &str) -> Self {
        warn!(reason, "Wallboard is not configured");
        Self {
            provider: None,
            instance_id: String::new(),
            queue_types: Vec::new(),
            group_by_queue: false,
            quadrants: Vec::new(),
            session: Session {
                status: Some(StatusMessage::NotConfigured),
                ..Session::default()
            },
            phase: Phase::Unconfigured,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn description(&self) -> String {
        match &self.provider {
            Some(provider) => provider.description(),
            None => "unconfigured".to_string(),
        }
    }

    /// Run one refresh cycle and return the resulting board.
    pub async fn tick(&mut self) -> Board {
        let Some(provider) = self.provider.as_ref() else {
            self.phase = Phase::Unconfigured;
            return self.board();
        };

        if self.session.queues.is_none() {
            self.phase = Phase::LoadingQueues;
            match provider.list_queues(&self.instance_id, &self.queue_types).await {
                Ok(queues) if queues.is_empty() => {
                    info!("No queues returned for instance");
                    self.phase = Phase::QueuesLoaded { count: 0 };
                    self.session.status = Some(StatusMessage::NoQueues);
                    return self.board();
                }
                Ok(queues) => {
                    info!(count = queues.len(), "Loaded queues");
                    self.phase = Phase::QueuesLoaded { count: queues.len() };
                    self.session.queues = Some(queues);
                }
                Err(e) => {
                    warn!(error = %e, "Failed to list queues");
                    self.session.status = Some(StatusMessage::QueuesFailed);
                    return self.board();
                }
            }
        }

        self.phase = Phase::FetchingMetrics;
        match self.fetch_metrics(provider).await {
            Ok(data) => match MetricSnapshot::from_response(&data, self.group_by_queue) {
                Some(snapshot) => {
                    debug!(metrics = snapshot.values.len(), time = %snapshot.snapshot_time, "Metrics refreshed");
                    self.session.snapshot = Some(snapshot);
                    self.session.status = None;
                    self.phase = Phase::MetricsReady;
                }
                None => {
                    info!(time = %data.data_snapshot_time, "No metric results");
                    self.session.snapshot = None;
                    self.session.status = Some(StatusMessage::NoMetrics(data.data_snapshot_time));
                    self.phase = Phase::MetricsEmpty;
                }
            },
            Err(e) => {
                warn!(error = %e, "Failed to get metrics");
                self.session.status = Some(StatusMessage::MetricsFailed);
            }
        }

        self.board()
    }

    /// Fetch metrics for every cached queue, one request per batch of
    /// [`MAX_QUEUES_PER_REQUEST`] queues, merged into a single response.
    async fn fetch_metrics(&self, provider: &P) -> Result<CurrentMetricData, ProviderError> {
        let mut merged: Option<CurrentMetricData> = None;
        for request in self.metric_requests() {
            let page = provider.get_current_metric_data(&self.instance_id, &request).await?;
            match merged.as_mut() {
                Some(data) => data.merge_page(page),
                None => merged = Some(page),
            }
        }
        merged.ok_or_else(|| ProviderError::Parse("no queues to fetch".to_string()))
    }

    fn metric_requests(&self) -> Vec<CurrentMetricRequest> {
        let ids: Vec<String> = self
            .session
            .queues
            .iter()
            .flatten()
            .map(|q| q.id.clone())
            .collect();

        ids.chunks(MAX_QUEUES_PER_REQUEST)
            .map(|batch| CurrentMetricRequest {
                filters: Filters {
                    queues: batch.to_vec(),
                    channels: Vec::new(),
                },
                groupings: if self.group_by_queue {
                    vec![QUEUE_GROUPING.to_string()]
                } else {
                    Vec::new()
                },
                current_metrics: current_metrics(),
                next_token: None,
            })
            .collect()
    }

    /// The board for the current session state.
    ///
    /// With a snapshot the quadrants are shown and any status becomes a
    /// notice; without one the status takes the whole screen.
    pub fn board(&self) -> Board {
        match &self.session.snapshot {
            Some(snapshot) => Board::Metrics {
                snapshot_time: snapshot.snapshot_time,
                quadrants: evaluate_all(&self.quadrants, &snapshot.values),
                notice: self.session.status.clone(),
            },
            None => Board::Status(
                self.session
                    .status
                    .clone()
                    .unwrap_or(StatusMessage::Loading),
            ),
        }
    }
}
