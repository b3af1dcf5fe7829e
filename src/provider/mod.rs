//! Metrics provider abstraction.
//!
//! The refresh pipeline depends only on [`MetricsProvider`]. The production
//! implementation is [`ConnectClient`], which talks to the Amazon Connect
//! API; tests substitute scripted providers.

mod connect;
pub mod signing;
mod types;

pub use connect::{ConnectClient, ConnectClientBuilder};
pub use types::{
    CurrentMetric, CurrentMetricData, CurrentMetricRequest, Dimensions, Filters, ListQueuesPage,
    MetricDataPoint, MetricResult, QueueReference, QueueSummary, MAX_QUEUES_PER_REQUEST,
};

use async_trait::async_trait;

use crate::error::ProviderError;

/// Source of queue listings and real-time metric snapshots.
///
/// Implementations are expected to follow pagination themselves and return
/// complete results.
#[async_trait]
pub trait MetricsProvider: Send + Sync {
    /// List the queues of an instance, restricted to `queue_types`
    /// (e.g. `STANDARD`).
    async fn list_queues(
        &self,
        instance_id: &str,
        queue_types: &[String],
    ) -> Result<Vec<QueueSummary>, ProviderError>;

    /// Fetch the current metric snapshot described by `request`.
    async fn get_current_metric_data(
        &self,
        instance_id: &str,
        request: &CurrentMetricRequest,
    ) -> Result<CurrentMetricData, ProviderError>;

    /// Returns a human-readable description of the provider.
    fn description(&self) -> String;
}
