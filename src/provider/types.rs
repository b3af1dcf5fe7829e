//! Wire types for the Amazon Connect queue and real-time metric APIs.
//!
//! Field names follow the API's PascalCase JSON. Timestamps arrive as
//! fractional epoch seconds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A queue as returned by `ListQueues`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueueSummary {
    pub id: String,
    /// Agent queues have no name.
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_type: Option<String>,
}

impl QueueSummary {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arn: None,
            queue_type: None,
        }
    }
}

/// One page of a `ListQueues` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListQueuesPage {
    #[serde(default)]
    pub queue_summary_list: Vec<QueueSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

/// A requested real-time metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CurrentMetric {
    pub name: String,
    pub unit: String,
}

impl CurrentMetric {
    pub fn new(name: &str, unit: &str) -> Self {
        Self {
            name: name.to_string(),
            unit: unit.to_string(),
        }
    }
}

/// Most queue ids one `GetCurrentMetricData` request may filter on.
pub const MAX_QUEUES_PER_REQUEST: usize = 100;

/// Filters for `GetCurrentMetricData`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Filters {
    pub queues: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub channels: Vec<String>,
}

/// Body of a `GetCurrentMetricData` request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CurrentMetricRequest {
    pub filters: Filters,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groupings: Vec<String>,
    pub current_metrics: Vec<CurrentMetric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl CurrentMetricRequest {
    /// Whether results are grouped per queue.
    pub fn is_grouped(&self) -> bool {
        self.groupings.iter().any(|g| g == "QUEUE")
    }
}

/// Reference to a queue inside a result's dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueueReference {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
}

/// Grouping dimensions of a metric result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Dimensions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue: Option<QueueReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

/// A single metric value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricDataPoint {
    pub metric: CurrentMetric,
    /// Absent when the service has no value for the metric.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

/// Metric values for one set of dimensions (or for everything, when
/// ungrouped).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(default)]
    pub collections: Vec<MetricDataPoint>,
}

/// A `GetCurrentMetricData` response (or one page of it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CurrentMetricData {
    #[serde(with = "epoch_seconds")]
    pub data_snapshot_time: DateTime<Utc>,
    #[serde(default)]
    pub metric_results: Vec<MetricResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl CurrentMetricData {
    /// Append the results of a following page.
    ///
    /// The snapshot time of the first page is kept.
    pub fn merge_page(&mut self, page: CurrentMetricData) {
        self.metric_results.extend(page.metric_results);
        self.next_token = page.next_token;
    }
}

/// Fractional epoch seconds <-> `DateTime<Utc>`.
mod epoch_seconds {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        let secs = time.timestamp() as f64 + f64::from(time.timestamp_subsec_millis()) / 1000.0;
        serializer.serialize_f64(secs)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        if !secs.is_finite() {
            return Err(de::Error::custom("timestamp is not finite"));
        }
        let millis = (secs * 1000.0).round() as i64;
        DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| de::Error::custom(format!("timestamp out of range: {secs}")))
    }
}
