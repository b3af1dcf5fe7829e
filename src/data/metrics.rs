//! The fixed metric set and snapshot flattening.
//!
//! Amazon Connect reports `OLDEST_CONTACT_AGE` in milliseconds for
//! ungrouped requests and in seconds for requests grouped by queue. Both are
//! normalized to minutes here so thresholds are written in one unit.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::provider::{CurrentMetric, CurrentMetricData};

pub const OLDEST_CONTACT_AGE: &str = "OLDEST_CONTACT_AGE";

/// Grouping value requesting one result per queue.
pub const QUEUE_GROUPING: &str = "QUEUE";

const METRICS: [(&str, &str); 12] = [
    ("AGENTS_AFTER_CONTACT_WORK", "COUNT"),
    ("AGENTS_AVAILABLE", "COUNT"),
    ("AGENTS_ERROR", "COUNT"),
    ("AGENTS_NON_PRODUCTIVE", "COUNT"),
    ("AGENTS_ON_CONTACT", "COUNT"),
    ("AGENTS_ONLINE", "COUNT"),
    ("AGENTS_STAFFED", "COUNT"),
    ("CONTACTS_IN_QUEUE", "COUNT"),
    ("CONTACTS_SCHEDULED", "COUNT"),
    (OLDEST_CONTACT_AGE, "SECONDS"),
    ("SLOTS_ACTIVE", "COUNT"),
    ("SLOTS_AVAILABLE", "COUNT"),
];

/// The metrics requested on every refresh, in request order.
pub fn current_metrics() -> Vec<CurrentMetric> {
    METRICS
        .iter()
        .map(|(name, unit)| CurrentMetric::new(name, unit))
        .collect()
}

/// Normalize a raw value into the unit thresholds are written in.
pub fn normalize(name: &str, raw: f64, grouped: bool) -> f64 {
    if name != OLDEST_CONTACT_AGE {
        return raw;
    }
    if grouped {
        raw / 60.0
    } else {
        raw / 60_000.0
    }
}

/// Whether values of `name` add up across results.
///
/// Contacts belong to exactly one queue, so contact counts sum. An agent is
/// reported under every queue in its routing profile, so agent and slot
/// counts (and the oldest contact age) take the largest value instead.
pub fn sums_across_queues(name: &str) -> bool {
    name.starts_with("CONTACTS_")
}

/// A point-in-time metric mapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSnapshot {
    pub snapshot_time: DateTime<Utc>,
    pub values: BTreeMap<String, f64>,
}

impl MetricSnapshot {
    /// Flatten a response into a snapshot.
    ///
    /// Returns `None` when the response has no results. Several results
    /// (grouped per queue, or one per request batch) are combined as
    /// [`sums_across_queues`] describes. Data points without a value are
    /// skipped.
    pub fn from_response(data: &CurrentMetricData, grouped: bool) -> Option<Self> {
        if data.metric_results.is_empty() {
            return None;
        }

        let mut values: BTreeMap<String, f64> = BTreeMap::new();
        for result in &data.metric_results {
            for point in &result.collections {
                let Some(raw) = point.value else { continue };
                let name = &point.metric.name;
                let value = normalize(name, raw, grouped);

                values
                    .entry(name.clone())
                    .and_modify(|current| {
                        if sums_across_queues(name) {
                            *current += value;
                        } else {
                            *current = current.max(value);
                        }
                    })
                    .or_insert(value);
            }
        }

        Some(Self {
            snapshot_time: data.data_snapshot_time,
            values,
        })
    }

    pub fn is_fresh(&self, now: DateTime<Utc>, threshold: Duration) -> bool {
        is_fresh(self.snapshot_time, now, threshold)
    }
}

/// Whether data taken at `snapshot_time` is younger than `threshold`.
pub fn is_fresh(snapshot_time: DateTime<Utc>, now: DateTime<Utc>, threshold: Duration) -> bool {
    let age = now.signed_duration_since(snapshot_time);
    match chrono::Duration::from_std(threshold) {
        Ok(limit) => age < limit,
        Err(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{MetricDataPoint, MetricResult};
    use chrono::TimeZone;

    fn point(name: &str, value: Option<f64>) -> MetricDataPoint {
        MetricDataPoint {
            metric: CurrentMetric::new(name, "COUNT"),
            value,
        }
    }

    fn response(results: Vec<Vec<MetricDataPoint>>) -> CurrentMetricData {
        CurrentMetricData {
            data_snapshot_time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            metric_results: results
                .into_iter()
                .map(|collections| MetricResult {
                    dimensions: None,
                    collections,
                })
                .collect(),
            next_token: None,
        }
    }

    #[test]
    fn test_current_metrics_set() {
        let metrics = current_metrics();
        assert_eq!(metrics.len(), 12);
        let names: std::collections::BTreeSet<&str> =
            metrics.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names.len(), 12);
        assert!(names.contains("CONTACTS_IN_QUEUE"));
        assert!(names.contains("SLOTS_AVAILABLE"));

        let oldest = metrics.iter().find(|m| m.name == OLDEST_CONTACT_AGE).unwrap();
        assert_eq!(oldest.unit, "SECONDS");
        assert!(metrics
            .iter()
            .filter(|m| m.name != OLDEST_CONTACT_AGE)
            .all(|m| m.unit == "COUNT"));
    }

    #[test]
    fn test_oldest_contact_age_normalization() {
        assert_eq!(normalize(OLDEST_CONTACT_AGE, 120_000.0, false), 2.0);
        assert_eq!(normalize(OLDEST_CONTACT_AGE, 45.0, true), 0.75);
        assert_eq!(normalize("CONTACTS_IN_QUEUE", 45.0, true), 45.0);
    }

    #[test]
    fn test_from_response_ungrouped() {
        let data = response(vec![vec![
            point("CONTACTS_IN_QUEUE", Some(7.0)),
            point(OLDEST_CONTACT_AGE, Some(120_000.0)),
            point("AGENTS_ONLINE", None),
        ]]);
        let snapshot = MetricSnapshot::from_response(&data, false).unwrap();
        assert_eq!(snapshot.values.get("CONTACTS_IN_QUEUE"), Some(&7.0));
        assert_eq!(snapshot.values.get(OLDEST_CONTACT_AGE), Some(&2.0));
        assert!(!snapshot.values.contains_key("AGENTS_ONLINE"));
        assert_eq!(snapshot.snapshot_time, data.data_snapshot_time);
    }

    #[test]
    fn test_from_response_grouped_sums_and_maxes() {
        let data = response(vec![
            vec![point("CONTACTS_IN_QUEUE", Some(3.0)), point(OLDEST_CONTACT_AGE, Some(45.0))],
            vec![point("CONTACTS_IN_QUEUE", Some(4.0)), point(OLDEST_CONTACT_AGE, Some(120.0))],
        ]);
        let snapshot = MetricSnapshot::from_response(&data, true).unwrap();
        assert_eq!(snapshot.values.get("CONTACTS_IN_QUEUE"), Some(&7.0));
        assert_eq!(snapshot.values.get(OLDEST_CONTACT_AGE), Some(&2.0));
    }

    #[test]
    fn test_grouped_agents_are_not_double_counted() {
        let data = response(vec![
            vec![
                point("AGENTS_ONLINE", Some(5.0)),
                point("SLOTS_ACTIVE", Some(2.0)),
                point("CONTACTS_SCHEDULED", Some(1.0)),
            ],
            vec![
                point("AGENTS_ONLINE", Some(5.0)),
                point("SLOTS_ACTIVE", Some(3.0)),
                point("CONTACTS_SCHEDULED", Some(2.0)),
            ],
        ]);
        let snapshot = MetricSnapshot::from_response(&data, true).unwrap();
        assert_eq!(snapshot.values.get("AGENTS_ONLINE"), Some(&5.0));
        assert_eq!(snapshot.values.get("SLOTS_ACTIVE"), Some(&3.0));
        assert_eq!(snapshot.values.get("CONTACTS_SCHEDULED"), Some(&3.0));
    }

    #[test]
    fn test_combine_rule_per_metric() {
        assert!(sums_across_queues("CONTACTS_IN_QUEUE"));
        assert!(!sums_across_queues("AGENTS_AVAILABLE"));
        assert!(!sums_across_queues("SLOTS_AVAILABLE"));
        assert!(!sums_across_queues(OLDEST_CONTACT_AGE));
    }

    #[test]
    fn test_from_response_empty() {
        assert!(MetricSnapshot::from_response(&response(Vec::new()), false).is_none());
    }

    #[test]
    fn test_freshness_boundary() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let threshold = Duration::from_secs(15);
        assert!(is_fresh(t, t + chrono::Duration::seconds(14), threshold));
        assert!(!is_fresh(t, t + chrono::Duration::seconds(15), threshold));
        assert!(!is_fresh(t, t + chrono::Duration::seconds(16), threshold));
    }
}
