//! The presentation model handed to the renderer.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::metrics::is_fresh;
use super::quadrant::QuadrantView;
use super::timestamp::format_timestamp;

/// Messages shown in place of (or alongside) the quadrants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Loading,
    NotConfigured,
    QueuesFailed,
    NoQueues,
    MetricsFailed,
    /// The API answered with zero results for the snapshot at this time.
    NoMetrics(DateTime<Utc>),
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusMessage::Loading => write!(f, "Loading..."),
            StatusMessage::NotConfigured => write!(f, "App not setup properly"),
            StatusMessage::QueuesFailed => write!(f, "Unable to list queues"),
            StatusMessage::NoQueues => write!(f, "No queues available"),
            StatusMessage::MetricsFailed => write!(f, "Unable to get metrics"),
            StatusMessage::NoMetrics(time) => {
                write!(f, "No metrics available - {}", format_timestamp(*time))
            }
        }
    }
}

/// What the wallboard currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum Board {
    Status(StatusMessage),
    Metrics {
        snapshot_time: DateTime<Utc>,
        quadrants: Vec<QuadrantView>,
        /// Set when the last refresh failed and these quadrants are left
        /// over from an earlier one.
        notice: Option<StatusMessage>,
    },
}

impl Default for Board {
    fn default() -> Self {
        Board::Status(StatusMessage::Loading)
    }
}

impl Board {
    /// Resolve the board into a render-ready view at `now`.
    pub fn view(&self, now: DateTime<Utc>, staleness: Duration) -> BoardView {
        match self {
            Board::Status(message) => BoardView {
                status: Some(message.to_string()),
                last_update: None,
                fresh: false,
                notice: None,
                quadrants: Vec::new(),
            },
            Board::Metrics {
                snapshot_time,
                quadrants,
                notice,
            } => BoardView {
                status: None,
                last_update: Some(format_timestamp(*snapshot_time)),
                fresh: is_fresh(*snapshot_time, now, staleness),
                notice: notice.as_ref().map(|n| n.to_string()),
                quadrants: quadrants.clone(),
            },
        }
    }

    pub fn quadrants(&self) -> &[QuadrantView] {
        match self {
            Board::Status(_) => &[],
            Board::Metrics { quadrants, .. } => quadrants,
        }
    }
}

/// Render-ready board state, also the JSON export format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardView {
    /// Full-screen status text; when set there are no quadrants.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,
    pub fresh: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub quadrants: Vec<QuadrantView>,
}
