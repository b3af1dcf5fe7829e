//! Metric processing and threshold evaluation.
//!
//! ## Submodules
//!
//! - [`metrics`]: The fixed metric set and response flattening ([`MetricSnapshot`])
//! - [`template`]: Token-aware substitution of metric values into templates
//! - [`expr`]: The closed boolean grammar used by threshold expressions
//! - [`quadrant`]: Quadrant configuration and color resolution ([`ColorState`])
//! - [`board`]: The presentation model ([`Board`], [`BoardView`])
//! - [`timestamp`]: Localized timestamp formatting
//!
//! ## Data Flow
//!
//! ```text
//! CurrentMetricData (API response)
//!        │
//!        ▼
//! MetricSnapshot::from_response()
//!        │
//!        ▼
//! evaluate_all() ──▶ substitute() ──▶ expr::evaluate()
//!        │
//!        ▼
//! Board::Metrics ──▶ Board::view() ──▶ BoardView
//! ```

pub mod board;
pub mod expr;
pub mod metrics;
pub mod quadrant;
pub mod template;
pub mod timestamp;

pub use board::{Board, BoardView, StatusMessage};
pub use metrics::{current_metrics, MetricSnapshot};
pub use quadrant::{evaluate_all, ColorState, QuadrantConfig, QuadrantView};
pub use timestamp::format_timestamp;
