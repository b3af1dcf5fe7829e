//! Quadrant configuration and threshold evaluation.
//!
//! Each quadrant has a display template, a description template and three
//! boolean expressions. Evaluation substitutes metric values into all five,
//! evaluates the expressions independently and resolves a single color.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::expr;
use super::template::substitute;

/// Templates for one display quadrant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuadrantConfig {
    /// Large value shown in the quadrant, e.g. `"CONTACTS_IN_QUEUE"`.
    pub display: String,
    /// Caption shown under the value.
    pub description: String,
    pub green: String,
    pub yellow: String,
    pub red: String,
}

/// Color classification of a quadrant.
///
/// Ordered by severity so `max()` picks the winning color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorState {
    #[default]
    None,
    Green,
    Yellow,
    Red,
}

impl ColorState {
    /// Resolve the color from the three expression results.
    ///
    /// Red beats yellow beats green; if none hold the quadrant is neutral.
    pub fn resolve(green: bool, yellow: bool, red: bool) -> Self {
        if red {
            ColorState::Red
        } else if yellow {
            ColorState::Yellow
        } else if green {
            ColorState::Green
        } else {
            ColorState::None
        }
    }

    /// Returns a short label for display and export.
    pub fn label(&self) -> &'static str {
        match self {
            ColorState::None => "-",
            ColorState::Green => "OK",
            ColorState::Yellow => "WARN",
            ColorState::Red => "CRIT",
        }
    }
}

/// Render-ready state of one quadrant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadrantView {
    pub display_text: String,
    pub description_text: String,
    pub color: ColorState,
}

/// Evaluate one threshold expression, treating any failure as `false`.
fn check(quadrant: usize, level: &str, source: &str, substituted: &str) -> bool {
    match expr::evaluate(substituted) {
        Ok(result) => result,
        Err(e) => {
            warn!(
                quadrant,
                level,
                expression = source,
                substituted,
                error = %e,
                "Threshold expression failed, treating as false"
            );
            false
        }
    }
}

impl QuadrantConfig {
    /// Evaluate this quadrant against a metric mapping.
    ///
    /// `index` is only used to label log output. This function is pure
    /// apart from logging.
    pub fn evaluate(&self, index: usize, values: &BTreeMap<String, f64>) -> QuadrantView {
        let green = check(index, "green", &self.green, &substitute(&self.green, values));
        let yellow = check(index, "yellow", &self.yellow, &substitute(&self.yellow, values));
        let red = check(index, "red", &self.red, &substitute(&self.red, values));

        QuadrantView {
            display_text: substitute(&self.display, values),
            description_text: substitute(&self.description, values),
            color: ColorState::resolve(green, yellow, red),
        }
    }
}

/// Evaluate every quadrant in order.
pub fn evaluate_all(quadrants: &[QuadrantConfig], values: &BTreeMap<String, f64>) -> Vec<QuadrantView> {
    quadrants
        .iter()
        .enumerate()
        .map(|(i, q)| q.evaluate(i + 1, values))
        .collect()
}
