//! Statistical significance from confidence intervals on a ratio scale.
//!
//! An effect is significant when its interval excludes the null value. For
//! odds ratios the null is 1.0. A bound sitting exactly on the null counts as
//! including it.

use serde::{Deserialize, Serialize};

/// Null value of an odds ratio (no effect).
pub const NULL_ODDS_RATIO: f64 = 1.0;

/// Whether an odds-ratio confidence interval excludes 1.0.
pub fn is_significant(lower: f64, upper: f64) -> bool {
    lower > NULL_ODDS_RATIO || upper < NULL_ODDS_RATIO
}

/// Lower and upper bounds around an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Build from optional bounds; absent if either bound is missing.
    pub fn from_bounds(lower: Option<f64>, upper: Option<f64>) -> Option<Self> {
        Some(Self::new(lower?, upper?))
    }

    /// Whether the interval lies strictly on one side of `null`.
    pub fn excludes(&self, null: f64) -> bool {
        self.lower > null || self.upper < null
    }
}

/// Applies the same significance rule to every interval it sees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignificanceEvaluator {
    null_value: f64,
}

impl SignificanceEvaluator {
    pub fn new(null_value: f64) -> Self {
        Self { null_value }
    }

    pub fn null_value(&self) -> f64 {
        self.null_value
    }

    pub fn is_significant(&self, interval: ConfidenceInterval) -> bool {
        interval.excludes(self.null_value)
    }
}

impl Default for SignificanceEvaluator {
    fn default() -> Self {
        Self::new(NULL_ODDS_RATIO)
    }
}
