//! Summary statistics for partially missing data
//!
//! Provides common statistical summaries:
//! - Mean, standard deviation
//! - Min, max, range
//! - Median
//!
//! Missing values (`None`, NaN, infinities) are counted but never enter a
//! statistic.

use serde::{Deserialize, Serialize};

/// Summary statistics for a numeric dataset with missing values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Number of present (finite) values
    pub count: usize,
    /// Number of missing values
    pub missing: usize,
    /// Minimum value
    pub min: Option<f64>,
    /// Maximum value
    pub max: Option<f64>,
    /// Mean (average) over present values
    pub mean: Option<f64>,
    /// Population standard deviation
    pub std_dev: Option<f64>,
    /// Median (50th percentile)
    pub median: Option<f64>,
}

impl SummaryStats {
    /// Compute summary statistics from data, treating non-finite values as missing
    pub fn from_data(data: &[f64]) -> Self {
        Self::from_values(data.iter().map(|&x| Some(x)))
    }

    /// Compute summary statistics from optional values
    pub fn from_optional(data: &[Option<f64>]) -> Self {
        Self::from_values(data.iter().copied())
    }

    /// Compute summary statistics from any sequence of optional values
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let mut finite = Vec::new();
        let mut missing = 0;
        for value in values {
            match value {
                Some(x) if x.is_finite() => finite.push(x),
                _ => missing += 1,
            }
        }

        if finite.is_empty() {
            return Self::empty(missing);
        }

        let count = finite.len();
        let mean = finite.iter().sum::<f64>() / count as f64;
        let variance = finite.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / count as f64;

        finite.sort_by(f64::total_cmp);
        let median = if count % 2 == 0 {
            (finite[count / 2 - 1] + finite[count / 2]) / 2.0
        } else {
            finite[count / 2]
        };

        Self {
            count,
            missing,
            min: finite.first().copied(),
            max: finite.last().copied(),
            mean: Some(mean),
            std_dev: Some(variance.sqrt()),
            median: Some(median),
        }
    }

    /// Create empty statistics (every statistic absent)
    fn empty(missing: usize) -> Self {
        Self {
            count: 0,
            missing,
            min: None,
            max: None,
            mean: None,
            std_dev: None,
            median: None,
        }
    }

    /// Whether no value was present
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Total number of observations, present or missing
    pub fn total(&self) -> usize {
        self.count + self.missing
    }

    /// Get the range (max - min)
    pub fn range(&self) -> Option<f64> {
        Some(self.max? - self.min?)
    }
}
