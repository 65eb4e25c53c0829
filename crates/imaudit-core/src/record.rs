//! Input rows for the two analyses

use serde::{Deserialize, Serialize};

use crate::significance::ConfidenceInterval;

/// One primary study as extracted from one systematic review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryStudyRecord {
    /// Review the study was extracted from, compared as given
    pub review_id: String,
    /// Study identifier before normalization
    pub raw_study_id: String,
    /// Free-text outcome label
    pub outcome: String,
    /// Effect-size label or value, compared as given
    pub effect_size: String,
}

impl PrimaryStudyRecord {
    pub fn new(
        review_id: impl Into<String>,
        raw_study_id: impl Into<String>,
        outcome: impl Into<String>,
        effect_size: impl Into<String>,
    ) -> Self {
        Self {
            review_id: review_id.into(),
            raw_study_id: raw_study_id.into(),
            outcome: outcome.into(),
            effect_size: effect_size.into(),
        }
    }

    /// Whether the effect-size cell holds anything; empty records cannot be grouped.
    ///
    /// Whitespace is a value, not a missing cell.
    pub fn has_effect_size(&self) -> bool {
        !self.effect_size.is_empty()
    }

    /// Whether the review-ID cell holds anything
    pub fn has_review_id(&self) -> bool {
        !self.review_id.is_empty()
    }
}

/// Original and recomputed pooled statistics for one outcome group.
///
/// Every numeric field is optional: a cell that failed to parse is missing,
/// never zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensitivityRow {
    pub group: String,
    pub orig_or: Option<f64>,
    pub new_or: Option<f64>,
    pub orig_lower: Option<f64>,
    pub orig_upper: Option<f64>,
    pub new_lower: Option<f64>,
    pub new_upper: Option<f64>,
    pub orig_i2: Option<f64>,
    pub new_i2: Option<f64>,
}

impl SensitivityRow {
    /// Create a row with every statistic missing
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            ..Default::default()
        }
    }

    /// Builder method to set both odds ratios
    pub fn with_odds_ratios(mut self, orig: Option<f64>, new: Option<f64>) -> Self {
        self.orig_or = orig;
        self.new_or = new;
        self
    }

    /// Builder method to set the original interval
    pub fn with_original_ci(mut self, lower: Option<f64>, upper: Option<f64>) -> Self {
        self.orig_lower = lower;
        self.orig_upper = upper;
        self
    }

    /// Builder method to set the recomputed interval
    pub fn with_recomputed_ci(mut self, lower: Option<f64>, upper: Option<f64>) -> Self {
        self.new_lower = lower;
        self.new_upper = upper;
        self
    }

    /// Builder method to set both I2 values
    pub fn with_i2(mut self, orig: Option<f64>, new: Option<f64>) -> Self {
        self.orig_i2 = orig;
        self.new_i2 = new;
        self
    }

    /// Percent change of the odds ratio relative to the original.
    ///
    /// Absent when either odds ratio is missing or the original is zero.
    pub fn pct_change_or(&self) -> Option<f64> {
        let (orig, new) = (self.orig_or?, self.new_or?);
        if orig == 0.0 {
            return None;
        }
        Some((new - orig).abs() / orig.abs() * 100.0)
    }

    /// Whether the original odds ratio is exactly zero
    pub fn has_zero_original_or(&self) -> bool {
        self.orig_or == Some(0.0)
    }

    pub fn original_ci(&self) -> Option<ConfidenceInterval> {
        ConfidenceInterval::from_bounds(self.orig_lower, self.orig_upper)
    }

    pub fn recomputed_ci(&self) -> Option<ConfidenceInterval> {
        ConfidenceInterval::from_bounds(self.new_lower, self.new_upper)
    }

    /// Drop in heterogeneity (original minus recomputed I2)
    pub fn i2_reduction(&self) -> Option<f64> {
        Some(self.orig_i2? - self.new_i2?)
    }
}
