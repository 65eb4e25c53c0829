//! Sensitivity comparison of original vs recomputed pooled estimates
//!
//! Three aggregates, each over its own eligible rows:
//!
//! - mean percent change of the odds ratio (original is the denominator)
//! - groups whose significance status flipped
//! - mean reduction in I2 (original minus recomputed)
//!
//! A row missing an operand is skipped only by the aggregates that need it.

use imaudit_stats::SummaryStats;
use serde::Serialize;

use crate::record::SensitivityRow;
use crate::significance::SignificanceEvaluator;

/// A group whose significance changed under recomputation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignificanceFlip {
    pub group: String,
    pub original_significant: bool,
    pub recomputed_significant: bool,
}

impl SignificanceFlip {
    /// Significant originally, not after recomputation
    pub fn lost_significance(&self) -> bool {
        self.original_significant && !self.recomputed_significant
    }
}

/// Aggregate robustness metrics for a set of sensitivity rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityReport {
    /// Rows seen
    pub rows: usize,
    /// Percent change of the odds ratio over eligible rows
    pub pct_change_or: SummaryStats,
    /// Rows left out of `pct_change_or` because the original OR is zero
    pub excluded_zero_or: usize,
    /// Rows with all four interval bounds present
    pub significance_evaluated: usize,
    /// Flipped groups in input order
    pub significance_flips: Vec<SignificanceFlip>,
    /// I2 reduction over eligible rows
    pub i2_reduction: SummaryStats,
}

impl SensitivityReport {
    /// Mean percent change of the odds ratio; `None` when no row is eligible
    pub fn avg_pct_change_or(&self) -> Option<f64> {
        self.pct_change_or.mean
    }

    /// Mean reduction in I2 percentage points; `None` when no row is eligible
    pub fn avg_i2_reduction(&self) -> Option<f64> {
        self.i2_reduction.mean
    }

    /// Labels of the groups whose significance flipped
    pub fn flipped_groups(&self) -> Vec<&str> {
        self.significance_flips
            .iter()
            .map(|flip| flip.group.as_str())
            .collect()
    }

    /// Whether every evaluated group kept its significance status
    pub fn significance_preserved(&self) -> bool {
        self.significance_flips.is_empty()
    }
}

/// Compares original and recomputed statistics row by row
#[derive(Debug, Clone, Copy, Default)]
pub struct SensitivityComparator {
    evaluator: SignificanceEvaluator,
}

impl SensitivityComparator {
    pub fn new(evaluator: SignificanceEvaluator) -> Self {
        Self { evaluator }
    }

    pub fn evaluator(&self) -> &SignificanceEvaluator {
        &self.evaluator
    }

    /// Flip check for one row; `None` unless all four bounds are present
    pub fn significance_flip(&self, row: &SensitivityRow) -> Option<SignificanceFlip> {
        let original = self.evaluator.is_significant(row.original_ci()?);
        let recomputed = self.evaluator.is_significant(row.recomputed_ci()?);
        (original != recomputed).then(|| SignificanceFlip {
            group: row.group.clone(),
            original_significant: original,
            recomputed_significant: recomputed,
        })
    }

    pub fn compare(&self, rows: &[SensitivityRow]) -> SensitivityReport {
        let mut excluded_zero_or = 0;
        let mut significance_evaluated = 0;
        let mut significance_flips = Vec::new();

        for row in rows {
            if row.has_zero_original_or() {
                tracing::debug!(group = %row.group, "original OR is zero, skipping percent change");
                excluded_zero_or += 1;
            }

            if row.original_ci().is_some() && row.recomputed_ci().is_some() {
                significance_evaluated += 1;
                if let Some(flip) = self.significance_flip(row) {
                    tracing::debug!(
                        group = %flip.group,
                        original = flip.original_significant,
                        recomputed = flip.recomputed_significant,
                        "significance changed"
                    );
                    significance_flips.push(flip);
                }
            } else {
                tracing::debug!(
                    group = %row.group,
                    "interval bounds missing, skipping significance check"
                );
            }
        }

        SensitivityReport {
            rows: rows.len(),
            pct_change_or: SummaryStats::from_values(
                rows.iter().map(SensitivityRow::pct_change_or),
            ),
            excluded_zero_or,
            significance_evaluated,
            significance_flips,
            i2_reduction: SummaryStats::from_values(rows.iter().map(SensitivityRow::i2_reduction)),
        }
    }
}

/// Compare rows against the odds-ratio null of 1.0
pub fn compare(rows: &[SensitivityRow]) -> SensitivityReport {
    SensitivityComparator::default().compare(rows)
}
