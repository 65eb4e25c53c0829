//! Plain-text report rendering

use imaudit_core::{OverlapReport, SensitivityReport};
use imaudit_stats::SummaryStats;

use crate::analysis::{AnalysisResult, AuditOutcome};

/// Render the full outcome as text
pub fn render_text(outcome: &AuditOutcome, list_groups: bool) -> String {
    let mut out = String::new();

    match &outcome.overlap {
        AnalysisResult::Completed(report) => render_overlap(&mut out, report, list_groups),
        AnalysisResult::Failed(message) => {
            out.push_str(&format!("Error analyzing overlap: {}\n", message));
        }
        AnalysisResult::Skipped => {}
    }

    if !outcome.overlap.is_skipped() && !outcome.sensitivity.is_skipped() {
        out.push('\n');
    }

    match &outcome.sensitivity {
        AnalysisResult::Completed(report) => render_sensitivity(&mut out, report),
        AnalysisResult::Failed(message) => {
            out.push_str(&format!("Error analyzing sensitivity: {}\n", message));
        }
        AnalysisResult::Skipped => {}
    }

    out
}

fn render_overlap(out: &mut String, report: &OverlapReport, list_groups: bool) {
    out.push_str("Overlap Analysis:\n");
    out.push_str(&format!(
        "  Within-review primary study overlap count: {}\n",
        report.within_review_count
    ));
    out.push_str(&format!(
        "  Between-review primary study overlap count: {}\n",
        report.between_review_count
    ));
    out.push_str("  (Calculated as excess copies beyond the first instance)\n");
    out.push_str(&format!(
        "  Unique primary studies: {} ({} duplicated)\n",
        report.total_groups, report.overlapping_groups
    ));
    out.push_str(&format!(
        "  Records excluded: {} other domain, {} no effect size, {} no review ID\n",
        report.excluded_other_domain,
        report.excluded_missing_effect_size,
        report.excluded_missing_review_id
    ));

    for (domain, counts) in &report.by_domain {
        out.push_str(&format!(
            "  {}: {} studies, {} duplicated, within {}, between {}\n",
            domain,
            counts.groups,
            counts.overlapping_groups,
            counts.within_review_count,
            counts.between_review_count
        ));
    }

    if list_groups {
        for group in &report.groups {
            let reviews = group
                .reviews
                .iter()
                .map(|(review, count)| format!("{} x{}", review, count))
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&format!(
                "    {} | {} | {} | {}\n",
                group.identity, group.effect_size, group.domain, reviews
            ));
        }
    }
}

fn render_sensitivity(out: &mut String, report: &SensitivityReport) {
    out.push_str("Sensitivity Analysis Results:\n");
    out.push_str(&format!(
        "  Average change in Odds Ratio: {}\n",
        format_average(&report.pct_change_or, "%")
    ));
    if report.excluded_zero_or > 0 {
        out.push_str(&format!(
            "  ({} rows with an original OR of zero excluded)\n",
            report.excluded_zero_or
        ));
    }
    out.push_str(&format!(
        "  Significance changes: {} of {} evaluated\n",
        report.significance_flips.len(),
        report.significance_evaluated
    ));
    if report.significance_preserved() {
        out.push_str(
            "  All outcomes maintained their original statistical significance status.\n",
        );
    } else {
        out.push_str(&format!(
            "  Outcomes with changed significance: {}\n",
            report.flipped_groups().join(", ")
        ));
    }
    out.push_str(&format!(
        "  Average reduction in I2: {}\n",
        format_average(&report.i2_reduction, "% points")
    ));
}

fn format_average(stats: &SummaryStats, unit: &str) -> String {
    match stats.mean {
        Some(mean) => format!("{:.2}{} (n={})", mean, unit, stats.count),
        None => "n/a (no eligible rows)".to_string(),
    }
}
