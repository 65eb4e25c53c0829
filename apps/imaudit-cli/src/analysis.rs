//! Runs the two analyses independently.
//!
//! A missing table or column aborts only the analysis that needed it.

use imaudit_core::{
    AuditConfig, OverlapReport, PrimaryStudyRecord, SensitivityReport, SensitivityRow,
};
use imaudit_io::{open_table, IoResult};
use serde::Serialize;

/// Outcome of one analysis
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisResult<T> {
    Skipped,
    Failed(String),
    Completed(T),
}

impl<T> AnalysisResult<T> {
    fn from_result<E: std::fmt::Display>(name: &str, result: Result<T, E>) -> Self {
        match result {
            Ok(report) => Self::Completed(report),
            Err(e) => {
                tracing::error!(analysis = name, error = %e, "analysis aborted");
                Self::Failed(e.to_string())
            }
        }
    }

    pub fn report(&self) -> Option<&T> {
        match self {
            Self::Completed(report) => Some(report),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }
}

/// What to run and where the inputs live
#[derive(Debug, Clone)]
pub struct AuditRequest {
    pub overlap_path: Option<String>,
    pub sensitivity_path: Option<String>,
}

/// Results of a full audit run
#[derive(Debug, Clone)]
pub struct AuditOutcome {
    pub overlap: AnalysisResult<OverlapReport>,
    pub sensitivity: AnalysisResult<SensitivityReport>,
}

impl AuditOutcome {
    /// Whether every requested analysis failed
    pub fn all_failed(&self) -> bool {
        let requested = [self.overlap.is_skipped(), self.sensitivity.is_skipped()]
            .iter()
            .filter(|skipped| !**skipped)
            .count();
        let failed = [self.overlap.error(), self.sensitivity.error()]
            .iter()
            .filter(|error| error.is_some())
            .count();
        requested > 0 && failed == requested
    }

    /// Machine-readable view of the outcome
    pub fn to_json_report(&self) -> JsonReport<'_> {
        let errors = [
            ("overlap", self.overlap.error()),
            ("sensitivity", self.sensitivity.error()),
        ]
        .into_iter()
        .filter_map(|(analysis, error)| error.map(|message| JsonError { analysis, message }))
        .collect();

        JsonReport {
            overlap: self.overlap.report(),
            sensitivity: self.sensitivity.report(),
            errors,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub overlap: Option<&'a OverlapReport>,
    pub sensitivity: Option<&'a SensitivityReport>,
    pub errors: Vec<JsonError<'a>>,
}

#[derive(Debug, Serialize)]
pub struct JsonError<'a> {
    pub analysis: &'static str,
    pub message: &'a str,
}

/// Run every requested analysis; failures are captured, not propagated
pub fn run(request: &AuditRequest, config: &AuditConfig) -> AuditOutcome {
    let overlap = match &request.overlap_path {
        Some(path) => AnalysisResult::from_result("overlap", run_overlap(path, config)),
        None => AnalysisResult::Skipped,
    };
    let sensitivity = match &request.sensitivity_path {
        Some(path) => AnalysisResult::from_result("sensitivity", run_sensitivity(path, config)),
        None => AnalysisResult::Skipped,
    };
    AuditOutcome {
        overlap,
        sensitivity,
    }
}

fn run_overlap(path: &str, config: &AuditConfig) -> IoResult<OverlapReport> {
    let records: Vec<PrimaryStudyRecord> = open_table(path)?;
    let report = config.overlap_detector().detect_overlap(&records);
    tracing::info!(
        records = records.len(),
        groups = report.total_groups,
        within = report.within_review_count,
        between = report.between_review_count,
        "overlap analysis complete"
    );
    Ok(report)
}

fn run_sensitivity(path: &str, config: &AuditConfig) -> IoResult<SensitivityReport> {
    let rows: Vec<SensitivityRow> = open_table(path)?;
    let report = config.sensitivity_comparator().compare(&rows);
    tracing::info!(
        rows = report.rows,
        flips = report.significance_flips.len(),
        "sensitivity analysis complete"
    );
    Ok(report)
}
