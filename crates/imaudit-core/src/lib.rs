//! imaudit-core: overlap and robustness auditing for evidence synthesis
//!
//! This library provides pure Rust implementations of:
//! - Outcome classification into semantic domains
//! - Study identity normalization
//! - Within-review and between-review primary study overlap counting
//! - Confidence-interval significance checks on the odds-ratio scale
//! - Original vs recomputed sensitivity comparison
//!
//! The two analyses are independent: overlap detection consumes
//! [`PrimaryStudyRecord`]s, sensitivity comparison consumes
//! [`SensitivityRow`]s. Neither performs I/O; loading lives in `imaudit-io`
//! and presentation in the `imaudit` binary.

pub mod config;
pub mod domain;
pub mod identity;
pub mod overlap;
pub mod record;
pub mod sensitivity;
pub mod significance;

pub use config::{AuditConfig, ConfigError, SignificanceConfig};
pub use domain::{Domain, DomainClassifier, DomainEntry, DomainTable};
pub use identity::{normalize, NormalizedIdentity};
pub use overlap::{
    detect_overlap, DomainOverlap, GroupedRecords, OverlapDetector, OverlapGroup,
    OverlapGroupSummary, OverlapKey, OverlapReport,
};
pub use record::{PrimaryStudyRecord, SensitivityRow};
pub use sensitivity::{compare, SensitivityComparator, SensitivityReport, SignificanceFlip};
pub use significance::{is_significant, ConfidenceInterval, SignificanceEvaluator};
