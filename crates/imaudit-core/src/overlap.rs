//! Primary study overlap detection
//!
//! Records are grouped by (normalized study ID, effect size, domain). A group
//! with more than one member is a duplicated primary study. Duplication is
//! counted as excess copies beyond the first instance:
//!
//! - within a review, a study listed c times adds c - 1
//! - across reviews, a study found in r reviews adds r - 1
//!
//! A study in reviews A, B and C once each therefore adds 2 between-review
//! overlaps, not the 3 pairs A-B, A-C, B-C.
//!
//! A record with an empty review ID cannot be attributed to a review and is
//! left out of every count.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::{Domain, DomainClassifier};
use crate::identity::NormalizedIdentity;
use crate::record::PrimaryStudyRecord;

/// Identity of an underlying primary study
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct OverlapKey {
    pub identity: NormalizedIdentity,
    pub effect_size: String,
    pub domain: Domain,
}

/// All records sharing one [`OverlapKey`], in input order
#[derive(Debug, Clone)]
pub struct OverlapGroup<'a> {
    pub key: OverlapKey,
    pub members: Vec<&'a PrimaryStudyRecord>,
}

impl<'a> OverlapGroup<'a> {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether the group holds more than one record
    pub fn is_overlap(&self) -> bool {
        self.members.len() > 1
    }

    /// Number of members per review ID
    pub fn review_counts(&self) -> BTreeMap<&'a str, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.members {
            *counts.entry(record.review_id.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Redundant copies inside individual reviews
    pub fn within_review_excess(&self) -> usize {
        self.review_counts()
            .values()
            .filter(|&&count| count > 1)
            .map(|count| count - 1)
            .sum()
    }

    /// Extra reviews beyond the first that include this study
    pub fn between_review_excess(&self) -> usize {
        self.review_counts().len().saturating_sub(1)
    }

    pub fn summary(&self) -> OverlapGroupSummary {
        OverlapGroupSummary {
            identity: self.key.identity.to_string(),
            effect_size: self.key.effect_size.clone(),
            domain: self.key.domain,
            members: self.len(),
            reviews: self
                .review_counts()
                .into_iter()
                .map(|(review, count)| (review.to_string(), count))
                .collect(),
            within_review: self.within_review_excess(),
            between_review: self.between_review_excess(),
        }
    }
}

/// Records partitioned into groups, plus what was left out
#[derive(Debug, Clone, Default)]
pub struct GroupedRecords<'a> {
    /// Groups in key order, singletons included
    pub groups: Vec<OverlapGroup<'a>>,
    /// Records whose outcome mapped to no domain
    pub excluded_other_domain: usize,
    /// Records with a blank effect-size cell
    pub excluded_missing_effect_size: usize,
    /// Records with a blank review-ID cell
    pub excluded_missing_review_id: usize,
}

impl GroupedRecords<'_> {
    /// Records that entered a group
    pub fn records_considered(&self) -> usize {
        self.groups.iter().map(OverlapGroup::len).sum()
    }
}

/// Reportable view of one duplicated study
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlapGroupSummary {
    pub identity: String,
    pub effect_size: String,
    pub domain: Domain,
    pub members: usize,
    /// Copies per review ID
    pub reviews: BTreeMap<String, usize>,
    pub within_review: usize,
    pub between_review: usize,
}

/// Overlap counts restricted to one domain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DomainOverlap {
    pub groups: usize,
    pub overlapping_groups: usize,
    pub within_review_count: usize,
    pub between_review_count: usize,
}

/// Result of an overlap analysis
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OverlapReport {
    /// Excess copies of a study inside the same review
    pub within_review_count: usize,
    /// Excess reviews sharing a study
    pub between_review_count: usize,
    /// Distinct primary studies, singletons included
    pub total_groups: usize,
    /// Groups with more than one member
    pub overlapping_groups: usize,
    pub records_considered: usize,
    pub excluded_other_domain: usize,
    pub excluded_missing_effect_size: usize,
    pub excluded_missing_review_id: usize,
    pub by_domain: BTreeMap<Domain, DomainOverlap>,
    /// Duplicated studies in key order
    pub groups: Vec<OverlapGroupSummary>,
}

impl OverlapReport {
    /// Within-review plus between-review overlap
    pub fn total_overlap(&self) -> usize {
        self.within_review_count + self.between_review_count
    }

    pub fn has_overlap(&self) -> bool {
        self.overlapping_groups > 0
    }
}

/// Groups study records and counts duplication
#[derive(Debug, Clone, Default)]
pub struct OverlapDetector {
    classifier: DomainClassifier,
}

impl OverlapDetector {
    pub fn new(classifier: DomainClassifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &DomainClassifier {
        &self.classifier
    }

    /// Partition records by (identity, effect size, domain).
    ///
    /// Records classified `Other`, lacking an effect size or lacking a
    /// review ID are counted and dropped.
    pub fn group<'a>(&self, records: &'a [PrimaryStudyRecord]) -> GroupedRecords<'a> {
        let mut grouped = GroupedRecords::default();
        let mut by_key: BTreeMap<OverlapKey, Vec<&'a PrimaryStudyRecord>> = BTreeMap::new();
        let mut blank_ids = 0;

        for record in records {
            let domain = self.classifier.classify(&record.outcome);
            if !domain.is_classified() {
                tracing::debug!(outcome = %record.outcome, "outcome outside classified domains");
                grouped.excluded_other_domain += 1;
                continue;
            }
            if !record.has_effect_size() {
                tracing::debug!(
                    study_id = %record.raw_study_id,
                    review_id = %record.review_id,
                    "record has no effect size"
                );
                grouped.excluded_missing_effect_size += 1;
                continue;
            }
            if !record.has_review_id() {
                tracing::debug!(study_id = %record.raw_study_id, "record has no review ID");
                grouped.excluded_missing_review_id += 1;
                continue;
            }

            let identity = NormalizedIdentity::new(&record.raw_study_id);
            if identity.is_blank() {
                blank_ids += 1;
            }
            let key = OverlapKey {
                identity,
                effect_size: record.effect_size.clone(),
                domain,
            };
            by_key.entry(key).or_default().push(record);
        }

        if blank_ids > 0 {
            tracing::warn!(
                count = blank_ids,
                "records with blank study IDs share a single empty identity"
            );
        }

        grouped.groups = by_key
            .into_iter()
            .map(|(key, members)| OverlapGroup { key, members })
            .collect();
        grouped
    }

    /// Count within-review and between-review overlap across all records
    pub fn detect_overlap(&self, records: &[PrimaryStudyRecord]) -> OverlapReport {
        let grouped = self.group(records);

        let mut report = OverlapReport {
            total_groups: grouped.groups.len(),
            records_considered: grouped.records_considered(),
            excluded_other_domain: grouped.excluded_other_domain,
            excluded_missing_effect_size: grouped.excluded_missing_effect_size,
            excluded_missing_review_id: grouped.excluded_missing_review_id,
            ..Default::default()
        };

        for group in &grouped.groups {
            let domain = report.by_domain.entry(group.key.domain).or_default();
            domain.groups += 1;

            if !group.is_overlap() {
                continue;
            }

            let within = group.within_review_excess();
            let between = group.between_review_excess();
            tracing::debug!(
                identity = %group.key.identity,
                effect_size = %group.key.effect_size,
                domain = %group.key.domain,
                members = group.len(),
                within,
                between,
                "duplicated primary study"
            );

            domain.overlapping_groups += 1;
            domain.within_review_count += within;
            domain.between_review_count += between;

            report.overlapping_groups += 1;
            report.within_review_count += within;
            report.between_review_count += between;
            report.groups.push(group.summary());
        }

        report
    }
}

/// Detect overlap using the default domain table
pub fn detect_overlap(records: &[PrimaryStudyRecord]) -> OverlapReport {
    OverlapDetector::default().detect_overlap(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(review: &str, id: &str) -> PrimaryStudyRecord {
        PrimaryStudyRecord::new(review, id, "Depression", "OR")
    }

    #[test]
    fn test_empty_input() {
        let report = detect_overlap(&[]);
        assert_eq!(report, OverlapReport::default());
        assert_eq!(report.total_groups, 0);
    }

    #[test]
    fn test_singleton_contributes_nothing() {
        let report = detect_overlap(&[rec("R1", "A"), rec("R1", "B")]);
        assert_eq!(report.total_groups, 2);
        assert_eq!(report.within_review_count, 0);
        assert_eq!(report.between_review_count, 0);
        assert!(!report.has_overlap());
        assert!(report.groups.is_empty());
    }

    #[test]
    fn test_three_copies_in_one_review() {
        let report = detect_overlap(&[rec("R1", "A"), rec("R1", "A"), rec("R1", "A")]);
        assert_eq!(report.within_review_count, 2);
        assert_eq!(report.between_review_count, 0);
        assert_eq!(report.total_groups, 1);
    }

    #[test]
    fn test_two_reviews_once_each() {
        let report = detect_overlap(&[rec("R1", "A"), rec("R2", "A")]);
        assert_eq!(report.within_review_count, 0);
        assert_eq!(report.between_review_count, 1);
    }

    #[test]
    fn test_mixed_within_and_between() {
        let records = [rec("A", "S"), rec("A", "S"), rec("B", "S"), rec("C", "S")];
        let report = detect_overlap(&records);
        assert_eq!(report.within_review_count, 1);
        assert_eq!(report.between_review_count, 2);

        let group = &report.groups[0];
        assert_eq!(group.members, 4);
        assert_eq!(group.reviews.get("A"), Some(&2));
        assert_eq!(group.reviews.len(), 3);
    }

    #[test]
    fn test_identity_normalized_before_grouping() {
        let report = detect_overlap(&[rec("R1", "Smith 2019"), rec("R2", " smith 2019 ")]);
        assert_eq!(report.total_groups, 1);
        assert_eq!(report.between_review_count, 1);
        assert_eq!(report.groups[0].identity, "smith 2019");
    }

    #[test]
    fn test_effect_size_and_domain_split_groups() {
        let records = [
            PrimaryStudyRecord::new("R1", "A", "Depression", "OR"),
            PrimaryStudyRecord::new("R2", "A", "Depression", "RR"),
            PrimaryStudyRecord::new("R3", "A", "Insomnia", "OR"),
        ];
        let report = detect_overlap(&records);
        assert_eq!(report.total_groups, 3);
        assert_eq!(report.total_overlap(), 0);
    }

    #[test]
    fn test_outcomes_in_same_domain_collapse() {
        let records = [
            PrimaryStudyRecord::new("R1", "A", "Depression", "OR"),
            PrimaryStudyRecord::new("R2", "A", "Anxiety", "OR"),
        ];
        let report = detect_overlap(&records);
        assert_eq!(report.total_groups, 1);
        assert_eq!(report.between_review_count, 1);
    }

    #[test]
    fn test_other_domain_and_blank_effect_excluded() {
        let records = [
            PrimaryStudyRecord::new("R1", "A", "Obesity", "OR"),
            PrimaryStudyRecord::new("R2", "A", "Obesity", "OR"),
            PrimaryStudyRecord::new("R1", "B", "Stress", ""),
            PrimaryStudyRecord::new("R1", "C", "Stress", "OR"),
        ];
        let report = detect_overlap(&records);
        assert_eq!(report.excluded_other_domain, 2);
        assert_eq!(report.excluded_missing_effect_size, 1);
        assert_eq!(report.records_considered, 1);
        assert_eq!(report.total_groups, 1);
        assert!(!report.by_domain.contains_key(&Domain::Other));
    }

    #[test]
    fn test_blank_review_id_adds_no_overlap() {
        let records = [
            PrimaryStudyRecord::new("R1", "A", "Depression", "OR"),
            PrimaryStudyRecord::new("", "A", "Depression", "OR"),
            PrimaryStudyRecord::new("", "B", "Insomnia", "OR"),
            PrimaryStudyRecord::new("", "B", "Insomnia", "OR"),
        ];
        let report = detect_overlap(&records);
        assert_eq!(report.within_review_count, 0);
        assert_eq!(report.between_review_count, 0);
        assert_eq!(report.excluded_missing_review_id, 3);
        assert_eq!(report.records_considered, 1);
        assert_eq!(report.total_groups, 1);
    }

    #[test]
    fn test_blank_review_id_keeps_other_copies() {
        let records = [
            PrimaryStudyRecord::new("R1", "A", "Depression", "OR"),
            PrimaryStudyRecord::new("R1", "A", "Depression", "OR"),
            PrimaryStudyRecord::new("R2", "A", "Depression", "OR"),
            PrimaryStudyRecord::new("", "A", "Depression", "OR"),
        ];
        let report = detect_overlap(&records);
        assert_eq!(report.within_review_count, 1);
        assert_eq!(report.between_review_count, 1);
        assert_eq!(report.groups[0].members, 3);
    }

    #[test]
    fn test_by_domain_breakdown() {
        let records = [
            PrimaryStudyRecord::new("R1", "A", "Depression", "OR"),
            PrimaryStudyRecord::new("R2", "A", "Stress", "OR"),
            PrimaryStudyRecord::new("R1", "B", "Insomnia", "OR"),
            PrimaryStudyRecord::new("R1", "B", "Insomnia", "OR"),
            PrimaryStudyRecord::new("R1", "C", "ADHD Risk", "OR"),
        ];
        let report = detect_overlap(&records);

        let distress = &report.by_domain[&Domain::PsychologicalDistress];
        assert_eq!(distress.between_review_count, 1);
        assert_eq!(distress.within_review_count, 0);

        let sleep = &report.by_domain[&Domain::Sleep];
        assert_eq!(sleep.within_review_count, 1);
        assert_eq!(sleep.overlapping_groups, 1);

        let adhd = &report.by_domain[&Domain::Adhd];
        assert_eq!(adhd.groups, 1);
        assert_eq!(adhd.overlapping_groups, 0);
    }

    #[test]
    fn test_group_members_keep_input_order() {
        let records = [rec("R2", "A"), rec("R1", "B"), rec("R1", "A")];
        let detector = OverlapDetector::default();
        let grouped = detector.group(&records);

        let group = &grouped.groups[0];
        assert_eq!(group.key.identity.as_str(), "a");
        assert_eq!(group.members[0].review_id, "R2");
        assert_eq!(group.members[1].review_id, "R1");
    }

    #[test]
    fn test_effect_size_compared_as_given() {
        let records = [
            PrimaryStudyRecord::new("R1", "A", "Depression", "1.5"),
            PrimaryStudyRecord::new("R2", "A", "Depression", "1.50"),
        ];
        let report = detect_overlap(&records);
        assert_eq!(report.total_groups, 2);
    }
}
