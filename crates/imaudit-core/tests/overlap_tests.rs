//! Overlap detection integration tests
//!
//! Scenario tests for the excess-copies counting rules, plus property-based
//! checks of the grouping invariants.

use imaudit_core::{
    detect_overlap, AuditConfig, Domain, DomainClassifier, DomainEntry, DomainTable,
    OverlapDetector, PrimaryStudyRecord,
};
use proptest::prelude::*;

fn record(review: &str, id: &str, effect: &str, outcome: &str) -> PrimaryStudyRecord {
    PrimaryStudyRecord::new(review, id, outcome, effect)
}

// === Scenarios ===

#[test]
fn test_end_to_end_three_records() {
    let records = vec![
        record("R1", "A", "OR", "Depression"),
        record("R2", "A", "OR", "Depression"),
        record("R1", "B", "OR", "ADHD Risk"),
    ];

    let classifier = DomainClassifier::default();
    let domains: Vec<Domain> = records
        .iter()
        .map(|r| classifier.classify(&r.outcome))
        .collect();
    assert_eq!(
        domains,
        vec![
            Domain::PsychologicalDistress,
            Domain::PsychologicalDistress,
            Domain::Adhd,
        ]
    );

    let report = detect_overlap(&records);
    assert_eq!(report.within_review_count, 0);
    assert_eq!(report.between_review_count, 1);
    assert_eq!(report.total_groups, 2);
    assert_eq!(report.overlapping_groups, 1);
    assert_eq!(report.groups[0].identity, "a");
    assert_eq!(report.groups[0].members, 2);
}

#[test]
fn test_excess_copies_not_pairs() {
    // four reviews once each: 3 excess copies, not 6 pairs
    let records: Vec<_> = ["R1", "R2", "R3", "R4"]
        .iter()
        .map(|review| record(review, "Lee 2018", "OR", "Insomnia"))
        .collect();
    let report = detect_overlap(&records);
    assert_eq!(report.between_review_count, 3);
    assert_eq!(report.within_review_count, 0);
}

#[test]
fn test_review_ids_compared_as_given() {
    let records = vec![
        record("1", "A", "OR", "Stress"),
        record("01", "A", "OR", "Stress"),
    ];
    let report = detect_overlap(&records);
    assert_eq!(report.between_review_count, 1);
}

#[test]
fn test_configured_table_changes_grouping() {
    let config = AuditConfig {
        domains: DomainTable::new(vec![DomainEntry::new(
            Domain::Sleep,
            ["Insomnia", "Night Waking"],
        )]),
        ..Default::default()
    };
    let detector = config.overlap_detector();
    let records = vec![
        record("R1", "A", "OR", "Insomnia"),
        record("R2", "A", "OR", "Night Waking"),
        record("R3", "A", "OR", "Depression"),
    ];

    let report = detector.detect_overlap(&records);
    assert_eq!(report.excluded_other_domain, 1);
    assert_eq!(report.between_review_count, 1);
    assert_eq!(report.total_groups, 1);
}

#[test]
fn test_report_serializes_domain_keys() {
    let records = vec![
        record("R1", "A", "OR", "Depression"),
        record("R2", "A", "OR", "Depression"),
    ];
    let json = serde_json::to_value(detect_overlap(&records)).unwrap();
    assert_eq!(json["between_review_count"], 1);
    assert_eq!(
        json["by_domain"]["Psychological Distress"]["overlapping_groups"],
        1
    );
    assert_eq!(json["groups"][0]["domain"], "Psychological Distress");
}

// === Property-based tests ===

fn arb_record() -> impl Strategy<Value = PrimaryStudyRecord> {
    (
        prop::sample::select(vec!["R1", "R2", "R3", ""]),
        prop::sample::select(vec!["A", " a ", "B", "Smith 2019", "smith 2019"]),
        prop::sample::select(vec!["OR", "RR", ""]),
        prop::sample::select(vec![
            "Depression",
            "Anxiety",
            "Insomnia",
            "ADHD Risk",
            "Obesity",
        ]),
    )
        .prop_map(|(review, id, effect, outcome)| record(review, id, effect, outcome))
}

proptest! {
    #[test]
    fn prop_every_record_is_first_copy_or_counted_once(
        records in prop::collection::vec(arb_record(), 0..40)
    ) {
        let report = detect_overlap(&records);
        prop_assert_eq!(
            report.within_review_count + report.between_review_count + report.total_groups,
            report.records_considered
        );
    }

    #[test]
    fn prop_records_accounted_for(records in prop::collection::vec(arb_record(), 0..40)) {
        let report = detect_overlap(&records);
        prop_assert_eq!(
            report.records_considered
                + report.excluded_other_domain
                + report.excluded_missing_effect_size
                + report.excluded_missing_review_id,
            records.len()
        );
    }

    #[test]
    fn prop_blank_review_ids_never_add_overlap(
        records in prop::collection::vec(arb_record(), 0..40)
    ) {
        let attributed: Vec<_> = records
            .iter()
            .filter(|r| !r.review_id.is_empty())
            .cloned()
            .collect();
        let report = detect_overlap(&records);
        let expected = detect_overlap(&attributed);
        prop_assert_eq!(report.within_review_count, expected.within_review_count);
        prop_assert_eq!(report.between_review_count, expected.between_review_count);
        prop_assert_eq!(report.groups, expected.groups);
    }

    #[test]
    fn prop_report_independent_of_input_order(
        records in prop::collection::vec(arb_record(), 0..40)
    ) {
        let mut reversed = records.clone();
        reversed.reverse();
        prop_assert_eq!(detect_overlap(&records), detect_overlap(&reversed));
    }

    #[test]
    fn prop_groups_partition_records(records in prop::collection::vec(arb_record(), 0..40)) {
        let detector = OverlapDetector::default();
        let grouped = detector.group(&records);

        for group in &grouped.groups {
            prop_assert!(!group.is_empty());
            for member in &group.members {
                prop_assert_eq!(
                    imaudit_core::normalize(&member.raw_study_id),
                    group.key.identity.as_str()
                );
                prop_assert_eq!(&member.effect_size, &group.key.effect_size);
            }
        }
        let keys: std::collections::HashSet<_> =
            grouped.groups.iter().map(|g| g.key.clone()).collect();
        prop_assert_eq!(keys.len(), grouped.groups.len());
    }

    #[test]
    fn prop_domain_breakdown_sums_to_totals(
        records in prop::collection::vec(arb_record(), 0..40)
    ) {
        let report = detect_overlap(&records);
        let within: usize = report.by_domain.values().map(|d| d.within_review_count).sum();
        let between: usize = report.by_domain.values().map(|d| d.between_review_count).sum();
        let groups: usize = report.by_domain.values().map(|d| d.groups).sum();
        prop_assert_eq!(within, report.within_review_count);
        prop_assert_eq!(between, report.between_review_count);
        prop_assert_eq!(groups, report.total_groups);
    }
}
