//! Outcome domain classification.
//!
//! Each review reports outcomes under free-text labels ("Insomnia",
//! "Depression", ...). Overlap is only meaningful inside a semantic domain, so
//! every record's outcome label is first mapped onto a [`Domain`] through an
//! explicit, immutable [`DomainTable`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Semantic outcome domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Domain {
    Sleep,
    #[serde(rename = "Psychological Distress")]
    PsychologicalDistress,
    #[serde(rename = "ADHD")]
    Adhd,
    Other,
}

impl Domain {
    /// Domains that can own outcome labels.
    pub const CLASSIFIED: [Domain; 3] = [
        Domain::Sleep,
        Domain::PsychologicalDistress,
        Domain::Adhd,
    ];

    /// Display name, identical to the serialized name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Sleep => "Sleep",
            Self::PsychologicalDistress => "Psychological Distress",
            Self::Adhd => "ADHD",
            Self::Other => "Other",
        }
    }

    /// Parse from a display name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Sleep" => Some(Self::Sleep),
            "Psychological Distress" => Some(Self::PsychologicalDistress),
            "ADHD" => Some(Self::Adhd),
            "Other" => Some(Self::Other),
            _ => None,
        }
    }

    /// Whether records in this domain take part in overlap analysis.
    pub fn is_classified(&self) -> bool {
        !matches!(self, Self::Other)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One row of the domain table: a domain and the outcome labels it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainEntry {
    pub domain: Domain,
    pub outcomes: Vec<String>,
}

impl DomainEntry {
    pub fn new<I, S>(domain: Domain, outcomes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            domain,
            outcomes: outcomes.into_iter().map(Into::into).collect(),
        }
    }
}

/// Ordered mapping from domains to their outcome labels.
///
/// Order matters: a label listed under two domains belongs to the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainTable {
    entries: Vec<DomainEntry>,
}

impl DomainTable {
    pub fn new(entries: Vec<DomainEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[DomainEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Outcome labels owned by a domain, if it appears in the table.
    pub fn outcomes(&self, domain: Domain) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|e| e.domain == domain)
            .map(|e| e.outcomes.as_slice())
    }
}

impl Default for DomainTable {
    fn default() -> Self {
        Self::new(vec![
            DomainEntry::new(
                Domain::Sleep,
                [
                    "Adverse Sleep-Related Outcomes",
                    "Short Sleep Duration",
                    "Poor Sleep Quality",
                    "Insomnia",
                    "Sleep Dissatisfaction",
                    "Sleep Problems",
                ],
            ),
            DomainEntry::new(
                Domain::PsychologicalDistress,
                [
                    "Common Mental Disorders",
                    "Depression",
                    "Stress",
                    "Anxiety",
                    "Happiness",
                ],
            ),
            DomainEntry::new(Domain::Adhd, ["ADHD Diagnosis", "ADHD Risk"]),
        ])
    }
}

/// Maps outcome labels onto domains using a fixed table.
#[derive(Debug, Clone)]
pub struct DomainClassifier {
    table: DomainTable,
    lookup: HashMap<String, Domain>,
}

impl DomainClassifier {
    /// Build a classifier over the given table.
    pub fn new(table: DomainTable) -> Self {
        let mut lookup = HashMap::new();
        for entry in table.entries() {
            for outcome in &entry.outcomes {
                // first domain in table order wins
                lookup.entry(outcome.clone()).or_insert(entry.domain);
            }
        }
        Self { table, lookup }
    }

    /// Classify an outcome label. Exact, case-sensitive match; unknown labels are `Other`.
    pub fn classify(&self, outcome: &str) -> Domain {
        self.lookup.get(outcome).copied().unwrap_or(Domain::Other)
    }

    pub fn table(&self) -> &DomainTable {
        &self.table
    }
}

impl Default for DomainClassifier {
    fn default() -> Self {
        Self::new(DomainTable::default())
    }
}
