//! Study identity normalization for overlap comparison

use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalize a raw study identifier for equality comparison
///
/// - Trims leading/trailing whitespace
/// - Converts to lowercase
///
/// Inner whitespace and punctuation are kept: "Smith 2019" and "Smith, 2019"
/// stay distinct.
pub fn normalize(raw_study_id: &str) -> String {
    raw_study_id.trim().to_lowercase()
}

/// A canonicalized study identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedIdentity(String);

impl NormalizedIdentity {
    pub fn new(raw_study_id: &str) -> Self {
        Self(normalize(raw_study_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier was blank before normalization
    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for NormalizedIdentity {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl fmt::Display for NormalizedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
