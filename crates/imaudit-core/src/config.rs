//! Configuration for imaudit-core
//!
//! Holds the outcome-domain table and the significance null value. Both are
//! plain values handed to the classifier and comparator at construction.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use crate::domain::{DomainClassifier, DomainTable};
use crate::overlap::OverlapDetector;
use crate::sensitivity::SensitivityComparator;
use crate::significance::{SignificanceEvaluator, NULL_ODDS_RATIO};

/// Audit-wide configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Significance settings
    pub significance: SignificanceConfig,
    /// Outcome labels per domain, in lookup order
    pub domains: DomainTable,
}

/// Significance evaluation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignificanceConfig {
    /// Value denoting no effect; 1.0 for ratio measures
    pub null_value: f64,
}

impl Default for SignificanceConfig {
    fn default() -> Self {
        Self {
            null_value: NULL_ODDS_RATIO,
        }
    }
}

impl AuditConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json_str)?)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read and validate a TOML configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_toml(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for entry in self.domains.entries() {
            if !entry.domain.is_classified() {
                return Err(ConfigError::ReservedDomain(entry.domain.to_string()));
            }
            if !seen.insert(entry.domain) {
                return Err(ConfigError::DuplicateDomain(entry.domain.to_string()));
            }
            if entry.outcomes.is_empty() {
                return Err(ConfigError::MissingField(format!(
                    "domain '{}' lists no outcomes",
                    entry.domain
                )));
            }
        }

        let null = self.significance.null_value;
        if !null.is_finite() || null <= 0.0 {
            return Err(ConfigError::OutOfRange(
                "significance.null_value must be a positive finite ratio".to_string(),
            ));
        }

        Ok(())
    }

    pub fn classifier(&self) -> DomainClassifier {
        DomainClassifier::new(self.domains.clone())
    }

    pub fn evaluator(&self) -> SignificanceEvaluator {
        SignificanceEvaluator::new(self.significance.null_value)
    }

    pub fn overlap_detector(&self) -> OverlapDetector {
        OverlapDetector::new(self.classifier())
    }

    pub fn sensitivity_comparator(&self) -> SensitivityComparator {
        SensitivityComparator::new(self.evaluator())
    }
}

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Failed to read config: {0}")]
    Read(String),

    #[error("Invalid TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// `Other` is the fallback and cannot own outcome labels
    #[error("Domain '{0}' cannot be configured")]
    ReservedDomain(String),

    #[error("Domain '{0}' is configured twice")]
    DuplicateDomain(String),

    /// Required field is missing
    #[error("Missing field: {0}")]
    MissingField(String),

    /// Value is out of valid range
    #[error("Value out of range: {0}")]
    OutOfRange(String),
}
