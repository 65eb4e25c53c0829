//! Typed row reading and common types
//!
//! Each audit input row type implements [`TableRow`], which names the columns
//! it needs and builds itself from a validated [`Row`].

use imaudit_core::{PrimaryStudyRecord, SensitivityRow};
use std::path::Path;
use thiserror::Error;

use crate::schema::{columns, ColumnIndex, TableSchema};

/// Errors that can occur during I/O operations
#[derive(Debug, Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to open file: {0}")]
    OpenFailed(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Column '{column}' not found in {table} table")]
    ColumnNotFound { table: String, column: String },

    #[error("I/O error: {0}")]
    Io(String),
}

impl IoError {
    /// Whether a required table or column is absent
    pub fn is_missing_input(&self) -> bool {
        matches!(
            self,
            IoError::FileNotFound(_) | IoError::ColumnNotFound { .. }
        )
    }
}

/// Result type for I/O operations
pub type IoResult<T> = Result<T, IoError>;

/// A row type loadable from a tabular file
pub trait TableRow: Sized {
    /// Columns the row needs
    fn schema() -> TableSchema;

    /// Build the row from one record; every schema column is present
    fn from_row(row: &Row<'_>) -> Self;
}

/// One record seen through a resolved schema
#[derive(Debug)]
pub struct Row<'a> {
    index: &'a ColumnIndex,
    cells: &'a csv::StringRecord,
    line: u64,
}

impl<'a> Row<'a> {
    pub fn new(index: &'a ColumnIndex, cells: &'a csv::StringRecord, line: u64) -> Self {
        Self { index, cells, line }
    }

    /// Cell text exactly as given; empty if the record is short
    pub fn text(&self, column: &str) -> &'a str {
        self.index
            .position(column)
            .and_then(|i| self.cells.get(i))
            .unwrap_or("")
    }

    /// Cell coerced to a number; `None` when it does not parse
    pub fn numeric(&self, column: &str) -> Option<f64> {
        let raw = self.text(column);
        let value = coerce_numeric(raw);
        if value.is_none() && !raw.trim().is_empty() {
            tracing::debug!(
                line = self.line,
                column,
                value = raw,
                "non-numeric cell treated as missing"
            );
        }
        value
    }

    /// Line number of the record in the source
    pub fn line(&self) -> u64 {
        self.line
    }
}

/// Parse a numeric cell; blank, unparseable and non-finite cells are missing
pub fn coerce_numeric(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

impl TableRow for PrimaryStudyRecord {
    fn schema() -> TableSchema {
        TableSchema::overlap()
    }

    fn from_row(row: &Row<'_>) -> Self {
        PrimaryStudyRecord::new(
            row.text(columns::REVIEW_ID),
            row.text(columns::STUDY_ID),
            row.text(columns::OUTCOME),
            row.text(columns::EFFECT_SIZE),
        )
    }
}

impl TableRow for SensitivityRow {
    fn schema() -> TableSchema {
        TableSchema::sensitivity()
    }

    fn from_row(row: &Row<'_>) -> Self {
        SensitivityRow::new(row.text(columns::GROUP))
            .with_odds_ratios(row.numeric(columns::ORIG_OR), row.numeric(columns::NEW_OR))
            .with_original_ci(
                row.numeric(columns::ORIG_LOWER),
                row.numeric(columns::ORIG_UPPER),
            )
            .with_recomputed_ci(
                row.numeric(columns::NEW_LOWER),
                row.numeric(columns::NEW_UPPER),
            )
            .with_i2(row.numeric(columns::ORIG_I2), row.numeric(columns::NEW_I2))
    }
}

/// Open a file and read typed rows from it
///
/// The format is auto-detected from the file extension.
pub fn open_table<T: TableRow>(path: &str) -> IoResult<Vec<T>> {
    let extension = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => crate::csv_reader::CsvReader::open(path)?.read_rows(),
        "tsv" => crate::csv_reader::CsvReader::open_with_delimiter(path, b'\t')?.read_rows(),
        _ => Err(IoError::InvalidFormat(format!(
            "Unknown file extension: {}",
            extension
        ))),
    }
}

/// List supported file extensions
pub fn supported_extensions() -> Vec<&'static str> {
    vec!["csv", "tsv"]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extensions() {
        let extensions = supported_extensions();
        assert!(extensions.contains(&"csv"));
        assert!(extensions.contains(&"tsv"));
    }

    #[test]
    fn test_coerce_numeric() {
        assert_eq!(coerce_numeric("1.25"), Some(1.25));
        assert_eq!(coerce_numeric(" 2 "), Some(2.0));
        assert_eq!(coerce_numeric("-0.5"), Some(-0.5));
        assert_eq!(coerce_numeric("1e-3"), Some(0.001));
    }

    #[test]
    fn test_coerce_numeric_missing() {
        assert_eq!(coerce_numeric(""), None);
        assert_eq!(coerce_numeric("NA"), None);
        assert_eq!(coerce_numeric("nan"), None);
        assert_eq!(coerce_numeric("inf"), None);
        assert_eq!(coerce_numeric("1.2 (0.9-1.6)"), None);
    }

    #[test]
    fn test_unknown_extension() {
        let err = open_table::<SensitivityRow>("report.xlsx").unwrap_err();
        assert!(matches!(err, IoError::InvalidFormat(_)));
        assert!(!err.is_missing_input());
    }

    #[test]
    fn test_extension_taken_from_file_name() {
        let path = "results.v2/overlap";
        match open_table::<SensitivityRow>(path).unwrap_err() {
            IoError::InvalidFormat(message) => assert!(!message.contains("v2")),
            other => panic!("unexpected error: {other}"),
        }

        let err = open_table::<SensitivityRow>("/missing/R.CSV").unwrap_err();
        assert!(matches!(err, IoError::FileNotFound(_)));
    }

    #[test]
    fn test_missing_input_classification() {
        assert!(IoError::FileNotFound("x.csv".into()).is_missing_input());
        assert!(IoError::ColumnNotFound {
            table: "overlap".into(),
            column: "Outcome".into()
        }
        .is_missing_input());
        assert!(!IoError::Io("broken pipe".into()).is_missing_input());
    }
}
