//! Table schemas for the audit input files

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::reader::{IoError, IoResult};

/// Schema describing the required columns of an input table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table name used in error messages
    pub name: String,

    /// Required columns; extra columns in the file are ignored
    pub columns: Vec<ColumnDescriptor>,
}

impl TableSchema {
    /// Create a new schema
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDescriptor>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Columns of the primary study overlap table
    pub fn overlap() -> Self {
        Self::new(
            "overlap",
            vec![
                ColumnDescriptor::new(columns::STUDY_ID, ColumnType::Text),
                ColumnDescriptor::new(columns::EFFECT_SIZE, ColumnType::Text),
                ColumnDescriptor::new(columns::OUTCOME, ColumnType::Text),
                ColumnDescriptor::new(columns::REVIEW_ID, ColumnType::Text),
            ],
        )
    }

    /// Columns of the sensitivity report table
    pub fn sensitivity() -> Self {
        let numeric = [
            columns::ORIG_OR,
            columns::NEW_OR,
            columns::ORIG_UPPER,
            columns::ORIG_LOWER,
            columns::NEW_UPPER,
            columns::NEW_LOWER,
            columns::ORIG_I2,
            columns::NEW_I2,
        ];
        let mut descriptors = vec![ColumnDescriptor::new(columns::GROUP, ColumnType::Text)];
        descriptors.extend(
            numeric
                .into_iter()
                .map(|name| ColumnDescriptor::new(name, ColumnType::Numeric)),
        );
        Self::new("sensitivity", descriptors)
    }

    /// Get a column by name
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get column names
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of columns
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Match the schema against a header row.
    ///
    /// Header names are compared after trimming whitespace. The first missing
    /// column is reported.
    pub fn resolve<'h, I>(&self, headers: I) -> IoResult<ColumnIndex>
    where
        I: IntoIterator<Item = &'h str>,
    {
        let positions: HashMap<&str, usize> = headers
            .into_iter()
            .enumerate()
            .map(|(i, name)| (name.trim(), i))
            .collect();

        let mut index = HashMap::with_capacity(self.columns.len());
        for column in &self.columns {
            let position = positions
                .get(column.name.as_str())
                .ok_or_else(|| IoError::ColumnNotFound {
                    table: self.name.clone(),
                    column: column.name.clone(),
                })?;
            index.insert(column.name.clone(), *position);
        }

        Ok(ColumnIndex { positions: index })
    }
}

/// Descriptor for a column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name as it appears in the header row
    pub name: String,

    /// How cells are interpreted
    pub dtype: ColumnType,
}

impl ColumnDescriptor {
    /// Create a new column descriptor
    pub fn new(name: impl Into<String>, dtype: ColumnType) -> Self {
        Self {
            name: name.into(),
            dtype,
        }
    }
}

/// Column data type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    /// Kept as the cell text
    Text,
    /// Coerced to a number; unparseable cells are missing
    Numeric,
}

impl ColumnType {
    /// Check if this is a numeric type
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Numeric)
    }
}

/// Positions of schema columns within a concrete header row
#[derive(Debug, Clone, Default)]
pub struct ColumnIndex {
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    /// Get column index by name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Header names of the input tables
pub mod columns {
    pub const STUDY_ID: &str = "Study ID";
    pub const EFFECT_SIZE: &str = "Effect Size";
    pub const OUTCOME: &str = "Outcome";
    pub const REVIEW_ID: &str = "Review ID";

    pub const GROUP: &str = "Group";
    pub const ORIG_OR: &str = "Orig_OR";
    pub const NEW_OR: &str = "New_OR";
    pub const ORIG_UPPER: &str = "Orig_Upper";
    pub const ORIG_LOWER: &str = "Orig_Lower";
    pub const NEW_UPPER: &str = "New_Upper";
    pub const NEW_LOWER: &str = "New_Lower";
    pub const ORIG_I2: &str = "Orig_I2";
    pub const NEW_I2: &str = "New_I2";
}
