//! imaudit-io - Data I/O for audit input tables
//!
//! This crate loads the two tabular inputs of an audit:
//!
//! - **Overlap table**: `Study ID`, `Effect Size`, `Outcome`, `Review ID`
//! - **Sensitivity table**: `Group` plus original/recomputed OR, CI bounds and I2
//!
//! # Design
//!
//! Row types implement the `TableRow` trait. The header row is checked against
//! the row's schema once, when the table is read, so a missing column surfaces
//! as `IoError::ColumnNotFound` before any analysis runs. Numeric cells that do
//! not parse become missing values instead of errors.

pub mod csv_reader;
pub mod reader;
pub mod schema;

pub use csv_reader::CsvReader;
pub use reader::*;
pub use schema::*;
