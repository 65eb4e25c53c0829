//! imaudit-stats - Statistical summaries for audit aggregates
//!
//! Audit inputs are messy: a recomputed odds ratio may be absent, an I2 cell
//! may hold `NA`. This crate summarizes such data without letting a missing
//! value turn into a zero.
//!
//! - **SummaryStats**: count, missing, mean, min, max, median over the
//!   present values of a column
//!
//! Every statistic of an empty (or all-missing) input is `None`, so "no data"
//! can never be confused with "no change".

pub mod summary;

pub use summary::*;
