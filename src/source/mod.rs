//! Row source abstraction for receiving diagnostic readings.
//!
//! A row source yields `(CarID, DiagnosticType, Value)` triples in the order
//! they appear. Values are kept as raw strings here; they are parsed once,
//! per car, by [`FleetRegistry::ingest`](crate::FleetRegistry::ingest).

mod file;
mod memory;
mod row;

pub use file::{read_csv_rows, CsvSource};
pub use memory::MemorySource;
pub use row::DiagnosticRow;

use std::fmt::Debug;

use crate::error::Result;

/// Trait for reading diagnostic rows from various sources.
///
/// # Example
///
/// ```
/// use garage_monitor::{CsvSource, RowSource};
///
/// let source = CsvSource::new("diagnostics.csv");
/// assert_eq!(source.description(), "csv: diagnostics.csv");
/// ```
pub trait RowSource: Debug {
    /// Read every row the source currently holds.
    ///
    /// An unavailable or malformed source is an error. Rows with missing
    /// fields are returned as-is; deciding what to skip is up to the caller.
    fn read_rows(&mut self) -> Result<Vec<DiagnosticRow>>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;
}
