//! In-memory row source.

use super::{DiagnosticRow, RowSource};
use crate::error::Result;

/// A row source over rows already held in memory.
///
/// Useful when rows arrive from somewhere other than a file, and in tests.
///
/// # Example
///
/// ```
/// use garage_monitor::{DiagnosticRow, MemorySource, RowSource};
///
/// let mut source = MemorySource::new(vec![DiagnosticRow::new("CAR001", "RPM", "3200")]);
/// assert_eq!(source.read_rows().unwrap().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    rows: Vec<DiagnosticRow>,
}

impl MemorySource {
    pub fn new(rows: Vec<DiagnosticRow>) -> Self {
        Self { rows }
    }

    /// Append a row.
    pub fn push(&mut self, row: DiagnosticRow) {
        self.rows.push(row);
    }
}

impl FromIterator<DiagnosticRow> for MemorySource {
    fn from_iter<I: IntoIterator<Item = DiagnosticRow>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl RowSource for MemorySource {
    fn read_rows(&mut self) -> Result<Vec<DiagnosticRow>> {
        Ok(self.rows.clone())
    }

    fn description(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_are_returned_in_order() {
        let mut source: MemorySource = [
            DiagnosticRow::new("CAR002", "RPM", "4000"),
            DiagnosticRow::new("CAR001", "RPM", "3200"),
        ]
        .into_iter()
        .collect();
        source.push(DiagnosticRow::new("CAR002", "Engine Load", "90"));

        let rows = source.read_rows().unwrap();
        let ids: Vec<_> = rows.iter().filter_map(|r| r.car_id.as_deref()).collect();
        assert_eq!(ids, vec!["CAR002", "CAR001", "CAR002"]);
    }

    #[test]
    fn test_reading_twice_yields_same_rows() {
        let mut source = MemorySource::new(vec![DiagnosticRow::new("CAR001", "RPM", "1")]);
        assert_eq!(source.read_rows().unwrap(), source.read_rows().unwrap());
    }
}
