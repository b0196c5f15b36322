//! CSV-backed row source.
//!
//! Reads `CarID,DiagnosticType,Value` rows from a file or any reader.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{DiagnosticRow, RowSource};
use crate::error::{MonitorError, Result};

const CAR_ID_COLUMN: &str = "CarID";
const TYPE_COLUMN: &str = "DiagnosticType";
const VALUE_COLUMN: &str = "Value";

/// A row source that reads diagnostics from a CSV file.
///
/// The file is opened on every [`RowSource::read_rows`] call, so reading
/// again picks up any changes. A missing or unreadable file is reported as
/// [`MonitorError::SourceUnavailable`].
#[derive(Debug)]
pub struct CsvSource {
    path: PathBuf,
    description: String,
}

impl CsvSource {
    /// Create a new CSV source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("csv: {}", path.display());
        Self { path, description }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RowSource for CsvSource {
    fn read_rows(&mut self) -> Result<Vec<DiagnosticRow>> {
        let file = File::open(&self.path).map_err(|source| MonitorError::SourceUnavailable {
            path: self.path.clone(),
            source,
        })?;
        let rows = read_csv_rows(file)?;
        debug!("Read {} rows from {}", rows.len(), self.path.display());
        Ok(rows)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Read diagnostic rows from CSV text with a header line.
///
/// Columns are located by header name, so their order does not matter and
/// extra columns are ignored. Short rows are tolerated: a missing column
/// leaves that field `None`. An empty input, or one with only a header,
/// yields no rows.
pub fn read_csv_rows<R: Read>(reader: R) -> Result<Vec<DiagnosticRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h == name);
    let car_id_idx = column(CAR_ID_COLUMN);
    let type_idx = column(TYPE_COLUMN);
    let value_idx = column(VALUE_COLUMN);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let field = |idx: Option<usize>| idx.and_then(|i| record.get(i)).map(str::to_string);
        rows.push(DiagnosticRow {
            car_id: field(car_id_idx),
            diagnostic_type: field(type_idx),
            value: field(value_idx),
        });
    }
    Ok(rows)
}
