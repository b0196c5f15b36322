//! Error types for loading and monitoring a fleet.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading diagnostics or settings.
///
/// Only [`MonitorError::SourceUnavailable`], [`MonitorError::Csv`],
/// [`MonitorError::EmptyFleet`] and [`MonitorError::Config`] ever leave the
/// library. [`MonitorError::RowParse`] is recovered inside
/// [`FleetRegistry::ingest`](crate::FleetRegistry::ingest): the offending car
/// is dropped and a warning is logged.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The row source could not be opened or read.
    #[error("Diagnostics source unavailable: {}: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The row source is not well-formed CSV.
    #[error("Malformed diagnostics source: {0}")]
    Csv(#[from] csv::Error),

    /// A car's reading could not be parsed as its expected numeric type.
    #[error("Error parsing car {car_id}: invalid {field} value {value:?}")]
    RowParse {
        car_id: String,
        field: &'static str,
        value: String,
    },

    /// No car survived ingestion.
    #[error("No valid diagnostics found in source")]
    EmptyFleet,

    /// The settings file could not be loaded.
    #[error("Invalid settings: {0}")]
    Config(String),
}

impl From<::config::ConfigError> for MonitorError {
    fn from(err: ::config::ConfigError) -> Self {
        MonitorError::Config(err.to_string())
    }
}

pub type Result<T, E = MonitorError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_parse_message_names_car_and_field() {
        let err = MonitorError::RowParse {
            car_id: "CAR007".to_string(),
            field: "RPM",
            value: "fast".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Error parsing car CAR007: invalid RPM value \"fast\""
        );
    }

    #[test]
    fn test_source_unavailable_includes_path() {
        let err = MonitorError::SourceUnavailable {
            path: PathBuf::from("/missing/diagnostics.csv"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.to_string().contains("/missing/diagnostics.csv"));
    }
}
