//! # garage-monitor
//!
//! Engine diagnostic scoring and alerting for a fleet of cars.
//!
//! Diagnostic readings (RPM, engine load, coolant temperature) arrive as
//! `CarID,DiagnosticType,Value` rows. They are grouped per car into a
//! [`DiagnosticRecord`], scored, and checked against alert thresholds.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  ┌─────────┐    ┌───────────────┐    ┌──────────┐            │
//! │  │ source  │───▶│     data      │───▶│  report  │──▶ stdout  │
//! │  │ (rows)  │    │ FleetRegistry │    │ (render) │──▶ JSON    │
//! │  └─────────┘    └───────┬───────┘    └──────────┘            │
//! │   CsvSource             │                                    │
//! │   MemorySource          ▼                                    │
//! │                  drift workers                               │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: The [`RowSource`] trait with CSV and in-memory implementations
//! - **[`data`]**: Records, scoring, alerts, and the [`FleetRegistry`] with its
//!   per-record locking and drift simulation
//! - **[`report`]**: Text rendering, [`FleetSummary`](report::FleetSummary), JSON export
//! - **[`settings`]**: Thresholds and drift parameters, optionally from a TOML file
//!
//! ## Scoring
//!
//! ```text
//! score = 100 - (rpm / 100 + load * 0.5 + (temperature - 90) * 2)
//! ```
//!
//! rounded to one decimal. A record with any reading missing or out of range
//! has no score and raises "Sensor Failure Detected" instead.
//!
//! ## Usage
//!
//! ```
//! use garage_monitor::{Alert, FleetRegistry, MemorySource, DiagnosticRow};
//!
//! let mut source = MemorySource::new(vec![
//!     DiagnosticRow::new("CAR002", "RPM", "4000"),
//!     DiagnosticRow::new("CAR002", "Engine Load", "90"),
//!     DiagnosticRow::new("CAR002", "Coolant Temperature", "110"),
//! ]);
//! let fleet = FleetRegistry::load(&mut source).unwrap();
//!
//! let report = fleet.report();
//! assert_eq!(report[0].score, Some(-25.0));
//! assert_eq!(
//!     report[0].alerts,
//!     vec![Alert::EngineStress, Alert::HighCoolantTemperature]
//! );
//! ```
//!
//! ### Drift while reporting
//!
//! ```
//! use std::time::Duration;
//! use garage_monitor::{FleetRegistry, DiagnosticRow};
//!
//! let mut fleet = FleetRegistry::new();
//! fleet.ingest(vec![DiagnosticRow::new("CAR001", "RPM", "3000")]).unwrap();
//!
//! let handle = fleet.spawn_drift(5, Duration::from_millis(1));
//! let _during = fleet.report();
//! assert_eq!(handle.join(), 5);
//! ```

pub mod data;
pub mod duration;
pub mod error;
pub mod report;
pub mod settings;
pub mod source;

// Re-export main types for convenience
pub use data::{
    compute_score, evaluate, Alert, Car, CarReport, DiagnosticKind, DiagnosticRecord,
    DriftHandle, FleetRegistry, Thresholds, HIGH_COOLANT_TEMP, SCORE_THRESHOLD, TEMP_BASELINE,
};
pub use error::MonitorError;
pub use report::FleetSummary;
pub use settings::Settings;
pub use source::{CsvSource, DiagnosticRow, MemorySource, RowSource};
