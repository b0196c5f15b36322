//! Diagnostic data models, scoring, and the fleet registry.
//!
//! ## Submodules
//!
//! - [`diagnostic`]: Per-car sensor readings ([`DiagnosticRecord`]) and their validity
//! - [`score`]: Performance score computation and the shared threshold constants
//! - [`alert`]: Alert derivation from a score and raw readings
//! - [`fleet`]: The [`FleetRegistry`] owning every car's record
//! - [`drift`]: Simulated concurrent sensor drift
//!
//! ## Data Flow
//!
//! ```text
//! DiagnosticRow (raw strings)
//!        │
//!        ▼
//! FleetRegistry::ingest()
//!        │  grouped by car, parsed once
//!        ▼
//! Car { DiagnosticRecord }  ◀── drift workers (per-record lock)
//!        │
//!        ▼
//! FleetRegistry::report()
//!        │  compute_score() + Thresholds::evaluate() under the lock
//!        ▼
//! CarReport
//! ```

pub mod alert;
pub mod diagnostic;
pub mod drift;
pub mod fleet;
pub mod score;

pub use alert::{evaluate, Alert, Thresholds};
pub use diagnostic::{DiagnosticKind, DiagnosticRecord};
pub use drift::{random_perturbation, DriftHandle};
pub use fleet::{Car, CarReport, FleetRegistry};
pub use score::{compute_score, HIGH_COOLANT_TEMP, SCORE_THRESHOLD, TEMP_BASELINE};
