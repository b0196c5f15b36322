//! The fleet registry: cars, ingestion, drift, and report passes.
//!
//! Each car's record sits behind its own lock. Drift workers and report
//! passes both go through that lock, and a report computes the score and
//! alerts while still holding it, so every [`CarReport`] describes one
//! consistent reading of all three sensors.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::alert::{Alert, Thresholds};
use super::diagnostic::{DiagnosticKind, DiagnosticRecord};
use super::drift::{self, DriftHandle};
use super::score::compute_score;
use crate::error::{MonitorError, Result};
use crate::source::{DiagnosticRow, RowSource};

/// One car and its current readings.
#[derive(Debug)]
pub struct Car {
    id: String,
    record: Mutex<DiagnosticRecord>,
}

impl Car {
    pub fn new(id: impl Into<String>, record: DiagnosticRecord) -> Self {
        Self {
            id: id.into(),
            record: Mutex::new(record),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Copy of the current readings.
    pub fn snapshot(&self) -> DiagnosticRecord {
        *self.record.lock()
    }

    /// Mutate the readings while holding the record lock.
    pub fn update<R>(&self, f: impl FnOnce(&mut DiagnosticRecord) -> R) -> R {
        f(&mut *self.record.lock())
    }

    /// Snapshot, score, and evaluate alerts in one critical section.
    pub fn evaluate(&self, thresholds: &Thresholds) -> CarReport {
        let record = self.record.lock();
        let snapshot = *record;
        let score = compute_score(&snapshot);
        let alerts = thresholds.evaluate(score, &snapshot);
        drop(record);

        CarReport {
            car_id: self.id.clone(),
            score,
            alerts,
            record: snapshot,
        }
    }
}

/// The result of evaluating one car.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarReport {
    pub car_id: String,
    /// `None` when a sensor reading is missing or out of range.
    pub score: Option<f64>,
    pub alerts: Vec<Alert>,
    /// The readings the score and alerts were computed from.
    pub record: DiagnosticRecord,
}

impl CarReport {
    pub fn has_alert(&self, alert: Alert) -> bool {
        self.alerts.contains(&alert)
    }
}

/// Unparsed readings for one car, last value wins per type.
#[derive(Debug, Default)]
struct RawReadings {
    rpm: Option<String>,
    load: Option<String>,
    temperature: Option<String>,
}

impl RawReadings {
    fn set(&mut self, kind: DiagnosticKind, value: &str) {
        let slot = match kind {
            DiagnosticKind::Rpm => &mut self.rpm,
            DiagnosticKind::EngineLoad => &mut self.load,
            DiagnosticKind::CoolantTemperature => &mut self.temperature,
        };
        *slot = Some(value.to_string());
    }

    fn parse(self, car_id: &str) -> Result<DiagnosticRecord> {
        Ok(DiagnosticRecord {
            rpm: parse_reading(car_id, DiagnosticKind::Rpm, self.rpm)?,
            load: parse_reading(car_id, DiagnosticKind::EngineLoad, self.load)?,
            temperature: parse_reading(
                car_id,
                DiagnosticKind::CoolantTemperature,
                self.temperature,
            )?,
        })
    }
}

fn parse_reading<T: FromStr>(
    car_id: &str,
    kind: DiagnosticKind,
    raw: Option<String>,
) -> Result<Option<T>> {
    raw.map(|value| {
        value.trim().parse::<T>().map_err(|_| MonitorError::RowParse {
            car_id: car_id.to_string(),
            field: kind.label(),
            value,
        })
    })
    .transpose()
}

/// Ordered collection of cars.
///
/// Cars keep the order in which their ids were first seen during ingestion.
/// The registry is built with [`FleetRegistry::ingest`] and afterwards only
/// shared: drift and reports both take `&self`.
///
/// # Example
///
/// ```
/// use garage_monitor::{DiagnosticRow, FleetRegistry};
///
/// let mut fleet = FleetRegistry::new();
/// fleet
///     .ingest(vec![
///         DiagnosticRow::new("CAR001", "RPM", "2000"),
///         DiagnosticRow::new("CAR001", "Engine Load", "20"),
///         DiagnosticRow::new("CAR001", "Coolant Temperature", "90"),
///     ])
///     .unwrap();
///
/// let report = fleet.report();
/// assert_eq!(report[0].score, Some(70.0));
/// assert!(report[0].alerts.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct FleetRegistry {
    cars: Vec<Arc<Car>>,
}

impl FleetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a row source.
    pub fn load(source: &mut dyn RowSource) -> Result<Self> {
        let mut fleet = Self::new();
        let rows = source.read_rows()?;
        debug!("Loading fleet from {}", source.description());
        fleet.ingest(rows)?;
        Ok(fleet)
    }

    /// Group rows by car and add one car per id that parses cleanly.
    ///
    /// Rows without a car id, type, or value are skipped, as are
    /// unrecognized diagnostic types. A car whose readings fail to parse is
    /// dropped with a warning. Ids already in the registry are left as they
    /// are, so ids stay unique across calls. Returns the number of cars
    /// added, or [`MonitorError::EmptyFleet`] when none were.
    pub fn ingest<I>(&mut self, rows: I) -> Result<usize>
    where
        I: IntoIterator<Item = DiagnosticRow>,
    {
        let mut order: Vec<String> = Vec::new();
        let mut raw: HashMap<String, RawReadings> = HashMap::new();
        let mut skipped = 0usize;

        for row in rows {
            let Some((car_id, diagnostic_type, value)) = row.fields() else {
                skipped += 1;
                continue;
            };
            let readings = raw.entry(car_id.to_string()).or_insert_with(|| {
                order.push(car_id.to_string());
                RawReadings::default()
            });
            match DiagnosticKind::from_label(diagnostic_type) {
                Some(kind) => readings.set(kind, value),
                None => debug!(car_id, diagnostic_type, "Ignoring unrecognized diagnostic type"),
            }
        }
        if skipped > 0 {
            debug!("Skipped {} incomplete rows", skipped);
        }

        let mut loaded = 0;
        for car_id in order {
            if self.get(&car_id).is_some() {
                debug!(car_id = %car_id, "Skipping car already in registry");
                continue;
            }
            let readings = raw.remove(&car_id).unwrap_or_default();
            match readings.parse(&car_id) {
                Ok(record) => {
                    debug!(car_id = %car_id, ?record, "Loaded car");
                    self.cars.push(Arc::new(Car::new(car_id, record)));
                    loaded += 1;
                }
                Err(err) => warn!("{}", err),
            }
        }

        if loaded == 0 {
            return Err(MonitorError::EmptyFleet);
        }
        info!("Loaded {} cars", loaded);
        Ok(loaded)
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }

    /// Car ids in registry order.
    pub fn car_ids(&self) -> impl Iterator<Item = &str> {
        self.cars.iter().map(|car| car.id())
    }

    pub fn get(&self, car_id: &str) -> Option<&Car> {
        self.cars.iter().find(|car| car.id() == car_id).map(|car| &**car)
    }

    /// Snapshot of one car's readings.
    pub fn record(&self, car_id: &str) -> Option<DiagnosticRecord> {
        self.get(car_id).map(Car::snapshot)
    }

    /// Evaluate every car with the default thresholds.
    pub fn report(&self) -> Vec<CarReport> {
        self.report_with(&Thresholds::default())
    }

    /// Evaluate every car, in registry order.
    pub fn report_with(&self, thresholds: &Thresholds) -> Vec<CarReport> {
        self.cars.iter().map(|car| car.evaluate(thresholds)).collect()
    }

    /// Apply random drift to every car concurrently and wait for it.
    ///
    /// Returns the total number of perturbations applied.
    pub fn simulate_drift(&self, updates_per_car: usize, delay: Duration) -> usize {
        self.drift_with(updates_per_car, delay, drift::random_perturbation)
    }

    /// Run one scoped worker per car applying `perturb`, and wait for all.
    pub fn drift_with<F>(&self, updates_per_car: usize, delay: Duration, perturb: F) -> usize
    where
        F: Fn(&mut DiagnosticRecord) + Sync,
    {
        debug!(cars = self.cars.len(), updates_per_car, "Starting drift");
        std::thread::scope(|scope| {
            let workers: Vec<_> = self
                .cars
                .iter()
                .map(|car| {
                    let perturb = &perturb;
                    scope.spawn(move || drift::drift_car(car, updates_per_car, delay, perturb))
                })
                .collect();
            workers
                .into_iter()
                .map(|worker| match worker.join() {
                    Ok(applied) => applied,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .sum()
        })
    }

    /// Start random drift in the background.
    ///
    /// Reports may run while the returned handle is live; join it to wait
    /// for the final state.
    pub fn spawn_drift(&self, updates_per_car: usize, delay: Duration) -> DriftHandle {
        self.spawn_drift_with(updates_per_car, delay, drift::random_perturbation)
    }

    /// Start drift with a custom perturbation in the background.
    pub fn spawn_drift_with<F>(&self, updates_per_car: usize, delay: Duration, perturb: F) -> DriftHandle
    where
        F: Fn(&mut DiagnosticRecord) + Send + Sync + 'static,
    {
        DriftHandle::spawn(self.cars.clone(), updates_per_car, delay, perturb)
    }
}
