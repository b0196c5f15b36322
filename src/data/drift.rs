//! Simulated sensor drift.
//!
//! Each car gets its own worker thread that repeatedly perturbs the car's
//! record. A perturbation takes the record's lock once and changes all
//! present readings together, so a concurrent report never sees a record
//! with some readings perturbed and others not.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rand::Rng;
use tracing::debug;

use super::diagnostic::DiagnosticRecord;
use super::fleet::Car;

/// Largest RPM change applied by one random perturbation.
pub const RPM_DRIFT: i64 = 10;
/// Largest engine load change applied by one random perturbation.
pub const LOAD_DRIFT: f64 = 0.5;
/// Largest coolant temperature change applied by one random perturbation.
pub const TEMPERATURE_DRIFT: f64 = 0.2;

/// Apply one small random change to every present reading.
///
/// RPM moves by an integer in `[-10, 10]`, load by a real in `[-0.5, 0.5]`
/// and temperature by a real in `[-0.2, 0.2]`. Absent readings stay absent.
/// RPM saturates at the bounds of `i64` instead of wrapping.
pub fn random_perturbation(record: &mut DiagnosticRecord) {
    let mut rng = rand::thread_rng();
    if let Some(rpm) = record.rpm.as_mut() {
        *rpm = rpm.saturating_add(rng.gen_range(-RPM_DRIFT..=RPM_DRIFT));
    }
    if let Some(load) = record.load.as_mut() {
        *load += rng.gen_range(-LOAD_DRIFT..=LOAD_DRIFT);
    }
    if let Some(temperature) = record.temperature.as_mut() {
        *temperature += rng.gen_range(-TEMPERATURE_DRIFT..=TEMPERATURE_DRIFT);
    }
}

/// Run one car's drift loop, returning the number of perturbations applied.
pub(crate) fn drift_car<F>(car: &Car, updates: usize, delay: Duration, perturb: &F) -> usize
where
    F: Fn(&mut DiagnosticRecord) + ?Sized,
{
    debug!(car_id = car.id(), updates, "Drift worker started");
    for i in 0..updates {
        car.update(|record| perturb(record));
        // Never sleep while holding the record lock
        if i + 1 < updates && !delay.is_zero() {
            thread::sleep(delay);
        }
    }
    debug!(car_id = car.id(), "Drift worker finished");
    updates
}

/// Handle to drift workers running in the background.
///
/// Obtained from [`FleetRegistry::spawn_drift`](super::FleetRegistry::spawn_drift).
/// Call [`DriftHandle::join`] before a report that must observe the final
/// post-drift state.
#[derive(Debug)]
pub struct DriftHandle {
    workers: Vec<JoinHandle<usize>>,
}

impl DriftHandle {
    pub(crate) fn spawn<F>(cars: Vec<Arc<Car>>, updates: usize, delay: Duration, perturb: F) -> Self
    where
        F: Fn(&mut DiagnosticRecord) + Send + Sync + 'static,
    {
        let perturb = Arc::new(perturb);
        let workers = cars
            .into_iter()
            .map(|car| {
                let perturb = Arc::clone(&perturb);
                thread::spawn(move || drift_car(&car, updates, delay, &*perturb))
            })
            .collect();
        Self { workers }
    }

    /// Returns true once every worker has finished.
    pub fn is_finished(&self) -> bool {
        self.workers.iter().all(JoinHandle::is_finished)
    }

    /// Number of workers, one per car.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Wait for every worker and return the total number of perturbations.
    ///
    /// A panic in a worker is resumed on the calling thread.
    pub fn join(self) -> usize {
        self.workers
            .into_iter()
            .map(|worker| match worker.join() {
                Ok(applied) => applied,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_perturbation_stays_within_bounds() {
        let start = DiagnosticRecord::new(Some(3000), Some(50.0), Some(95.0));
        for _ in 0..500 {
            let mut record = start;
            random_perturbation(&mut record);
            assert!((record.rpm.unwrap() - 3000).abs() <= RPM_DRIFT);
            assert!((record.load.unwrap() - 50.0).abs() <= LOAD_DRIFT + 1e-9);
            assert!((record.temperature.unwrap() - 95.0).abs() <= TEMPERATURE_DRIFT + 1e-9);
        }
    }

    #[test]
    fn test_random_perturbation_leaves_absent_fields_absent() {
        let mut record = DiagnosticRecord::new(Some(3000), None, None);
        for _ in 0..50 {
            random_perturbation(&mut record);
        }
        assert!(record.rpm.is_some());
        assert_eq!(record.load, None);
        assert_eq!(record.temperature, None);
    }

    #[test]
    fn test_random_perturbation_saturates_extreme_rpm() {
        let mut high = DiagnosticRecord::new(Some(i64::MAX), Some(10.0), Some(90.0));
        let mut low = DiagnosticRecord::new(Some(i64::MIN + 5), Some(10.0), Some(90.0));
        for _ in 0..500 {
            random_perturbation(&mut high);
            random_perturbation(&mut low);
        }
        assert!(high.rpm.unwrap() >= i64::MAX - RPM_DRIFT * 500);
        assert!(low.rpm.unwrap() <= i64::MIN + 5 + RPM_DRIFT * 500);
    }

    #[test]
    fn test_drift_car_applies_every_update() {
        let car = Car::new("CAR001", DiagnosticRecord::new(Some(1), Some(0.0), Some(1.0)));
        let applied = drift_car(&car, 7, Duration::ZERO, &|record: &mut DiagnosticRecord| {
            if let Some(rpm) = record.rpm.as_mut() {
                *rpm += 1;
            }
        });
        assert_eq!(applied, 7);
        assert_eq!(car.snapshot().rpm, Some(8));
    }

    #[test]
    fn test_drift_car_with_zero_updates_is_noop() {
        let record = DiagnosticRecord::new(Some(1), Some(0.0), Some(1.0));
        let car = Car::new("CAR001", record);
        assert_eq!(drift_car(&car, 0, Duration::from_secs(1), &random_perturbation), 0);
        assert_eq!(car.snapshot(), record);
    }

    #[test]
    fn test_handle_joins_all_workers() {
        let cars: Vec<Arc<Car>> = (0..4)
            .map(|i| {
                Arc::new(Car::new(
                    format!("CAR{i:03}"),
                    DiagnosticRecord::new(Some(1000), Some(10.0), Some(90.0)),
                ))
            })
            .collect();
        let handle = DriftHandle::spawn(cars, 5, Duration::ZERO, random_perturbation);
        assert_eq!(handle.worker_count(), 4);
        assert_eq!(handle.join(), 20);
    }
}
