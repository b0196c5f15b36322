//! Alert evaluation from a performance score and raw readings.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use super::diagnostic::DiagnosticRecord;
use super::score::{HIGH_COOLANT_TEMP, SCORE_THRESHOLD};

/// An alert raised for one car.
///
/// The `Display` form is the label printed in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alert {
    /// A reading is missing or out of range, so no score exists.
    SensorFailure,
    /// The score fell below the score threshold.
    EngineStress,
    /// Coolant temperature is above the coolant threshold.
    HighCoolantTemperature,
}

impl Alert {
    /// Returns the label used in report output.
    pub fn label(&self) -> &'static str {
        match self {
            Alert::SensorFailure => "Sensor Failure Detected",
            Alert::EngineStress => "Engine Stress Detected",
            Alert::HighCoolantTemperature => "High Coolant Temperature",
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Alert {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Limits that decide when an alert fires.
///
/// Both comparisons are strict: a score equal to `score` or a temperature
/// equal to `coolant_temperature` raises nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Scores below this raise [`Alert::EngineStress`].
    pub score: f64,
    /// Temperatures above this raise [`Alert::HighCoolantTemperature`].
    pub coolant_temperature: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            score: SCORE_THRESHOLD,
            coolant_temperature: HIGH_COOLANT_TEMP,
        }
    }
}

impl Thresholds {
    /// Derive the ordered alerts for a car.
    ///
    /// An absent score yields only [`Alert::SensorFailure`] and no other
    /// check runs. Otherwise engine stress is checked before coolant
    /// temperature.
    pub fn evaluate(&self, score: Option<f64>, record: &DiagnosticRecord) -> Vec<Alert> {
        let Some(score) = score else {
            return vec![Alert::SensorFailure];
        };

        let mut alerts = Vec::new();
        if score < self.score {
            alerts.push(Alert::EngineStress);
        }
        if record
            .temperature
            .is_some_and(|temp| temp > self.coolant_temperature)
        {
            alerts.push(Alert::HighCoolantTemperature);
        }
        alerts
    }
}

/// Evaluate alerts with the default thresholds.
pub fn evaluate(score: Option<f64>, record: &DiagnosticRecord) -> Vec<Alert> {
    Thresholds::default().evaluate(score, record)
}
