//! Per-car engine diagnostic readings.

use serde::Serialize;

/// The diagnostic types a row source may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// "RPM", parsed as an integer.
    Rpm,
    /// "Engine Load", parsed as a real number.
    EngineLoad,
    /// "Coolant Temperature", parsed as a real number.
    CoolantTemperature,
}

impl DiagnosticKind {
    /// Look up a kind by its row label. Unrecognized labels return `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "RPM" => Some(DiagnosticKind::Rpm),
            "Engine Load" => Some(DiagnosticKind::EngineLoad),
            "Coolant Temperature" => Some(DiagnosticKind::CoolantTemperature),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DiagnosticKind::Rpm => "RPM",
            DiagnosticKind::EngineLoad => "Engine Load",
            DiagnosticKind::CoolantTemperature => "Coolant Temperature",
        }
    }
}

/// Raw sensor readings for one car.
///
/// Fields are public and may be changed at any time (sensor drift), so
/// validity is never cached: call [`DiagnosticRecord::is_valid`] whenever it
/// matters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DiagnosticRecord {
    /// Engine speed. Valid when present and > 0.
    pub rpm: Option<i64>,
    /// Engine load percentage. Valid when present and >= 0.
    pub load: Option<f64>,
    /// Coolant temperature in degrees. Valid when present and > 0.
    pub temperature: Option<f64>,
}

impl DiagnosticRecord {
    pub fn new(rpm: Option<i64>, load: Option<f64>, temperature: Option<f64>) -> Self {
        Self {
            rpm,
            load,
            temperature,
        }
    }

    /// Returns true if every reading is present and within range.
    pub fn is_valid(&self) -> bool {
        matches!(self.rpm, Some(rpm) if rpm > 0)
            && matches!(self.load, Some(load) if load >= 0.0)
            && matches!(self.temperature, Some(temp) if temp > 0.0)
    }
}
