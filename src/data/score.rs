//! Performance score computation.

use super::diagnostic::DiagnosticRecord;

/// Coolant temperature (degrees) that contributes nothing to engine stress.
pub const TEMP_BASELINE: f64 = 90.0;

/// Scores strictly below this raise an engine stress alert.
pub const SCORE_THRESHOLD: f64 = 40.0;

/// Coolant temperatures strictly above this raise a coolant alert.
pub const HIGH_COOLANT_TEMP: f64 = 105.0;

/// Compute the performance score for a record.
///
/// Returns `None` when the record is invalid, which callers report as a
/// sensor failure. Otherwise the score is
/// `100 - (rpm / 100 + load * 0.5 + (temperature - 90) * 2)` rounded to one
/// decimal place, half away from zero (`f64::round`). The score is not
/// clamped and may fall below 0 or rise above 100.
pub fn compute_score(record: &DiagnosticRecord) -> Option<f64> {
    if !record.is_valid() {
        return None;
    }
    let rpm = record.rpm? as f64;
    let load = record.load?;
    let temperature = record.temperature?;

    let score = 100.0 - (rpm / 100.0 + load * 0.5 + (temperature - TEMP_BASELINE) * 2.0);
    Some(round_one_decimal(score))
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
