//! Report rendering, fleet summary, and JSON export.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::data::{Alert, CarReport};

/// Render one car's report block, including the trailing blank line.
///
/// ```
/// use garage_monitor::{CarReport, DiagnosticRecord};
/// use garage_monitor::report::render_car;
///
/// let report = CarReport {
///     car_id: "CAR001".to_string(),
///     score: None,
///     alerts: vec![garage_monitor::Alert::SensorFailure],
///     record: DiagnosticRecord::default(),
/// };
/// assert_eq!(
///     render_car(&report),
///     "Car: CAR001\nPerformance Score: N/A\nAlerts: Sensor Failure Detected\n\n"
/// );
/// ```
pub fn render_car(report: &CarReport) -> String {
    let score = report
        .score
        .map_or_else(|| "N/A".to_string(), |score| format!("{:.1}", score));
    format!(
        "Car: {}\nPerformance Score: {}\nAlerts: {}\n\n",
        report.car_id,
        score,
        format_alerts(&report.alerts)
    )
}

/// Join alert labels with ", ", or "None" when there are none.
pub fn format_alerts(alerts: &[Alert]) -> String {
    if alerts.is_empty() {
        "None".to_string()
    } else {
        alerts
            .iter()
            .map(Alert::label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Write every car's report block in order.
pub fn write_report<W: Write>(out: &mut W, reports: &[CarReport]) -> io::Result<()> {
    for report in reports {
        out.write_all(render_car(report).as_bytes())?;
    }
    Ok(())
}

/// Aggregate counts over one report pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FleetSummary {
    pub total_cars: usize,
    /// Cars with no alert at all.
    pub healthy: usize,
    /// Cars with at least one alert.
    pub alerting: usize,
    pub sensor_failures: usize,
    pub engine_stress: usize,
    pub high_coolant_temperature: usize,
    /// Mean score over cars that have one.
    pub average_score: Option<f64>,
}

impl FleetSummary {
    pub fn from_reports(reports: &[CarReport]) -> Self {
        let count = |alert: Alert| reports.iter().filter(|r| r.has_alert(alert)).count();
        let healthy = reports.iter().filter(|r| r.alerts.is_empty()).count();

        let scores: Vec<f64> = reports.iter().filter_map(|r| r.score).collect();
        let average_score = if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<f64>() / scores.len() as f64)
        };

        Self {
            total_cars: reports.len(),
            healthy,
            alerting: reports.len() - healthy,
            sensor_failures: count(Alert::SensorFailure),
            engine_stress: count(Alert::EngineStress),
            high_coolant_temperature: count(Alert::HighCoolantTemperature),
            average_score,
        }
    }

    /// One-line human-readable form.
    pub fn render(&self) -> String {
        let average = self
            .average_score
            .map_or_else(|| "N/A".to_string(), |avg| format!("{:.1}", avg));
        format!(
            "{} cars: {} healthy, {} alerting ({} sensor failures, {} engine stress, {} high coolant); average score {}",
            self.total_cars,
            self.healthy,
            self.alerting,
            self.sensor_failures,
            self.engine_stress,
            self.high_coolant_temperature,
            average
        )
    }
}

#[derive(Serialize)]
struct Export<'a> {
    summary: FleetSummary,
    cars: &'a [CarReport],
}

/// Serialize a report pass and its summary as pretty JSON.
pub fn to_json(reports: &[CarReport]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&Export {
        summary: FleetSummary::from_reports(reports),
        cars: reports,
    })
}

/// Export a report pass to a JSON file.
pub fn export_to_file(path: &Path, reports: &[CarReport]) -> anyhow::Result<()> {
    let json = to_json(reports)?;
    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DiagnosticRecord;

    fn car(id: &str, score: Option<f64>, alerts: Vec<Alert>) -> CarReport {
        CarReport {
            car_id: id.to_string(),
            score,
            alerts,
            record: DiagnosticRecord::new(Some(3000), Some(40.0), Some(95.0)),
        }
    }

    fn sample() -> Vec<CarReport> {
        vec![
            car("CAR1", Some(70.0), vec![]),
            car("CAR2", Some(30.0), vec![Alert::EngineStress]),
            car(
                "CAR3",
                Some(-25.0),
                vec![Alert::EngineStress, Alert::HighCoolantTemperature],
            ),
            car("CAR4", None, vec![Alert::SensorFailure]),
        ]
    }

    #[test]
    fn test_render_car_with_score_and_no_alerts() {
        assert_eq!(
            render_car(&car("CAR1", Some(70.0), vec![])),
            "Car: CAR1\nPerformance Score: 70.0\nAlerts: None\n\n"
        );
    }

    #[test]
    fn test_render_car_joins_alerts() {
        let rendered = render_car(&sample()[2]);
        assert!(rendered.contains("Performance Score: -25.0\n"));
        assert!(rendered.contains("Alerts: Engine Stress Detected, High Coolant Temperature\n"));
    }

    #[test]
    fn test_render_car_negative_score_full_block() {
        assert_eq!(
            render_car(&sample()[2]),
            "Car: CAR3\nPerformance Score: -25.0\n\
             Alerts: Engine Stress Detected, High Coolant Temperature\n\n"
        );
    }

    #[test]
    fn test_write_report_in_order() {
        let mut out = Vec::new();
        write_report(&mut out, &sample()).unwrap();
        let text = String::from_utf8(out).unwrap();

        let positions: Vec<_> = ["Car: CAR1", "Car: CAR2", "Car: CAR3", "Car: CAR4"]
            .iter()
            .map(|needle| text.find(needle).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(text.contains("Performance Score: N/A"));
    }

    #[test]
    fn test_summary_counts() {
        let summary = FleetSummary::from_reports(&sample());
        assert_eq!(summary.total_cars, 4);
        assert_eq!(summary.healthy, 1);
        assert_eq!(summary.alerting, 3);
        assert_eq!(summary.sensor_failures, 1);
        assert_eq!(summary.engine_stress, 2);
        assert_eq!(summary.high_coolant_temperature, 1);
        // (70 + 30 - 25) / 3
        assert_eq!(summary.average_score, Some(25.0));
        assert!(summary.render().starts_with("4 cars: 1 healthy, 3 alerting"));
    }

    #[test]
    fn test_summary_of_empty_pass() {
        let summary = FleetSummary::from_reports(&[]);
        assert_eq!(summary.total_cars, 0);
        assert_eq!(summary.average_score, None);
        assert!(summary.render().ends_with("average score N/A"));
    }

    #[test]
    fn test_json_export() {
        let json = to_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["summary"]["total_cars"], 4);
        assert_eq!(value["cars"][0]["car_id"], "CAR1");
        assert_eq!(value["cars"][1]["alerts"][0], "Engine Stress Detected");
        assert!(value["cars"][3]["score"].is_null());
        assert_eq!(value["cars"][0]["record"]["rpm"], 3000);
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        export_to_file(&path, &sample()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"sensor_failures\": 1"));
    }
}
