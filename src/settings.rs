//! Settings for thresholds and the drift pass.
//!
//! Every setting has a default; a TOML file may override any subset:
//!
//! ```toml
//! [thresholds]
//! score = 45.0
//! coolant_temperature = 100.0
//!
//! [drift]
//! updates = 20
//! delay = "5ms"
//! ```

use std::path::Path;
use std::time::Duration;

use ::config::{Config, File, FileFormat};
use serde::Deserialize;

use crate::data::Thresholds;
use crate::duration::parse_duration;
use crate::error::{MonitorError, Result};

/// Default number of perturbations per car in the drift pass.
pub const DEFAULT_DRIFT_UPDATES: usize = 10;
/// Default pause between perturbations.
pub const DEFAULT_DRIFT_DELAY: &str = "10ms";

/// Drift pass parameters as written in a settings file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DriftSettings {
    pub updates: usize,
    /// Duration string such as "10ms" or "0.5s".
    pub delay: String,
}

impl Default for DriftSettings {
    fn default() -> Self {
        Self {
            updates: DEFAULT_DRIFT_UPDATES,
            delay: DEFAULT_DRIFT_DELAY.to_string(),
        }
    }
}

impl DriftSettings {
    pub fn delay(&self) -> Result<Duration> {
        parse_duration(&self.delay)
            .map_err(|e| MonitorError::Config(format!("drift.delay: {}", e)))
    }
}

/// All tunable settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub thresholds: Thresholds,
    pub drift: DriftSettings,
}

impl Settings {
    /// Load settings from a TOML file, falling back to defaults for
    /// anything the file leaves out.
    pub fn load(path: &Path) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .build()?;
        Self::from_config(config)
    }

    /// Parse settings from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()?;
        Self::from_config(config)
    }

    fn from_config(config: Config) -> Result<Self> {
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if !self.thresholds.score.is_finite() {
            return Err(MonitorError::Config(
                "thresholds.score must be a finite number".to_string(),
            ));
        }
        if !self.thresholds.coolant_temperature.is_finite() {
            return Err(MonitorError::Config(
                "thresholds.coolant_temperature must be a finite number".to_string(),
            ));
        }
        self.drift.delay()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{HIGH_COOLANT_TEMP, SCORE_THRESHOLD};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.thresholds.score, SCORE_THRESHOLD);
        assert_eq!(settings.thresholds.coolant_temperature, HIGH_COOLANT_TEMP);
        assert_eq!(settings.drift.updates, 10);
        assert_eq!(settings.drift.delay().unwrap(), Duration::from_millis(10));
    }

    #[test]
    fn test_partial_override() {
        let settings = Settings::from_toml(
            r#"
            [thresholds]
            score = 45.0

            [drift]
            delay = "5ms"
            "#,
        )
        .unwrap();
        assert_eq!(settings.thresholds.score, 45.0);
        assert_eq!(settings.thresholds.coolant_temperature, HIGH_COOLANT_TEMP);
        assert_eq!(settings.drift.updates, 10);
        assert_eq!(settings.drift.delay().unwrap(), Duration::from_millis(5));
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        assert_eq!(Settings::from_toml("").unwrap(), Settings::default());
    }

    #[test]
    fn test_invalid_delay_rejected() {
        let result = Settings::from_toml("[drift]\ndelay = \"soon\"\n");
        assert!(matches!(result, Err(MonitorError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[drift]\nupdates = 3").unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.drift.updates, 3);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = Settings::load(Path::new("/nonexistent/garage.toml"));
        assert!(matches!(result, Err(MonitorError::Config(_))));
    }
}
