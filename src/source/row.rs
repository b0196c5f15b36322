//! A single raw diagnostic row.

/// One `(CarID, DiagnosticType, Value)` triple as read from a source.
///
/// Every field is optional because rows can be short or blank. Rows are
/// never validated here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticRow {
    pub car_id: Option<String>,
    pub diagnostic_type: Option<String>,
    pub value: Option<String>,
}

impl DiagnosticRow {
    /// Build a complete row.
    pub fn new(
        car_id: impl Into<String>,
        diagnostic_type: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            car_id: Some(car_id.into()),
            diagnostic_type: Some(diagnostic_type.into()),
            value: Some(value.into()),
        }
    }

    /// Returns the car id, type, and value if the row is usable.
    ///
    /// A row is usable when the car id and type are present and non-empty
    /// and a value is present. An empty value is still usable; it fails
    /// later as a parse error for that car.
    pub fn fields(&self) -> Option<(&str, &str, &str)> {
        let car_id = self.car_id.as_deref().filter(|s| !s.is_empty())?;
        let diagnostic_type = self.diagnostic_type.as_deref().filter(|s| !s.is_empty())?;
        let value = self.value.as_deref()?;
        Some((car_id, diagnostic_type, value))
    }
}
