use serde::{Deserialize, Serialize};

/// One long-format observation: a country's value for one indicator in one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Country name
    pub country: String,
    /// ISO 3-letter code, when the source carries one
    pub country_code: Option<String>,
    /// Indicator (OECD measure) name
    pub indicator: String,
    /// Reference year of the observation
    pub year: i32,
    /// Raw observed value
    pub value: f64,
}

impl RawRecord {
    /// Create a record without a country code
    pub fn new(
        country: impl Into<String>,
        indicator: impl Into<String>,
        year: i32,
        value: f64,
    ) -> Self {
        Self {
            country: country.into(),
            country_code: None,
            indicator: indicator.into(),
            year,
            value,
        }
    }

    /// Attach an ISO country code
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.country_code = Some(code.into());
        self
    }
}
