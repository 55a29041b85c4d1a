use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PreferenceError;

/// Unit system for temperatures, as understood by the weather service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    /// Query-string / storage value
    pub fn as_str(self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    /// Temperature symbol for display
    pub fn symbol(self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }

    /// Convert a temperature reported in these units to Celsius.
    pub fn to_celsius(self, temperature: f64) -> f64 {
        match self {
            Units::Metric => temperature,
            Units::Imperial => (temperature - 32.0) * 5.0 / 9.0,
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Units {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            other => Err(PreferenceError::InvalidValue {
                key: "units".to_string(),
                value: other.to_string(),
            }),
        }
    }
}
