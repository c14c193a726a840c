use serde::{Deserialize, Serialize};

/// Offset between the Celsius and Kelvin scales.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Address resolved from a CEP.
#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub cep: String,
    pub street: String,
    pub city: String,
    pub state: String,
}

/// Current temperature for a city, as reported by the weather upstream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentWeather {
    pub temp_c: f64,
    pub temp_f: f64,
}

/// Unified response of both services: the resolved city plus the current
/// temperature in three scales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city: String,
    #[serde(rename = "temp_C")]
    pub temp_c: f64,
    #[serde(rename = "temp_F")]
    pub temp_f: f64,
    #[serde(rename = "temp_K")]
    pub temp_k: f64,
}

impl WeatherReport {
    /// Compose the report, deriving Kelvin from Celsius. The Kelvin value is
    /// the only computed field in the whole pipeline.
    pub fn new(city: String, current: &CurrentWeather) -> Self {
        Self {
            city,
            temp_c: current.temp_c,
            temp_f: current.temp_f,
            temp_k: current.temp_c + KELVIN_OFFSET,
        }
    }
}
