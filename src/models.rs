use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::constants::ICON_BASE_URL;
use crate::safety::WeatherSnapshot;

// ============================================================================
// Weather Query Models
// ============================================================================

/// Combined current-weather and air-pollution result for one place.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct WeatherReport {
    /// Place name as resolved by the weather provider
    pub name: String,
    /// Provider icon code, e.g. "10d"
    pub icon: String,
    /// Free-text conditions, e.g. "light rain"
    pub description: String,
    /// Temperature in °C
    pub temp: f64,
    /// Relative humidity in percent
    pub humidity: f64,
    /// Wind speed in km/h
    pub speed: f64,
    /// PM2.5 concentration in µg/m³
    pub pm2_5: f64,
    pub lat: f64,
    pub lon: f64,
}

impl WeatherReport {
    pub fn snapshot(&self) -> WeatherSnapshot {
        WeatherSnapshot {
            pm2_5: self.pm2_5,
            wind_speed_kmh: self.speed,
            temperature_c: self.temp,
            condition_description: self.description.clone(),
        }
    }

    pub fn icon_url(&self) -> String {
        format!("{}/{}.png", ICON_BASE_URL, self.icon)
    }
}

// ============================================================================
// MCP Tool Request Models
// ============================================================================

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct ClassifyAirQualityRequest {
    /// PM2.5 concentration in µg/m³
    pub pm2_5: f64,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct AssessSafetyRequest {
    pub pm2_5: f64,
    pub wind_speed_kmh: f64,
    pub temperature_c: f64,
    /// Weather condition text, e.g. "thunderstorm with rain"
    pub description: String,
}

impl AssessSafetyRequest {
    pub fn snapshot(&self) -> WeatherSnapshot {
        WeatherSnapshot {
            pm2_5: self.pm2_5,
            wind_speed_kmh: self.wind_speed_kmh,
            temperature_c: self.temperature_c,
            condition_description: self.description.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct RecordSearchRequest {
    pub city: String,
}

#[derive(Debug, Default, Deserialize, Serialize, JsonSchema)]
pub struct SearchHistoryRequest {
    /// Only list places starting with this text
    #[serde(default)]
    pub prefix: Option<String>,
}
