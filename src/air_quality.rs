//! PM2.5 classification against the US AQI breakpoints.

use crate::error::Error;

/// Air quality band derived from a PM2.5 concentration (µg/m³).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AirQualityCategory {
    Good,
    Moderate,
    UnhealthyForSensitive,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

/// Inclusive upper bound of each band below Hazardous.
const BREAKPOINTS: [(f64, AirQualityCategory); 5] = [
    (12.0, AirQualityCategory::Good),
    (35.4, AirQualityCategory::Moderate),
    (55.4, AirQualityCategory::UnhealthyForSensitive),
    (150.4, AirQualityCategory::Unhealthy),
    (250.4, AirQualityCategory::VeryUnhealthy),
];

/// Maps a PM2.5 concentration to its category.
///
/// Every input yields a category: negative readings fall in `Good` and NaN
/// is reported as `Hazardous`, since an unreadable sensor should never look safe.
pub fn classify(pm2_5: f64) -> AirQualityCategory {
    BREAKPOINTS
        .iter()
        .find(|(upper, _)| pm2_5 <= *upper)
        .map(|(_, category)| *category)
        .unwrap_or(AirQualityCategory::Hazardous)
}

/// Rejects readings no sensor can produce.
pub fn check_reading(pm2_5: f64) -> Result<(), Error> {
    if !pm2_5.is_finite() {
        return Err(Error::invalid("pm2_5", "must be a finite number"));
    }
    if pm2_5 < 0.0 {
        return Err(Error::invalid("pm2_5", "must not be negative"));
    }
    Ok(())
}

impl AirQualityCategory {
    pub fn label(&self) -> &'static str {
        match self {
            AirQualityCategory::Good => "Good",
            AirQualityCategory::Moderate => "Moderate",
            AirQualityCategory::UnhealthyForSensitive => "Unhealthy for Sensitive",
            AirQualityCategory::Unhealthy => "Unhealthy",
            AirQualityCategory::VeryUnhealthy => "Very Unhealthy",
            AirQualityCategory::Hazardous => "Hazardous",
        }
    }

    /// Presentation tag used by front ends to color the reading.
    pub fn style_tag(&self) -> &'static str {
        match self {
            AirQualityCategory::Good => "aqi-good",
            AirQualityCategory::Moderate => "aqi-moderate",
            AirQualityCategory::UnhealthyForSensitive => "aqi-unhealthy-sensitive",
            AirQualityCategory::Unhealthy => "aqi-unhealthy",
            AirQualityCategory::VeryUnhealthy => "aqi-very-unhealthy",
            AirQualityCategory::Hazardous => "aqi-hazardous",
        }
    }

    /// Severity rank, 0 for Good up to 5 for Hazardous.
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    /// Points the safety score loses for air in this band.
    pub fn safety_deduction(&self) -> u8 {
        match self {
            AirQualityCategory::Good | AirQualityCategory::Moderate => 0,
            AirQualityCategory::UnhealthyForSensitive => 10,
            AirQualityCategory::Unhealthy => 25,
            AirQualityCategory::VeryUnhealthy | AirQualityCategory::Hazardous => 40,
        }
    }
}
