//! Outdoor safety score combining air quality, temperature, wind and conditions.

use crate::air_quality::{check_reading, classify, AirQualityCategory};
use crate::error::Error;

/// Weather variables the scorer needs, taken from one query result.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub pm2_5: f64,
    pub wind_speed_kmh: f64,
    pub temperature_c: f64,
    pub condition_description: String,
}

impl WeatherSnapshot {
    /// Rejects readings the scorer would otherwise silently pass through.
    pub fn validate(&self) -> Result<(), Error> {
        check_reading(self.pm2_5)?;
        if !self.wind_speed_kmh.is_finite() {
            return Err(Error::invalid("wind_speed_kmh", "must be a finite number"));
        }
        if self.wind_speed_kmh < 0.0 {
            return Err(Error::invalid("wind_speed_kmh", "must not be negative"));
        }
        if !self.temperature_c.is_finite() {
            return Err(Error::invalid("temperature_c", "must be a finite number"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    AirExcellent,
    AirModerate,
    AirPoor,
    Umbrella,
    StayIndoors,
    ClearSkies,
    LowVisibility,
    HighWind,
}

impl Advisory {
    pub fn message(&self) -> &'static str {
        match self {
            Advisory::AirExcellent => "Air quality is excellent. A great time to be outside.",
            Advisory::AirModerate => {
                "Air quality is moderate. Sensitive groups should limit prolonged outdoor activity."
            }
            Advisory::AirPoor => "Air quality is poor. Avoid outdoor activity or wear a mask.",
            Advisory::Umbrella => "Rain expected. Carry an umbrella.",
            Advisory::StayIndoors => "Thunderstorms in the area. Stay indoors.",
            Advisory::ClearSkies => "Clear skies. Wear sunscreen and stay hydrated.",
            Advisory::LowVisibility => "Low visibility. Drive carefully.",
            Advisory::HighWind => "High winds. Secure loose objects and take care outdoors.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyAssessment {
    pub score: u8,
    pub advisories: Vec<Advisory>,
}

impl SafetyAssessment {
    pub fn messages(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.advisories.iter().map(Advisory::message)
    }
}

const OBSCURED: [&str; 3] = ["fog", "haze", "mist"];

/// Scores a snapshot from 100 down to 0.
///
/// Each factor deducts from its highest applicable band only; the condition
/// deduction takes the first match of thunderstorm, obscured, rain. Matching
/// is done on the lower-cased description.
pub fn score(snapshot: &WeatherSnapshot) -> SafetyAssessment {
    let category = classify(snapshot.pm2_5);
    let description = snapshot.condition_description.to_lowercase();
    let obscured = OBSCURED.iter().any(|word| description.contains(word));

    let deductions = i32::from(category.safety_deduction())
        + temperature_deduction(snapshot.temperature_c)
        + wind_deduction(snapshot.wind_speed_kmh)
        + condition_deduction(&description, obscured);
    let score = (100 - deductions).clamp(0, 100) as u8;

    let mut advisories = vec![match category {
        AirQualityCategory::Good => Advisory::AirExcellent,
        AirQualityCategory::Moderate | AirQualityCategory::UnhealthyForSensitive => {
            Advisory::AirModerate
        }
        _ => Advisory::AirPoor,
    }];
    if description.contains("rain") {
        advisories.push(Advisory::Umbrella);
    }
    if description.contains("thunderstorm") {
        advisories.push(Advisory::StayIndoors);
    }
    if description.contains("sun") || description.contains("clear") {
        advisories.push(Advisory::ClearSkies);
    }
    if obscured {
        advisories.push(Advisory::LowVisibility);
    }
    if snapshot.wind_speed_kmh > 30.0 {
        advisories.push(Advisory::HighWind);
    }

    SafetyAssessment { score, advisories }
}

fn temperature_deduction(temperature_c: f64) -> i32 {
    if temperature_c > 40.0 || temperature_c < -5.0 {
        20
    } else if temperature_c > 35.0 || temperature_c < 5.0 {
        10
    } else {
        0
    }
}

fn wind_deduction(wind_speed_kmh: f64) -> i32 {
    if wind_speed_kmh > 50.0 {
        20
    } else if wind_speed_kmh > 30.0 {
        10
    } else {
        0
    }
}

fn condition_deduction(description: &str, obscured: bool) -> i32 {
    if description.contains("thunderstorm") {
        50
    } else if obscured {
        15
    } else if description.contains("rain") {
        10
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(pm2_5: f64, temperature_c: f64, wind_speed_kmh: f64, description: &str) -> WeatherSnapshot {
        WeatherSnapshot {
            pm2_5,
            wind_speed_kmh,
            temperature_c,
            condition_description: description.to_string(),
        }
    }

    #[test]
    fn mild_clear_day_scores_full_marks() {
        let assessment = score(&snapshot(8.0, 22.0, 5.0, "clear sky"));
        assert_eq!(assessment.score, 100);
        assert_eq!(
            assessment.advisories,
            vec![Advisory::AirExcellent, Advisory::ClearSkies]
        );
    }

    #[test]
    fn heavy_pollution_alone_costs_forty() {
        let assessment = score(&snapshot(200.0, 20.0, 10.0, "clear"));
        assert_eq!(assessment.score, 60);
        assert_eq!(assessment.advisories[0], Advisory::AirPoor);
    }

    #[test]
    fn pm_deduction_uses_highest_band_only() {
        assert_eq!(score(&snapshot(35.4, 20.0, 0.0, "")).score, 100);
        assert_eq!(score(&snapshot(35.5, 20.0, 0.0, "")).score, 90);
        assert_eq!(score(&snapshot(55.5, 20.0, 0.0, "")).score, 75);
        assert_eq!(score(&snapshot(150.5, 20.0, 0.0, "")).score, 60);
    }

    #[test]
    fn storm_with_heat_and_wind() {
        let assessment = score(&snapshot(10.0, 45.0, 60.0, "thunderstorm and rain"));
        assert_eq!(assessment.score, 10);
        assert_eq!(
            assessment.advisories,
            vec![
                Advisory::AirExcellent,
                Advisory::Umbrella,
                Advisory::StayIndoors,
                Advisory::HighWind,
            ]
        );
    }

    #[test]
    fn score_clamps_at_zero() {
        // 40 + 20 + 20 + 50 = 130 points of deductions
        let assessment = score(&snapshot(300.0, -10.0, 80.0, "thunderstorm"));
        assert_eq!(assessment.score, 0);

        // exactly 100 points of deductions
        let assessment = score(&snapshot(200.0, 20.0, 35.0, "thunderstorm"));
        assert_eq!(assessment.score, 0);
    }

    #[test]
    fn condition_deduction_takes_first_match() {
        assert_eq!(score(&snapshot(5.0, 20.0, 0.0, "light rain")).score, 90);
        assert_eq!(score(&snapshot(5.0, 20.0, 0.0, "mist")).score, 85);
        assert_eq!(score(&snapshot(5.0, 20.0, 0.0, "rain and fog")).score, 85);
        assert_eq!(score(&snapshot(5.0, 20.0, 0.0, "thunderstorm with haze")).score, 50);
    }

    #[test]
    fn temperature_bands() {
        assert_eq!(score(&snapshot(5.0, 35.0, 0.0, "")).score, 100);
        assert_eq!(score(&snapshot(5.0, 36.0, 0.0, "")).score, 90);
        assert_eq!(score(&snapshot(5.0, 4.0, 0.0, "")).score, 90);
        assert_eq!(score(&snapshot(5.0, -6.0, 0.0, "")).score, 80);
        assert_eq!(score(&snapshot(5.0, 41.0, 0.0, "")).score, 80);
    }

    #[test]
    fn description_matching_ignores_case() {
        let assessment = score(&snapshot(20.0, 20.0, 40.0, "Dense FOG"));
        assert_eq!(assessment.score, 75);
        assert_eq!(
            assessment.advisories,
            vec![Advisory::AirModerate, Advisory::LowVisibility, Advisory::HighWind]
        );
    }

    #[test]
    fn score_stays_within_bounds() {
        for pm in [0.0, 40.0, 100.0, 500.0] {
            for temp in [-20.0, 0.0, 20.0, 38.0, 50.0] {
                for wind in [0.0, 40.0, 90.0] {
                    for desc in ["", "rain", "haze", "thunderstorm", "sunny"] {
                        let value = score(&snapshot(pm, temp, wind, desc)).score;
                        assert!(value <= 100);
                    }
                }
            }
        }
    }

    #[test]
    fn validate_rejects_unusable_readings() {
        assert!(snapshot(10.0, 20.0, 5.0, "clear").validate().is_ok());
        assert!(matches!(
            snapshot(f64::NAN, 20.0, 5.0, "").validate(),
            Err(Error::InvalidInput { field: "pm2_5", .. })
        ));
        assert!(matches!(
            snapshot(-1.0, 20.0, 5.0, "").validate(),
            Err(Error::InvalidInput { field: "pm2_5", .. })
        ));
        assert!(matches!(
            snapshot(1.0, 20.0, -5.0, "").validate(),
            Err(Error::InvalidInput { field: "wind_speed_kmh", .. })
        ));
        assert!(matches!(
            snapshot(1.0, f64::INFINITY, 5.0, "").validate(),
            Err(Error::InvalidInput { field: "temperature_c", .. })
        ));
    }
}
