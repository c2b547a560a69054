use crate::air_quality::classify;
use crate::models::WeatherReport;
use crate::safety::SafetyAssessment;

/// Formats a PM2.5 reading with its category label
pub fn format_air_quality(pm2_5: f64) -> String {
    let category = classify(pm2_5);
    format!("PM2.5: {} \u{03bc}g/m\u{00b3} ({})", pm2_5, category.label())
}

/// Formats a safety assessment into a human-readable string
pub fn format_assessment(assessment: &SafetyAssessment) -> String {
    let mut output = format!("Safety Score: {}/100\n", assessment.score);
    if assessment.advisories.is_empty() {
        return output;
    }

    output.push_str("\nAdvisories:\n");
    for message in assessment.messages() {
        output.push_str(&format!("  - {}\n", message));
    }
    output
}

/// Formats current conditions, air quality and safety for one place
pub fn format_report(report: &WeatherReport, assessment: &SafetyAssessment) -> String {
    let category = classify(report.pm2_5);
    let mut output = format!(
        "Weather in {}\n\n  Conditions: {}\n  Icon: {}\n  Temperature: {}\u{00b0}C\n  Humidity: {}%\n  Wind speed: {} km/h\n  {} [{}]\n  Location: {:.4}, {:.4}\n\n",
        report.name,
        report.description,
        report.icon_url(),
        report.temp,
        report.humidity,
        report.speed,
        format_air_quality(report.pm2_5),
        category.style_tag(),
        report.lat,
        report.lon
    );
    output.push_str(&format_assessment(assessment));
    output
}

/// Formats recent searches, most recent first
pub fn format_history<'a>(entries: impl IntoIterator<Item = &'a str>) -> String {
    let mut output = String::new();
    for (i, entry) in entries.into_iter().enumerate() {
        if i == 0 {
            output.push_str("Recent Searches:\n\n");
        }
        output.push_str(&format!("{}. {}\n", i + 1, entry));
    }

    if output.is_empty() {
        return "No recent searches.".to_string();
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::safety::{score, Advisory};

    #[test]
    fn air_quality_line_includes_label() {
        assert_eq!(
            format_air_quality(41.5),
            "PM2.5: 41.5 \u{03bc}g/m\u{00b3} (Unhealthy for Sensitive)"
        );
    }

    #[test]
    fn assessment_lists_advisories_in_order() {
        let assessment = SafetyAssessment {
            score: 70,
            advisories: vec![Advisory::AirModerate, Advisory::Umbrella],
        };
        let text = format_assessment(&assessment);
        assert!(text.starts_with("Safety Score: 70/100\n"));
        let moderate = text.find(Advisory::AirModerate.message()).unwrap();
        let umbrella = text.find(Advisory::Umbrella.message()).unwrap();
        assert!(moderate < umbrella);
    }

    #[test]
    fn report_mentions_place_and_score() {
        let report = WeatherReport {
            name: "Delhi".to_string(),
            icon: "50d".to_string(),
            description: "haze".to_string(),
            temp: 31.0,
            humidity: 40.0,
            speed: 4.0,
            pm2_5: 88.0,
            lat: 28.66,
            lon: 77.23,
        };
        let text = format_report(&report, &score(&report.snapshot()));
        assert!(text.starts_with("Weather in Delhi"));
        assert!(text.contains("aqi-unhealthy]"));
        assert!(text.contains("Safety Score: 60/100"));
    }

    #[test]
    fn empty_history() {
        assert_eq!(format_history(Vec::new()), "No recent searches.");
        assert_eq!(
            format_history(["Rome", "Oslo"]),
            "Recent Searches:\n\n1. Rome\n2. Oslo\n"
        );
    }
}
