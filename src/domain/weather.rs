//! Ambient-condition types and the consumption impact model.
//!
//! The impact table converts a temperature/sky pair into the multipliers the
//! energy model applies to rated consumption. Multipliers compose
//! multiplicatively; the note reflects the most severe single cause, with
//! snow appended when it coexists with a temperature note.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::geo::Coordinate;

/// Sky condition affecting energy consumption
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SkyCondition {
    #[default]
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Snow,
}

impl SkyCondition {
    /// Map a free-form provider label ("light rain", "Snow", "overcast
    /// clouds") onto a sky condition.
    pub fn from_label(label: &str) -> Self {
        let lower = label.to_lowercase();
        if lower.contains("snow") || lower.contains("sleet") {
            SkyCondition::Snow
        } else if lower.contains("drizzle") {
            SkyCondition::Drizzle
        } else if lower.contains("rain") || lower.contains("shower") || lower.contains("thunder") {
            SkyCondition::Rain
        } else if lower.contains("cloud") || lower.contains("overcast") || lower.contains("fog") {
            SkyCondition::Clouds
        } else {
            SkyCondition::Clear
        }
    }
}

/// Derived effect of ambient conditions on consumption and charging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherImpact {
    /// Efficiency multiplier <= 1.0; lower means more energy per mile
    pub efficiency: f64,
    pub range_loss_percent: i32,
    /// Charging-speed multiplier (cold batteries accept less power)
    pub charging_speed: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl WeatherImpact {
    /// Evaluate the impact table for a temperature (F) and sky condition.
    pub fn evaluate(temperature_f: f64, sky: SkyCondition) -> Self {
        let (mut efficiency, mut note) = if temperature_f < 20.0 {
            (0.70, Some("Extreme cold significantly reduces range".to_string()))
        } else if temperature_f < 40.0 {
            (0.85, Some("Cold weather reduces range".to_string()))
        } else if temperature_f > 95.0 {
            (0.85, Some("High heat increases energy use".to_string()))
        } else {
            (1.0, None)
        };

        match sky {
            SkyCondition::Rain | SkyCondition::Drizzle => efficiency *= 0.95,
            SkyCondition::Snow => {
                efficiency *= 0.90;
                note = Some(match note {
                    Some(n) => format!("{n}; snow further reduces range"),
                    None => "Snow reduces range and traction".to_string(),
                });
            }
            _ => {}
        }

        let charging_speed = if temperature_f < 40.0 { 0.8 } else { 1.0 };

        WeatherImpact {
            efficiency,
            range_loss_percent: ((1.0 - efficiency) * 100.0).round() as i32,
            charging_speed,
            note,
        }
    }
}

impl Default for WeatherImpact {
    fn default() -> Self {
        Self {
            efficiency: 1.0,
            range_loss_percent: 0,
            charging_speed: 1.0,
            note: None,
        }
    }
}

/// One point-in-time weather observation with its derived impact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionSample {
    pub coord: Coordinate,
    pub temperature_f: f64,
    pub sky: SkyCondition,
    pub impact: WeatherImpact,
}

impl ConditionSample {
    pub fn new(coord: Coordinate, temperature_f: f64, sky: SkyCondition) -> Self {
        Self {
            coord,
            temperature_f,
            sky,
            impact: WeatherImpact::evaluate(temperature_f, sky),
        }
    }
}

/// Raw observation as translated from a live weather provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub temperature_f: f64,
    pub condition_label: String,
    pub humidity_percent: f64,
    pub wind_speed_mph: f64,
    pub visibility_miles: f64,
    pub is_daytime: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(10.0, SkyCondition::Clear, 0.70, 30)]
    #[case(19.9, SkyCondition::Clear, 0.70, 30)]
    #[case(20.0, SkyCondition::Clear, 0.85, 15)]
    #[case(39.9, SkyCondition::Clear, 0.85, 15)]
    #[case(40.0, SkyCondition::Clear, 1.0, 0)]
    #[case(72.0, SkyCondition::Clear, 1.0, 0)]
    #[case(95.0, SkyCondition::Clear, 1.0, 0)]
    #[case(96.0, SkyCondition::Clear, 0.85, 15)]
    #[case(72.0, SkyCondition::Rain, 0.95, 5)]
    #[case(72.0, SkyCondition::Drizzle, 0.95, 5)]
    #[case(72.0, SkyCondition::Snow, 0.90, 10)]
    #[case(72.0, SkyCondition::Clouds, 1.0, 0)]
    #[case(30.0, SkyCondition::Rain, 0.8075, 19)]
    fn impact_table(
        #[case] temp_f: f64,
        #[case] sky: SkyCondition,
        #[case] efficiency: f64,
        #[case] range_loss: i32,
    ) {
        let impact = WeatherImpact::evaluate(temp_f, sky);
        assert!(
            (impact.efficiency - efficiency).abs() < 1e-9,
            "temp={temp_f} sky={sky}: got {}",
            impact.efficiency
        );
        assert_eq!(impact.range_loss_percent, range_loss);
    }

    #[test]
    fn test_snow_at_fifteen_degrees() {
        // 0.70 * 0.90 = 0.63, 37% range loss
        let impact = WeatherImpact::evaluate(15.0, SkyCondition::Snow);
        assert!((impact.efficiency - 0.63).abs() < 1e-9);
        assert_eq!(impact.range_loss_percent, 37);
        let note = impact.note.expect("note present");
        assert!(note.contains("Extreme cold"));
        assert!(note.contains("snow"));
    }

    #[rstest]
    #[case(39.9, 0.8)]
    #[case(40.0, 1.0)]
    #[case(15.0, 0.8)]
    fn charging_speed_threshold(#[case] temp_f: f64, #[case] expected: f64) {
        let impact = WeatherImpact::evaluate(temp_f, SkyCondition::Clear);
        assert_eq!(impact.charging_speed, expected);
    }

    #[rstest]
    #[case("light rain", SkyCondition::Rain)]
    #[case("Drizzle", SkyCondition::Drizzle)]
    #[case("heavy snow", SkyCondition::Snow)]
    #[case("overcast clouds", SkyCondition::Clouds)]
    #[case("clear sky", SkyCondition::Clear)]
    #[case("Thunderstorm", SkyCondition::Rain)]
    #[case("haze", SkyCondition::Clear)]
    fn provider_label_mapping(#[case] label: &str, #[case] expected: SkyCondition) {
        assert_eq!(SkyCondition::from_label(label), expected);
    }

    #[test]
    fn test_warm_clear_has_no_note() {
        assert!(WeatherImpact::evaluate(70.0, SkyCondition::Clear).note.is_none());
    }
}
