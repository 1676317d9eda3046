//! Static weather reference table
//!
//! Stands in for a weather data source. The same table feeds the
//! weather-advice prompt and the forecast view.

use serde::{Deserialize, Serialize};

/// Location the reference table describes
pub const FORECAST_LOCATION: &str = "Lahore, Pakistan";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherCondition {
    Sunny,
    Cloudy,
    #[serde(rename = "Partly Cloudy")]
    PartlyCloudy,
    Rainy,
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherCondition::Sunny => write!(f, "Sunny"),
            WeatherCondition::Cloudy => write!(f, "Cloudy"),
            WeatherCondition::PartlyCloudy => write!(f, "Partly Cloudy"),
            WeatherCondition::Rainy => write!(f, "Rainy"),
        }
    }
}

/// One row of the reference table. Temperatures are °C, wind is km/h.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ForecastDay {
    pub day: &'static str,
    pub condition: WeatherCondition,
    pub high: i16,
    pub low: i16,
    pub humidity: u8,
    pub wind_speed: u8,
}

const fn day(
    day: &'static str,
    condition: WeatherCondition,
    high: i16,
    low: i16,
    humidity: u8,
    wind_speed: u8,
) -> ForecastDay {
    ForecastDay {
        day,
        condition,
        high,
        low,
        humidity,
        wind_speed,
    }
}

/// Seven days starting today
pub const WEEKLY_FORECAST: [ForecastDay; 7] = [
    day("Today", WeatherCondition::Sunny, 34, 22, 45, 10),
    day("Monday", WeatherCondition::Cloudy, 32, 23, 55, 12),
    day("Tuesday", WeatherCondition::PartlyCloudy, 33, 24, 50, 15),
    day("Wednesday", WeatherCondition::Rainy, 29, 22, 75, 20),
    day("Thursday", WeatherCondition::Sunny, 35, 25, 40, 8),
    day("Friday", WeatherCondition::Sunny, 36, 26, 38, 7),
    day("Saturday", WeatherCondition::PartlyCloudy, 34, 25, 48, 11),
];

/// The full table with its location, as served to clients
#[derive(Debug, Clone, Serialize)]
pub struct ForecastTable {
    pub location: &'static str,
    pub forecast: &'static [ForecastDay],
}

pub fn reference_table() -> ForecastTable {
    ForecastTable {
        location: FORECAST_LOCATION,
        forecast: &WEEKLY_FORECAST,
    }
}

pub fn lookup(day: &str) -> Option<&'static ForecastDay> {
    WEEKLY_FORECAST
        .iter()
        .find(|d| d.day.eq_ignore_ascii_case(day))
}

/// Pretty JSON of the daily rows, as embedded in prompts.
pub fn forecast_payload() -> String {
    // Serializing plain structs of primitives cannot fail.
    serde_json::to_string_pretty(&WEEKLY_FORECAST[..]).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_has_seven_unique_days() {
        let mut days: Vec<_> = WEEKLY_FORECAST.iter().map(|d| d.day).collect();
        days.sort_unstable();
        days.dedup();
        assert_eq!(days.len(), 7);
        assert!(WEEKLY_FORECAST.iter().all(|d| d.low < d.high));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let wednesday = lookup("wednesday").unwrap();
        assert_eq!(wednesday.condition, WeatherCondition::Rainy);
        assert_eq!(wednesday.humidity, 75);
        assert!(lookup("Sunday").is_none());
    }

    #[test]
    fn test_payload_is_stable_json() {
        let payload = forecast_payload();
        assert_eq!(payload, forecast_payload());
        assert!(payload.contains("\"condition\": \"Partly Cloudy\""));
        assert!(payload.contains("\"wind_speed\": 20"));
    }
}
