//! Advisory request records
//!
//! Field names travel as camelCase on the wire. Missing fields deserialize to
//! empty strings so they are reported by their field rule rather than by the
//! JSON decoder.

use serde::{Deserialize, Serialize};

use crate::prompt::PromptBindings;
use crate::validation::{FieldRule, Validate};
use crate::voice::DEFAULT_LANGUAGE_CODE;

const CROP_TYPE: FieldRule = FieldRule::min("cropType", 3, "Crop type must be at least 3 characters.");
const LOCATION: FieldRule = FieldRule::min("location", 3, "Location is required.");
const LANGUAGE: FieldRule = FieldRule::min("language", 1, "Language is required.").trimmed();

/// Input for the crop timing use case
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CropTimingRequest {
    pub crop_type: String,
    pub location: String,
    pub weather_forecast: String,
    pub language: String,
}

impl Validate for CropTimingRequest {
    const RULES: &'static [FieldRule] = &[
        CROP_TYPE,
        LOCATION,
        FieldRule::min("weatherForecast", 10, "Weather forecast is required."),
        LANGUAGE,
    ];

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "cropType" => Some(&self.crop_type),
            "location" => Some(&self.location),
            "weatherForecast" => Some(&self.weather_forecast),
            "language" => Some(&self.language),
            _ => None,
        }
    }
}

impl PromptBindings for CropTimingRequest {
    fn bindings(&self) -> Vec<(&'static str, String)> {
        vec![
            ("cropType", self.crop_type.clone()),
            ("location", self.location.clone()),
            ("weatherForecast", self.weather_forecast.clone()),
            ("language", self.language.clone()),
        ]
    }
}

/// Input for the yield prediction use case
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct YieldPredictionRequest {
    pub crop_type: String,
    pub location: String,
    pub historical_data: String,
    pub current_conditions: String,
    pub farming_practices: String,
    pub language: String,
}

impl Validate for YieldPredictionRequest {
    const RULES: &'static [FieldRule] = &[
        CROP_TYPE,
        LOCATION,
        FieldRule::min("historicalData", 10, "Historical data is required."),
        FieldRule::min("currentConditions", 10, "Current conditions are required."),
        FieldRule::min("farmingPractices", 10, "Farming practices are required."),
        LANGUAGE,
    ];

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "cropType" => Some(&self.crop_type),
            "location" => Some(&self.location),
            "historicalData" => Some(&self.historical_data),
            "currentConditions" => Some(&self.current_conditions),
            "farmingPractices" => Some(&self.farming_practices),
            "language" => Some(&self.language),
            _ => None,
        }
    }
}

impl PromptBindings for YieldPredictionRequest {
    fn bindings(&self) -> Vec<(&'static str, String)> {
        vec![
            ("cropType", self.crop_type.clone()),
            ("location", self.location.clone()),
            ("historicalData", self.historical_data.clone()),
            ("currentConditions", self.current_conditions.clone()),
            ("farmingPractices", self.farming_practices.clone()),
            ("language", self.language.clone()),
        ]
    }
}

/// Input for the weather advice use case
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeatherAdviceRequest {
    pub location: String,
    pub language: String,
}

impl Validate for WeatherAdviceRequest {
    const RULES: &'static [FieldRule] = &[LOCATION, LANGUAGE];

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "location" => Some(&self.location),
            "language" => Some(&self.language),
            _ => None,
        }
    }
}

impl PromptBindings for WeatherAdviceRequest {
    fn bindings(&self) -> Vec<(&'static str, String)> {
        vec![
            ("location", self.location.clone()),
            ("language", self.language.clone()),
        ]
    }
}

/// Input for speech synthesis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpeechRequest {
    pub text: String,
    pub language_code: String,
}

impl SpeechRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_language_code(mut self, code: impl Into<String>) -> Self {
        self.language_code = code.into();
        self
    }
}

impl Default for SpeechRequest {
    fn default() -> Self {
        Self {
            text: String::new(),
            language_code: DEFAULT_LANGUAGE_CODE.to_string(),
        }
    }
}

impl Validate for SpeechRequest {
    const RULES: &'static [FieldRule] = &[
        FieldRule::min("text", 1, "Text to speak is required.").trimmed(),
        FieldRule::min("languageCode", 2, "Language code is required.").trimmed(),
    ];

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "text" => Some(&self.text),
            "languageCode" => Some(&self.language_code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate;

    #[test]
    fn test_crop_timing_deserializes_camel_case() {
        let req: CropTimingRequest = serde_json::from_str(
            r#"{"cropType":"Wheat","location":"Lahore","weatherForecast":"Sunny, 30°C for 10 days","language":"English"}"#,
        )
        .unwrap();
        assert_eq!(req.crop_type, "Wheat");
        assert_eq!(req.weather_forecast, "Sunny, 30°C for 10 days");
        assert!(validate(req).is_ok());
    }

    #[test]
    fn test_missing_fields_are_reported_per_field() {
        let req: YieldPredictionRequest =
            serde_json::from_str(r#"{"cropType":"Rice","location":"Multan"}"#).unwrap();
        let err = validate(req).unwrap_err();
        let fields: Vec<_> = err.fields().collect();
        assert_eq!(
            fields,
            vec!["historicalData", "currentConditions", "farmingPractices", "language"]
        );
        assert_eq!(
            err.message_for("currentConditions"),
            Some("Current conditions are required.")
        );
    }

    #[test]
    fn test_short_crop_type_rejected() {
        let req = CropTimingRequest {
            crop_type: "Ri".into(),
            location: "Lahore".into(),
            weather_forecast: "Hot and dry all week".into(),
            language: "Urdu".into(),
        };
        let err = validate(req).unwrap_err();
        assert_eq!(
            err.message_for("cropType"),
            Some("Crop type must be at least 3 characters.")
        );
        assert_eq!(err.errors().len(), 1);
    }

    #[test]
    fn test_weather_location_of_one_char_rejected() {
        let req = WeatherAdviceRequest {
            location: "L".into(),
            language: "English".into(),
        };
        assert!(validate(req).is_err());
    }

    #[test]
    fn test_speech_request_defaults_to_urdu() {
        let req: SpeechRequest = serde_json::from_str(r#"{"text":"سلام"}"#).unwrap();
        assert_eq!(req.language_code, "ur-PK");
        assert!(validate(req).is_ok());
    }

    #[test]
    fn test_blank_speech_text_rejected() {
        let err = validate(SpeechRequest::new("   \n")).unwrap_err();
        assert_eq!(err.message_for("text"), Some("Text to speak is required."));
    }
}
