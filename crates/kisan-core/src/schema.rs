//! Output schemas and advisory result records
//!
//! An [`OutputSchema`] is the contract handed to the model: an ordered list of
//! required string fields. Providers render it into their structured-output
//! format, and the prompt binder renders it as a JSON example.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A required string field in a model response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputField {
    pub name: &'static str,
    pub description: &'static str,
}

/// Declared shape of a model response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSchema {
    pub name: &'static str,
    pub fields: &'static [OutputField],
}

impl OutputSchema {
    /// Pretty JSON example with one placeholder value per field, in order.
    pub fn example(&self, language: &str) -> String {
        let mut out = String::from("{\n");
        for (i, field) in self.fields.iter().enumerate() {
            let sep = if i + 1 == self.fields.len() { "" } else { "," };
            let value = Value::String(format!("{} (in {})", field.description, language));
            out.push_str(&format!("  \"{}\": {}{}\n", field.name, value, sep));
        }
        out.push('}');
        out
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> {
        self.fields.iter().map(|f| f.name)
    }
}

/// A result record produced by the model
pub trait AdvisoryOutput: Serialize + DeserializeOwned + Send + 'static {
    const SCHEMA: OutputSchema;
}

/// Planting and harvesting window for one crop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropTimingAdvice {
    pub planting_time: String,
    pub harvesting_time: String,
    pub considerations: String,
}

impl AdvisoryOutput for CropTimingAdvice {
    const SCHEMA: OutputSchema = OutputSchema {
        name: "CropTimingAdvice",
        fields: &[
            OutputField {
                name: "plantingTime",
                description: "The suggested optimal planting time for the crop",
            },
            OutputField {
                name: "harvestingTime",
                description: "The suggested optimal harvesting time for the crop",
            },
            OutputField {
                name: "considerations",
                description: "Additional considerations for crop timing",
            },
        ],
    };
}

/// Yield estimate with improvement insights
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YieldPrediction {
    pub predicted_yield: String,
    pub insights: String,
}

impl AdvisoryOutput for YieldPrediction {
    const SCHEMA: OutputSchema = OutputSchema {
        name: "YieldPrediction",
        fields: &[
            OutputField {
                name: "predictedYield",
                description: "The predicted crop yield, with units",
            },
            OutputField {
                name: "insights",
                description: "Actionable insights for improving crop yield",
            },
        ],
    };
}

/// Forecast summary with farming advice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherAdvice {
    pub forecast_summary: String,
    pub advice: String,
}

impl AdvisoryOutput for WeatherAdvice {
    const SCHEMA: OutputSchema = OutputSchema {
        name: "WeatherAdvice",
        fields: &[
            OutputField {
                name: "forecastSummary",
                description: "A brief summary of the weather forecast",
            },
            OutputField {
                name: "advice",
                description: "Actionable agricultural advice based on the forecast",
            },
        ],
    };
}

/// Synthesized speech as a self-contained data URI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechResult {
    pub media: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_lists_fields_in_order() {
        let example = WeatherAdvice::SCHEMA.example("Urdu");
        let summary = example.find("forecastSummary").unwrap();
        let advice = example.find("\"advice\"").unwrap();
        assert!(summary < advice);
        assert!(example.contains("(in Urdu)"));
        // the example itself must be valid JSON
        let parsed: Value = serde_json::from_str(&example).unwrap();
        assert!(parsed.is_object());
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let advice = YieldPrediction {
            predicted_yield: "45 maunds per acre".into(),
            insights: "Irrigate at tillering".into(),
        };
        let value = serde_json::to_value(&advice).unwrap();
        assert_eq!(value["predictedYield"], "45 maunds per acre");
    }
}
