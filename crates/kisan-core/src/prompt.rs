//! Prompt templates
//!
//! Templates are static strings with `{{name}}` placeholders. Rendering is a
//! pure function of the template and the request bindings: the same inputs
//! always produce the same bytes. Every rendered prompt ends with a directive
//! describing the JSON object the model must return.

use std::collections::BTreeMap;

use crate::error::PromptError;
use crate::forecast;
use crate::schema::{AdvisoryOutput, CropTimingAdvice, OutputSchema, WeatherAdvice, YieldPrediction};

/// A request record that can fill template placeholders
pub trait PromptBindings {
    fn bindings(&self) -> Vec<(&'static str, String)>;
}

/// Named instruction templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptTemplate {
    CropTiming,
    YieldPrediction,
    WeatherAdvice,
}

const CROP_TIMING: &str = "\
You are an expert agricultural advisor. Based on the farmer's location, crop type, and weather forecast, \
provide the optimal planting and harvesting times. Respond in this language: {{language}}.

Location: {{location}}
Crop Type: {{cropType}}
Weather Forecast: {{weatherForecast}}

Consider any potential risks or challenges and provide additional considerations to maximize yield.";

const YIELD_PREDICTION: &str = "\
You are an expert agricultural advisor. Based on the provided information, predict the crop yield and \
provide actionable insights for improvement. Respond in this language: {{language}}.

Crop Type: {{cropType}}
Location: {{location}}
Historical Data: {{historicalData}}
Current Conditions: {{currentConditions}}
Farming Practices: {{farmingPractices}}

Consider the following when providing insights:
- Optimal planting and harvesting times
- Irrigation strategies
- Fertilization techniques
- Pest and disease management
- Soil health improvements";

const WEATHER_ADVICE: &str = "\
You are an expert agricultural advisor for farmers in Pakistan.
Your response MUST be in this language: {{language}}.

Analyze the following weather forecast for {{location}}:
{{forecast}}

Based on the forecast, provide a summary and actionable advice.";

const FORMAT_DIRECTIVE: &str = "\
You MUST format your response as a single, valid JSON object, like this example:";

const FORMAT_TRAILER: &str = "Do not add any text or formatting before or after the JSON object.";

impl PromptTemplate {
    pub const ALL: [PromptTemplate; 3] = [
        PromptTemplate::CropTiming,
        PromptTemplate::YieldPrediction,
        PromptTemplate::WeatherAdvice,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PromptTemplate::CropTiming => "cropTimingSuggestions",
            PromptTemplate::YieldPrediction => "yieldPrediction",
            PromptTemplate::WeatherAdvice => "weatherBasedAdvice",
        }
    }

    fn source(&self) -> &'static str {
        match self {
            PromptTemplate::CropTiming => CROP_TIMING,
            PromptTemplate::YieldPrediction => YIELD_PREDICTION,
            PromptTemplate::WeatherAdvice => WEATHER_ADVICE,
        }
    }

    /// Schema the model's answer to this template must satisfy
    pub fn schema(&self) -> OutputSchema {
        match self {
            PromptTemplate::CropTiming => CropTimingAdvice::SCHEMA,
            PromptTemplate::YieldPrediction => YieldPrediction::SCHEMA,
            PromptTemplate::WeatherAdvice => WeatherAdvice::SCHEMA,
        }
    }

    /// Bindings supplied by the template itself rather than the user.
    fn fixed_bindings(&self) -> Vec<(&'static str, String)> {
        match self {
            PromptTemplate::WeatherAdvice => vec![("forecast", forecast::forecast_payload())],
            _ => Vec::new(),
        }
    }

    /// Render this template for `input`.
    pub fn render(&self, input: &impl PromptBindings) -> Result<String, PromptError> {
        let mut values: BTreeMap<&str, String> = input.bindings().into_iter().collect();
        values.extend(self.fixed_bindings());

        let body = substitute(self.name(), self.source(), &values)?;
        let language = values.get("language").map(String::as_str).unwrap_or("English");

        Ok(format!(
            "{body}\n\n{FORMAT_DIRECTIVE}\n{}\n\n{FORMAT_TRAILER}\n",
            self.schema().example(language)
        ))
    }
}

impl std::fmt::Display for PromptTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Replace every `{{name}}` in `source`. Bound values are inserted verbatim
/// and never rescanned, so user text containing braces is safe.
fn substitute(
    template: &'static str,
    source: &str,
    values: &BTreeMap<&str, String>,
) -> Result<String, PromptError> {
    let mut out = String::with_capacity(source.len() + 256);
    let mut rest = source;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find("}}")
            .ok_or(PromptError::Unterminated { template })?;
        let key = after[..end].trim();
        let value = values.get(key).ok_or_else(|| PromptError::MissingBinding {
            template,
            placeholder: key.to_string(),
        })?;
        out.push_str(value);
        rest = &after[end + 2..];
    }
    out.push_str(rest);

    Ok(out)
}
