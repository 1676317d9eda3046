//! Output coercion
//!
//! Checks a raw model payload against the declared [`OutputSchema`] before it
//! is decoded into a typed result. Missing, non-string or empty fields are
//! errors; nothing is defaulted.

use serde_json::Value;

use crate::error::{GenerationShapeError, ShapeProblem};
use crate::schema::{AdvisoryOutput, OutputSchema};

/// Verify `raw` satisfies `schema`.
pub fn check_shape(schema: &OutputSchema, raw: &Value) -> Result<(), GenerationShapeError> {
    let fail = |problem| GenerationShapeError {
        schema: schema.name,
        problem,
        raw: raw.clone(),
    };

    let object = raw.as_object().ok_or_else(|| fail(ShapeProblem::NotAnObject))?;

    for field in schema.fields {
        match object.get(field.name) {
            None | Some(Value::Null) => return Err(fail(ShapeProblem::MissingField(field.name))),
            Some(Value::String(s)) if s.trim().is_empty() => {
                return Err(fail(ShapeProblem::EmptyField(field.name)))
            }
            Some(Value::String(_)) => {}
            Some(_) => return Err(fail(ShapeProblem::WrongType(field.name))),
        }
    }

    Ok(())
}

/// Check `raw` against `T::SCHEMA` and decode it.
pub fn coerce<T: AdvisoryOutput>(raw: Value) -> Result<T, GenerationShapeError> {
    check_shape(&T::SCHEMA, &raw)?;
    // Shape already verified; a decode failure here means the record and its
    // schema disagree, which is still reported as a shape error.
    serde_json::from_value::<T>(raw.clone()).map_err(|_| GenerationShapeError {
        schema: T::SCHEMA.name,
        problem: ShapeProblem::NotAnObject,
        raw,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CropTimingAdvice, WeatherAdvice};
    use serde_json::json;

    #[test]
    fn test_accepts_complete_payload() {
        let advice: CropTimingAdvice = coerce(json!({
            "plantingTime": "Early November",
            "harvestingTime": "Mid April",
            "considerations": "Watch for aphids",
        }))
        .unwrap();
        assert_eq!(advice.planting_time, "Early November");
        assert_eq!(advice.considerations, "Watch for aphids");
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let advice: WeatherAdvice = coerce(json!({
            "forecastSummary": "Hot week, rain Wednesday",
            "advice": "Delay spraying until Thursday",
            "confidence": 0.8,
        }))
        .unwrap();
        assert_eq!(advice.advice, "Delay spraying until Thursday");
    }

    #[test]
    fn test_missing_field_reports_raw_payload() {
        let raw = json!({ "plantingTime": "Early November", "harvestingTime": "Mid April" });
        let err = coerce::<CropTimingAdvice>(raw.clone()).unwrap_err();
        assert_eq!(err.problem, ShapeProblem::MissingField("considerations"));
        assert_eq!(err.schema, "CropTimingAdvice");
        assert_eq!(err.raw, raw);
    }

    #[test]
    fn test_null_field_counts_as_missing() {
        let err = coerce::<WeatherAdvice>(json!({ "forecastSummary": "Dry", "advice": null }))
            .unwrap_err();
        assert_eq!(err.problem, ShapeProblem::MissingField("advice"));
    }

    #[test]
    fn test_non_string_field_rejected() {
        let err = coerce::<WeatherAdvice>(json!({ "forecastSummary": ["Dry"], "advice": "Irrigate" }))
            .unwrap_err();
        assert_eq!(err.problem, ShapeProblem::WrongType("forecastSummary"));
    }

    #[test]
    fn test_blank_field_rejected() {
        let err = coerce::<WeatherAdvice>(json!({ "forecastSummary": "Dry", "advice": "  " }))
            .unwrap_err();
        assert_eq!(err.problem, ShapeProblem::EmptyField("advice"));
    }

    #[test]
    fn test_fenced_text_is_not_extracted() {
        let raw = Value::String("```json\n{\"advice\": \"x\"}\n```".into());
        let err = coerce::<WeatherAdvice>(raw).unwrap_err();
        assert_eq!(err.problem, ShapeProblem::NotAnObject);
    }
}
