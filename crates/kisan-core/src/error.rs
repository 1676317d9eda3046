//! Error types for Kisan Core
//!
//! Each stage of the advisory pipeline owns its error type; they roll up into
//! [`AdvisoryError`] so the orchestrator can convert every failure into an
//! [`OperationOutcome`](crate::orchestrator::OperationOutcome) in one place.

use thiserror::Error;

pub use crate::validation::ValidationErrors;

/// Result type alias for Kisan operations
pub type Result<T> = std::result::Result<T, AdvisoryError>;

/// Main error type for the advisory pipeline
#[derive(Error, Debug)]
pub enum AdvisoryError {
    /// Input failed its field rules
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    /// Prompt could not be rendered from the request record
    #[error("Prompt error: {0}")]
    Prompt(#[from] PromptError),

    /// External generation call failed or produced nothing
    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationFailure),

    /// External generation call produced output that does not match its schema
    #[error("Generation shape error: {0}")]
    Shape(#[from] GenerationShapeError),

    /// PCM could not be packaged into an audio container
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AdvisoryError {
    /// Short label used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Prompt(_) => "prompt",
            Self::Generation(_) => "generation_failure",
            Self::Shape(_) => "generation_shape",
            Self::Audio(_) => "audio",
            Self::Config(_) => "config",
        }
    }
}

/// Errors raised while binding a prompt template
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PromptError {
    #[error("Template {template} references unbound placeholder `{placeholder}`")]
    MissingBinding {
        template: &'static str,
        placeholder: String,
    },

    #[error("Template {template} has an unterminated placeholder")]
    Unterminated { template: &'static str },
}

/// Uniform failure of an external generation call.
///
/// Empty responses, transport errors, and provider errors all collapse into
/// this one type; the variant is kept for diagnostics only.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationFailure {
    #[error("model returned no output")]
    Empty,

    #[error("request to generation provider failed: {0}")]
    Transport(String),

    #[error("generation provider error ({status}): {body}")]
    Provider { status: u16, body: String },

    #[error("could not decode provider response: {0}")]
    Decode(String),
}

/// Model output did not satisfy the declared output schema
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{schema} output {problem}")]
pub struct GenerationShapeError {
    /// Name of the schema the output was checked against
    pub schema: &'static str,
    /// What was wrong with it
    pub problem: ShapeProblem,
    /// The offending payload, kept for diagnostics
    pub raw: serde_json::Value,
}

/// Specific reason a payload failed coercion
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeProblem {
    #[error("is not a JSON object")]
    NotAnObject,

    #[error("is missing field `{0}`")]
    MissingField(&'static str),

    #[error("has non-string field `{0}`")]
    WrongType(&'static str),

    #[error("has empty field `{0}`")]
    EmptyField(&'static str),
}

/// Errors produced while packaging PCM into a WAVE container
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("PCM buffer of {len} bytes is not a whole number of {width}-byte samples")]
    TruncatedSample { len: usize, width: usize },

    #[error("unsupported sample width: {0} bits")]
    UnsupportedBitDepth(u16),

    #[error("invalid data URI: {0}")]
    InvalidDataUri(String),

    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("WAVE error: {0}")]
    Wav(#[from] hound::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no Gemini API key found (set GEMINI_API_KEY or GOOGLE_API_KEY)")]
    MissingApiKey,

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_error_display_names_field() {
        let err = GenerationShapeError {
            schema: "CropTimingAdvice",
            problem: ShapeProblem::MissingField("plantingTime"),
            raw: serde_json::json!({}),
        };
        assert_eq!(
            err.to_string(),
            "CropTimingAdvice output is missing field `plantingTime`"
        );
    }

    #[test]
    fn test_kind_distinguishes_failure_and_shape() {
        let failure = AdvisoryError::from(GenerationFailure::Empty);
        let shape = AdvisoryError::from(GenerationShapeError {
            schema: "YieldPrediction",
            problem: ShapeProblem::NotAnObject,
            raw: serde_json::Value::Null,
        });
        assert_eq!(failure.kind(), "generation_failure");
        assert_eq!(shape.kind(), "generation_shape");
    }
}
