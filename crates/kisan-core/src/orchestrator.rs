//! Advisory orchestrator
//!
//! One method per use case. Each method validates its request, renders the
//! prompt, makes a single generation call, coerces the output, and returns an
//! [`OperationOutcome`]. Failures never escape: they are logged with their
//! kind and converted to a fixed, user-facing message.
//!
//! ```text
//! request ──► validate ──► render prompt ──► generate ──► coerce ──► Success
//!                │                              │            │
//!                └──► "Invalid input."          └────────────┴──► use-case error
//! ```

use serde::Serialize;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use crate::audio::{self, PcmFormat};
use crate::coerce::coerce;
use crate::config::AdvisorConfig;
use crate::error::{AdvisoryError, ConfigError, GenerationFailure, Result};
use crate::generation::{GeminiClient, SpeechGenerator, TextGenerator};
use crate::prompt::{PromptBindings, PromptTemplate};
use crate::requests::{CropTimingRequest, SpeechRequest, WeatherAdviceRequest, YieldPredictionRequest};
use crate::schema::{AdvisoryOutput, CropTimingAdvice, SpeechResult, WeatherAdvice, YieldPrediction};
use crate::validation::{validate, Validate, Validated};
use crate::voice::SpeechConfig;

/// Message returned for any request that fails validation
pub const INVALID_INPUT: &str = "Invalid input.";

/// All-or-nothing result of an orchestrated operation.
///
/// Serializes as `{"success": …}` or `{"error": "…"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationOutcome<T> {
    Success(T),
    Error(String),
}

impl<T> OperationOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, OperationOutcome::Success(_))
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            OperationOutcome::Success(value) => Some(value),
            OperationOutcome::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            OperationOutcome::Success(_) => None,
            OperationOutcome::Error(message) => Some(message),
        }
    }

    pub fn into_result(self) -> std::result::Result<T, String> {
        match self {
            OperationOutcome::Success(value) => Ok(value),
            OperationOutcome::Error(message) => Err(message),
        }
    }
}

/// The operations exposed to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    SuggestCropTiming,
    PredictYield,
    GetWeatherAdvice,
    SynthesizeSpeech,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::SuggestCropTiming => "suggest_crop_timing",
            Operation::PredictYield => "predict_yield",
            Operation::GetWeatherAdvice => "get_weather_advice",
            Operation::SynthesizeSpeech => "synthesize_speech",
        }
    }

    /// User-facing message when the operation fails after validation
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::SuggestCropTiming => {
                "An error occurred while getting suggestions. Please try again."
            }
            Operation::PredictYield => "An error occurred while predicting yield. Please try again.",
            Operation::GetWeatherAdvice => {
                "An error occurred while getting weather advice. Please try again."
            }
            Operation::SynthesizeSpeech => "Failed to generate audio. Please try again.",
        }
    }
}

/// Entry point for all advisory operations
#[derive(Clone)]
pub struct Advisor {
    text: Arc<dyn TextGenerator>,
    speech: Arc<dyn SpeechGenerator>,
    pcm: PcmFormat,
}

impl std::fmt::Debug for Advisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Advisor")
            .field("text", &self.text.name())
            .field("speech", &self.speech.name())
            .field("pcm", &self.pcm)
            .finish()
    }
}

impl Advisor {
    pub fn new(text: Arc<dyn TextGenerator>, speech: Arc<dyn SpeechGenerator>) -> Self {
        Self {
            text,
            speech,
            pcm: PcmFormat::default(),
        }
    }

    /// Gemini for both text and speech, configured from `config`.
    pub fn from_config(config: &AdvisorConfig) -> std::result::Result<Self, ConfigError> {
        let api_key = config.require_api_key()?;
        let client = Arc::new(GeminiClient::from_config(config, api_key));
        Ok(Self::new(client.clone(), client).with_pcm_format(config.pcm))
    }

    /// PCM layout assumed when the speech model's MIME type does not say
    pub fn with_pcm_format(mut self, pcm: PcmFormat) -> Self {
        self.pcm = pcm;
        self
    }

    pub async fn suggest_crop_timing(
        &self,
        request: CropTimingRequest,
    ) -> OperationOutcome<CropTimingAdvice> {
        self.advise(Operation::SuggestCropTiming, PromptTemplate::CropTiming, request)
            .await
    }

    pub async fn predict_yield(
        &self,
        request: YieldPredictionRequest,
    ) -> OperationOutcome<YieldPrediction> {
        self.advise(Operation::PredictYield, PromptTemplate::YieldPrediction, request)
            .await
    }

    pub async fn get_weather_advice(
        &self,
        request: WeatherAdviceRequest,
    ) -> OperationOutcome<WeatherAdvice> {
        self.advise(Operation::GetWeatherAdvice, PromptTemplate::WeatherAdvice, request)
            .await
    }

    pub async fn synthesize_speech(&self, request: SpeechRequest) -> OperationOutcome<SpeechResult> {
        let operation = Operation::SynthesizeSpeech;
        let span = tracing::info_span!("advisory", operation = operation.name(), request_id = %Uuid::new_v4());

        async move {
            let request = match checked(request) {
                Ok(request) => request,
                Err(outcome) => return outcome,
            };
            conclude(operation, self.speak(&request).await)
        }
        .instrument(span)
        .await
    }

    async fn advise<R, T>(
        &self,
        operation: Operation,
        template: PromptTemplate,
        request: R,
    ) -> OperationOutcome<T>
    where
        R: Validate + PromptBindings,
        T: AdvisoryOutput,
    {
        let span = tracing::info_span!("advisory", operation = operation.name(), request_id = %Uuid::new_v4());

        async move {
            let request = match checked(request) {
                Ok(request) => request,
                Err(outcome) => return outcome,
            };
            conclude(operation, self.generate_advice::<R, T>(template, &request).await)
        }
        .instrument(span)
        .await
    }

    async fn generate_advice<R, T>(&self, template: PromptTemplate, request: &Validated<R>) -> Result<T>
    where
        R: PromptBindings,
        T: AdvisoryOutput,
    {
        let prompt = template.render(&**request)?;
        tracing::debug!(template = %template, provider = self.text.name(), chars = prompt.len(), "prompt rendered");

        let schema = T::SCHEMA;
        let raw = self
            .text
            .generate(&prompt, &schema)
            .await?
            .ok_or(GenerationFailure::Empty)?;

        Ok(coerce::<T>(raw)?)
    }

    async fn speak(&self, request: &Validated<SpeechRequest>) -> Result<SpeechResult> {
        let config = SpeechConfig::for_language(request.language_code.trim());

        let generated = self
            .speech
            .synthesize(&request.text, &config)
            .await?
            .ok_or(GenerationFailure::Empty)?;

        let format = self.pcm.with_mime_params(&generated.mime_type);
        tracing::debug!(
            bytes = generated.pcm.len(),
            sample_rate = format.sample_rate,
            mime = %generated.mime_type,
            "speech received"
        );

        let media = audio::pcm_to_wav_data_uri(&generated.pcm, format)?;
        Ok(SpeechResult { media })
    }
}

/// Validate or short-circuit with the invalid-input outcome.
fn checked<R: Validate, T>(request: R) -> std::result::Result<Validated<R>, OperationOutcome<T>> {
    validate(request).map_err(|errors| {
        let fields: Vec<_> = errors.fields().collect();
        tracing::debug!(fields = ?fields, "request rejected");
        OperationOutcome::Error(INVALID_INPUT.to_string())
    })
}

fn conclude<T>(operation: Operation, result: Result<T>) -> OperationOutcome<T> {
    match result {
        Ok(value) => {
            tracing::info!("operation succeeded");
            OperationOutcome::Success(value)
        }
        Err(error) => {
            log_failure(&error);
            OperationOutcome::Error(operation.failure_message().to_string())
        }
    }
}

fn log_failure(error: &AdvisoryError) {
    match error {
        AdvisoryError::Shape(shape) => {
            tracing::warn!(kind = error.kind(), raw = %shape.raw, "{}", shape);
        }
        other => {
            tracing::error!(kind = other.kind(), "{}", other);
        }
    }
}
