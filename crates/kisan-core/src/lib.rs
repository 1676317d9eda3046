//! Kisan Core - Advisory orchestration for farmers
//!
//! Kisan Core turns a farmer's request into structured, localized advice from
//! a hosted generative model, and turns advice text into playable speech.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Advisor                              │
//! │  suggest_crop_timing · predict_yield · get_weather_advice    │
//! │                     synthesize_speech                        │
//! ├──────────────┬──────────────┬───────────────┬────────────────┤
//! │  validation  │    prompt    │   generation  │    coerce      │
//! │  field rules │  templates + │  TextGenerator│  schema check  │
//! │  per request │  JSON format │  SpeechGen.   │  → typed record│
//! ├──────────────┴──────────────┴───────┬───────┴────────────────┤
//! │  voice (language → voice)           │  audio (PCM → WAV URI) │
//! └─────────────────────────────────────┴────────────────────────┘
//! ```
//!
//! Every operation returns an [`OperationOutcome`]: either the typed record or
//! a short user-facing message. Errors never escape the orchestrator.
//!
//! # Quick Start
//!
//! ```no_run
//! use kisan_core::{Advisor, AdvisorConfig, CropTimingRequest};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AdvisorConfig::load(None)?;
//! let advisor = Advisor::from_config(&config)?;
//!
//! let outcome = advisor
//!     .suggest_crop_timing(CropTimingRequest {
//!         crop_type: "Wheat".into(),
//!         location: "Lahore".into(),
//!         weather_forecast: "Sunny, 30°C for 10 days".into(),
//!         language: "Urdu".into(),
//!     })
//!     .await;
//!
//! println!("{}", serde_json::to_string_pretty(&outcome)?);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(rust_2018_idioms, missing_debug_implementations, clippy::all)]

pub mod audio;
pub mod coerce;
pub mod config;
pub mod error;
pub mod forecast;
pub mod generation;
pub mod orchestrator;
pub mod playback;
pub mod prompt;
pub mod requests;
pub mod schema;
pub mod validation;
pub mod voice;

// Re-export commonly used types for convenience
pub use audio::{PcmFormat, WAV_MIME};
pub use config::AdvisorConfig;
pub use error::{
    AdvisoryError, AudioError, ConfigError, GenerationFailure, GenerationShapeError, PromptError,
    Result,
};
pub use generation::{GeminiClient, GeneratedAudio, SpeechGenerator, TextGenerator};
pub use orchestrator::{Advisor, Operation, OperationOutcome, INVALID_INPUT};
pub use playback::{AudioPlaybackError, PlaybackEffect, PlaybackEvent, PlaybackState, SpeechPlayback};
pub use prompt::PromptTemplate;
pub use requests::{CropTimingRequest, SpeechRequest, WeatherAdviceRequest, YieldPredictionRequest};
pub use schema::{AdvisoryOutput, CropTimingAdvice, SpeechResult, WeatherAdvice, YieldPrediction};
pub use validation::{validate, Validated, ValidationErrors};
pub use voice::{SpeechConfig, DEFAULT_LANGUAGE_CODE};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
