//! Generation capability
//!
//! The advisory pipeline talks to the hosted model through two narrow traits.
//! Implementations perform exactly one provider call per invocation, hand the
//! raw output back untouched, and report every failure as a
//! [`GenerationFailure`]. Nothing here retries.

pub mod gemini;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::GenerationFailure;
use crate::schema::OutputSchema;
use crate::voice::SpeechConfig;

pub use gemini::GeminiClient;

/// Raw audio returned by a speech model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedAudio {
    /// MIME type reported by the provider, e.g. `audio/L16;codec=pcm;rate=24000`
    pub mime_type: String,
    /// Headerless little-endian PCM
    pub pcm: Vec<u8>,
}

/// Structured text generation
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Provider name, for logs
    fn name(&self) -> &str;

    /// Generate a JSON value for `prompt`, constrained to `schema`.
    ///
    /// `Ok(None)` means the provider answered but produced no output.
    async fn generate(
        &self,
        prompt: &str,
        schema: &OutputSchema,
    ) -> Result<Option<Value>, GenerationFailure>;
}

/// Speech generation
#[async_trait]
pub trait SpeechGenerator: Send + Sync {
    fn name(&self) -> &str;

    /// Speak `text` with the given voice configuration.
    ///
    /// `Ok(None)` means the provider answered without any audio.
    async fn synthesize(
        &self,
        text: &str,
        config: &SpeechConfig,
    ) -> Result<Option<GeneratedAudio>, GenerationFailure>;
}
