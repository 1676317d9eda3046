use async_trait::async_trait;
use base64::{engine::general_purpose, Engine};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::{GeneratedAudio, SpeechGenerator, TextGenerator};
use crate::config::AdvisorConfig;
use crate::error::GenerationFailure;
use crate::schema::OutputSchema;
use crate::voice::SpeechConfig;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_SPEECH_MODEL: &str = "gemini-2.5-flash-preview-tts";

#[derive(Debug, Clone)]
pub struct GeminiClient {
    pub name: String,
    api_key: String,
    base_url: String,
    text_model: String,
    speech_model: String,
    temperature: f64,
    http_client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            name: format!("Gemini {}", DEFAULT_TEXT_MODEL),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            speech_model: DEFAULT_SPEECH_MODEL.to_string(),
            temperature: 0.3,
            http_client: reqwest::Client::new(),
        }
    }

    /// Build a client from loaded configuration. The key must already be
    /// present; [`AdvisorConfig::require_api_key`] reports its absence.
    pub fn from_config(config: &AdvisorConfig, api_key: impl Into<String>) -> Self {
        Self::new(api_key)
            .with_base_url(config.base_url.clone())
            .with_text_model(config.text_model.clone())
            .with_speech_model(config.speech_model.clone())
            .with_temperature(config.temperature)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_text_model(mut self, model: impl Into<String>) -> Self {
        self.text_model = model.into();
        self.name = format!("Gemini {}", self.text_model);
        self
    }

    pub fn with_speech_model(mut self, model: impl Into<String>) -> Self {
        self.speech_model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    async fn request_completion(
        &self,
        model: &str,
        request: &GeminiRequest,
    ) -> Result<GeminiResponse, GenerationFailure> {
        let response = self
            .http_client
            .post(self.endpoint(model))
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| GenerationFailure::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationFailure::Provider {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| GenerationFailure::Decode(e.to_string()))
    }

    fn text_request(&self, prompt: &str, schema: &OutputSchema) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent::user(prompt)],
            generation_config: GeminiGenerationConfig {
                temperature: Some(self.temperature),
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(response_schema(schema)),
                response_modalities: None,
                speech_config: None,
            },
        }
    }

    fn speech_request(&self, text: &str, config: &SpeechConfig) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent::user(text)],
            generation_config: GeminiGenerationConfig {
                temperature: None,
                response_mime_type: None,
                response_schema: None,
                response_modalities: Some(vec!["AUDIO".to_string()]),
                speech_config: Some(GeminiSpeechConfig::from(config)),
            },
        }
    }
}

/// Provider form of an output schema: every field a required STRING, with
/// property order pinned to declaration order.
fn response_schema(schema: &OutputSchema) -> Value {
    let properties: Map<String, Value> = schema
        .fields
        .iter()
        .map(|f| {
            (
                f.name.to_string(),
                json!({ "type": "STRING", "description": f.description }),
            )
        })
        .collect();
    let names: Vec<&str> = schema.field_names().collect();

    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": names,
        "propertyOrdering": names,
    })
}

/// First text part of the first candidate, parsed as JSON when possible.
/// Unparseable text is returned as a JSON string so the coercer can report it.
fn extract_json(response: &GeminiResponse) -> Option<Value> {
    let text = response
        .candidates
        .first()?
        .content
        .parts
        .iter()
        .find_map(|p| p.text.as_deref())?;

    if text.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())))
}

fn extract_audio(response: &GeminiResponse) -> Result<Option<GeneratedAudio>, GenerationFailure> {
    let Some(inline) = response
        .candidates
        .first()
        .and_then(|c| c.content.parts.iter().find_map(|p| p.inline_data.as_ref()))
    else {
        return Ok(None);
    };

    let pcm = general_purpose::STANDARD
        .decode(&inline.data)
        .map_err(|e| GenerationFailure::Decode(e.to_string()))?;
    if pcm.is_empty() {
        return Ok(None);
    }

    Ok(Some(GeneratedAudio {
        mime_type: inline.mime_type.clone(),
        pcm,
    }))
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

impl GeminiContent {
    fn user(text: &str) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![GeminiPart {
                text: Some(text.to_string()),
                inline_data: None,
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(
        default,
        rename = "inlineData",
        skip_serializing_if = "Option::is_none"
    )]
    inline_data: Option<GeminiInlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiInlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speech_config: Option<GeminiSpeechConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiSpeechConfig {
    language_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    voice_config: Option<GeminiVoiceConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiVoiceConfig {
    prebuilt_voice_config: GeminiPrebuiltVoice,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPrebuiltVoice {
    voice_name: String,
}

impl From<&SpeechConfig> for GeminiSpeechConfig {
    fn from(config: &SpeechConfig) -> Self {
        Self {
            language_code: config.language_code.clone(),
            voice_config: config.voice_name.as_ref().map(|voice| GeminiVoiceConfig {
                prebuilt_voice_config: GeminiPrebuiltVoice {
                    voice_name: voice.clone(),
                },
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(
        &self,
        prompt: &str,
        schema: &OutputSchema,
    ) -> Result<Option<Value>, GenerationFailure> {
        tracing::debug!(model = %self.text_model, schema = schema.name, "requesting structured completion");
        let request = self.text_request(prompt, schema);
        let response = self.request_completion(&self.text_model, &request).await?;
        Ok(extract_json(&response))
    }
}

#[async_trait]
impl SpeechGenerator for GeminiClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn synthesize(
        &self,
        text: &str,
        config: &SpeechConfig,
    ) -> Result<Option<GeneratedAudio>, GenerationFailure> {
        tracing::debug!(
            model = %self.speech_model,
            language = %config.language_code,
            voice = config.voice_name.as_deref().unwrap_or("provider default"),
            "requesting speech"
        );
        let request = self.speech_request(text, config);
        let response = self.request_completion(&self.speech_model, &request).await?;
        extract_audio(&response)
    }
}
