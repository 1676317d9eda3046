//! Advisor configuration
//!
//! Defaults, overlaid by an optional TOML file, overlaid by the environment.
//! `.env` files are honoured through `dotenvy`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::audio::PcmFormat;
use crate::error::ConfigError;
use crate::generation::gemini::{DEFAULT_BASE_URL, DEFAULT_SPEECH_MODEL, DEFAULT_TEXT_MODEL};

/// Environment variables consulted for the API key, in order
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// Gemini API key. Usually supplied through the environment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Provider base URL
    pub base_url: String,

    /// Model used for structured advice
    pub text_model: String,

    /// Model used for speech synthesis
    pub speech_model: String,

    /// Sampling temperature for advice
    pub temperature: f64,

    /// PCM layout assumed when the speech model does not state one
    pub pcm: PcmFormat,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            speech_model: DEFAULT_SPEECH_MODEL.to_string(),
            temperature: 0.3,
            pcm: PcmFormat::default(),
        }
    }
}

impl AdvisorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Load a TOML file on top of the defaults.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Defaults → optional file → `.env` → process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };

        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!("Ignoring unreadable .env file: {}", e);
            }
        }

        config.apply_env(|key| std::env::var(key).ok())
    }

    /// Overlay values from an environment lookup.
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = API_KEY_VARS.iter().find_map(|var| lookup(*var)) {
            self.api_key = Some(key);
        }
        if let Some(model) = lookup("KISAN_TEXT_MODEL") {
            self.text_model = model;
        }
        if let Some(model) = lookup("KISAN_SPEECH_MODEL") {
            self.speech_model = model;
        }
        if let Some(url) = lookup("KISAN_GEMINI_BASE_URL") {
            self.base_url = url;
        }
        if let Some(raw) = lookup("KISAN_TEMPERATURE") {
            self.temperature = raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "KISAN_TEMPERATURE".to_string(),
                value: raw.clone(),
            })?;
        }
        Ok(self)
    }

    /// The API key, or an error naming the variables that were checked.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AdvisorConfig::default();
        assert_eq!(config.speech_model, DEFAULT_SPEECH_MODEL);
        assert_eq!(config.pcm, PcmFormat::new(24_000, 1, 16));
        assert!(config.require_api_key().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let config = AdvisorConfig::default()
            .apply_env(env(&[
                ("GOOGLE_API_KEY", "google-key"),
                ("KISAN_TEXT_MODEL", "gemini-2.0-flash"),
                ("KISAN_TEMPERATURE", "0.7"),
            ]))
            .unwrap();
        assert_eq!(config.require_api_key().unwrap(), "google-key");
        assert_eq!(config.text_model, "gemini-2.0-flash");
        assert_eq!(config.temperature, 0.7);
    }

    #[test]
    fn test_gemini_key_wins_over_google_key() {
        let config = AdvisorConfig::default()
            .apply_env(env(&[("GEMINI_API_KEY", "a"), ("GOOGLE_API_KEY", "b")]))
            .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("a"));
    }

    #[test]
    fn test_bad_temperature_rejected() {
        let err = AdvisorConfig::default()
            .apply_env(env(&[("KISAN_TEMPERATURE", "warm")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_blank_key_is_missing() {
        let config = AdvisorConfig::new().with_api_key("  ");
        assert!(matches!(
            config.require_api_key(),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn test_partial_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "speech_model = \"custom-tts\"\n\n[pcm]\nsample_rate = 16000\nchannels = 1\nbits_per_sample = 16"
        )
        .unwrap();

        let config = AdvisorConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.speech_model, "custom-tts");
        assert_eq!(config.text_model, DEFAULT_TEXT_MODEL);
        assert_eq!(config.pcm.sample_rate, 16_000);
    }
}
