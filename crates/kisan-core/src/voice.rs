//! Voice selection and supported languages
//!
//! Both tables are plain static slices so they can be enumerated in tests and
//! surfaced to clients without any branching logic.

use serde::Serialize;

/// Speech language used when a request does not name one
pub const DEFAULT_LANGUAGE_CODE: &str = "ur-PK";

/// Preferred synthetic voice per language-region code.
pub const VOICE_MAP: &[(&str, &str)] = &[
    ("ur-PK", "ur-PK-Standard-A"),
    ("pa-IN", "pa-IN-Wavenet-A"),
    ("sd-IN", "sd-IN-Standard-A"),
];

/// Response languages offered to farmers, with their speech codes.
pub const LANGUAGES: &[Language] = &[
    Language::new("ur-PK", "Urdu"),
    Language::new("pa-IN", "Punjabi"),
    Language::new("sd-IN", "Sindhi"),
    Language::new("ps-AF", "Pashto"),
    Language::new("en-US", "English"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Language {
    pub code: &'static str,
    pub label: &'static str,
}

impl Language {
    const fn new(code: &'static str, label: &'static str) -> Self {
        Self { code, label }
    }
}

/// Language label for a speech code, e.g. `"ur-PK"` → `"Urdu"`.
pub fn language_label(code: &str) -> Option<&'static str> {
    LANGUAGES.iter().find(|l| l.code == code).map(|l| l.label)
}

/// Mapped voice for a language code, if any.
pub fn voice_for(language_code: &str) -> Option<&'static str> {
    VOICE_MAP
        .iter()
        .find(|(code, _)| *code == language_code)
        .map(|(_, voice)| *voice)
}

/// Speech configuration passed to the speech generator.
///
/// `voice_name` is `None` for unmapped languages, leaving the choice of voice
/// to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechConfig {
    pub language_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_name: Option<String>,
}

impl SpeechConfig {
    pub fn for_language(language_code: &str) -> Self {
        Self {
            language_code: language_code.to_string(),
            voice_name: voice_for(language_code).map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_table() {
        let cases = [
            ("ur-PK", Some("ur-PK-Standard-A")),
            ("pa-IN", Some("pa-IN-Wavenet-A")),
            ("sd-IN", Some("sd-IN-Standard-A")),
            ("ps-AF", None),
            ("en-US", None),
            ("", None),
        ];
        for (code, voice) in cases {
            assert_eq!(voice_for(code), voice, "voice for {code:?}");
        }
    }

    #[test]
    fn test_every_mapped_voice_belongs_to_its_language() {
        for (code, voice) in VOICE_MAP {
            assert!(voice.starts_with(code), "{voice} does not match {code}");
        }
    }

    #[test]
    fn test_unmapped_language_omits_voice() {
        let config = SpeechConfig::for_language("ps-AF");
        assert_eq!(config.voice_name, None);
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json, serde_json::json!({ "languageCode": "ps-AF" }));
    }

    #[test]
    fn test_mapped_language_selects_voice() {
        let config = SpeechConfig::for_language("ur-PK");
        assert_eq!(config.voice_name.as_deref(), Some("ur-PK-Standard-A"));
    }

    #[test]
    fn test_language_labels() {
        assert_eq!(language_label("ps-AF"), Some("Pashto"));
        assert_eq!(language_label(DEFAULT_LANGUAGE_CODE), Some("Urdu"));
        assert_eq!(language_label("fr-FR"), None);
    }
}
