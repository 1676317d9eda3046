//! Speak-button state machine
//!
//! One [`SpeechPlayback`] per piece of text a farmer can listen to. The
//! machine is pure: [`SpeechPlayback::handle`] applies an event and returns the
//! side effect the presentation layer should perform, if any.
//!
//! ```text
//!            Activate                Generated
//!   Idle ───────────────► Generating ──────────► Playing ◄──┐
//!    ▲                        │                    │        │ Activate
//!    │ TextChanged            │ GenerationFailed   │ Ended  │
//!    │                        ▼                    ▼        │
//!    └──────────────────── Failed              Ready ───────┘
//! ```

use thiserror::Error;

use crate::audio::{self, PcmFormat};
use crate::error::AudioError;
use crate::orchestrator::{Advisor, OperationOutcome};
use crate::requests::SpeechRequest;
use crate::voice::DEFAULT_LANGUAGE_CODE;

/// Client-side failure to decode or play returned audio
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioPlaybackError {
    #[error("Audio could not be decoded: {0}")]
    Decode(String),

    #[error("Audio device error: {0}")]
    Device(String),
}

impl From<AudioError> for AudioPlaybackError {
    fn from(e: AudioError) -> Self {
        AudioPlaybackError::Decode(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Generating,
    Ready(String),
    Playing(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// User pressed the speak button
    Activate,
    Generated(String),
    GenerationFailed(String),
    PlaybackEnded,
    PlaybackFailed(AudioPlaybackError),
    Stop,
    TextChanged(String),
}

/// Work the presentation layer must carry out after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEffect {
    RequestSpeech(SpeechRequest),
    Play(String),
    StopAudio,
}

#[derive(Debug, Clone)]
pub struct SpeechPlayback {
    text: String,
    language_code: String,
    state: PlaybackState,
    cached: Option<String>,
}

impl SpeechPlayback {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language_code: DEFAULT_LANGUAGE_CODE.to_string(),
            state: PlaybackState::Idle,
            cached: None,
        }
    }

    pub fn with_language_code(mut self, code: impl Into<String>) -> Self {
        self.language_code = code.into();
        self
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Audio from the last successful generation for the current text
    pub fn cached_media(&self) -> Option<&str> {
        self.cached.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.state, PlaybackState::Generating | PlaybackState::Playing(_))
    }

    /// Apply `event` and return the effect to perform.
    pub fn handle(&mut self, event: PlaybackEvent) -> Option<PlaybackEffect> {
        let state = std::mem::replace(&mut self.state, PlaybackState::Idle);

        let (next, effect) = match (state, event) {
            (state, PlaybackEvent::Activate) if self.text.trim().is_empty() => (state, None),
            (state @ (PlaybackState::Generating | PlaybackState::Playing(_)), PlaybackEvent::Activate) => {
                (state, None)
            }
            (PlaybackState::Ready(uri), PlaybackEvent::Activate) => {
                (PlaybackState::Playing(uri.clone()), Some(PlaybackEffect::Play(uri)))
            }
            (_, PlaybackEvent::Activate) => match self.cached.clone() {
                Some(uri) => (PlaybackState::Playing(uri.clone()), Some(PlaybackEffect::Play(uri))),
                None => (
                    PlaybackState::Generating,
                    Some(PlaybackEffect::RequestSpeech(
                        SpeechRequest::new(self.text.clone()).with_language_code(self.language_code.clone()),
                    )),
                ),
            },

            (PlaybackState::Generating, PlaybackEvent::Generated(uri)) => {
                self.cached = Some(uri.clone());
                (PlaybackState::Playing(uri.clone()), Some(PlaybackEffect::Play(uri)))
            }
            (PlaybackState::Generating, PlaybackEvent::GenerationFailed(reason)) => {
                (PlaybackState::Failed(reason), None)
            }

            (PlaybackState::Playing(uri), PlaybackEvent::PlaybackEnded) => (PlaybackState::Ready(uri), None),
            (PlaybackState::Playing(_), PlaybackEvent::PlaybackFailed(error)) => {
                tracing::warn!(error = %error, "speech playback failed");
                self.cached = None;
                (PlaybackState::Failed(error.to_string()), None)
            }
            (PlaybackState::Playing(uri), PlaybackEvent::Stop) => {
                (PlaybackState::Ready(uri), Some(PlaybackEffect::StopAudio))
            }

            (state, PlaybackEvent::TextChanged(text)) => {
                self.text = text;
                self.cached = None;
                let effect = matches!(state, PlaybackState::Playing(_)).then_some(PlaybackEffect::StopAudio);
                (PlaybackState::Idle, effect)
            }

            // Late generation results and stray player callbacks
            (state, _) => (state, None),
        };

        self.state = next;
        effect
    }

    /// Drive an activation through `advisor`. Returns the effect left for the
    /// player, which is `Play` when audio is available.
    pub async fn activate(&mut self, advisor: &Advisor) -> Option<PlaybackEffect> {
        match self.handle(PlaybackEvent::Activate)? {
            PlaybackEffect::RequestSpeech(request) => {
                let event = match advisor.synthesize_speech(request).await {
                    OperationOutcome::Success(result) => PlaybackEvent::Generated(result.media),
                    OperationOutcome::Error(message) => PlaybackEvent::GenerationFailed(message),
                };
                self.handle(event)
            }
            effect => Some(effect),
        }
    }
}

/// Decode a media data URI into the PCM a player needs.
pub fn load_media(uri: &str) -> Result<(PcmFormat, Vec<u8>), AudioPlaybackError> {
    let (mime, bytes) = audio::decode_data_uri(uri)?;
    if mime != audio::WAV_MIME {
        return Err(AudioPlaybackError::Decode(format!("unsupported media type {}", mime)));
    }
    Ok(audio::decode_wav(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationFailure;
    use crate::generation::{GeneratedAudio, SpeechGenerator, TextGenerator};
    use crate::schema::OutputSchema;
    use crate::voice::SpeechConfig;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const URI: &str = "data:audio/wav;base64,AAAA";

    struct Silent;

    #[async_trait]
    impl TextGenerator for Silent {
        fn name(&self) -> &str {
            "silent"
        }

        async fn generate(&self, _: &str, _: &OutputSchema) -> Result<Option<Value>, GenerationFailure> {
            Ok(None)
        }
    }

    struct CountingSpeech {
        calls: AtomicUsize,
        audio: Option<GeneratedAudio>,
    }

    #[async_trait]
    impl SpeechGenerator for CountingSpeech {
        fn name(&self) -> &str {
            "counting"
        }

        async fn synthesize(
            &self,
            _: &str,
            _: &SpeechConfig,
        ) -> Result<Option<GeneratedAudio>, GenerationFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.audio.clone())
        }
    }

    fn advisor(audio: Option<GeneratedAudio>) -> (Advisor, Arc<CountingSpeech>) {
        let speech = Arc::new(CountingSpeech {
            calls: AtomicUsize::new(0),
            audio,
        });
        (Advisor::new(Arc::new(Silent), speech.clone()), speech)
    }

    fn tone() -> GeneratedAudio {
        GeneratedAudio {
            mime_type: "audio/L16;codec=pcm;rate=24000".into(),
            pcm: vec![0, 0, 16, 39, 240, 216, 0, 0],
        }
    }

    #[test]
    fn test_activate_requests_speech_once() {
        let mut playback = SpeechPlayback::new("Irrigate tonight").with_language_code("pa-IN");

        let effect = playback.handle(PlaybackEvent::Activate);
        assert_eq!(
            effect,
            Some(PlaybackEffect::RequestSpeech(
                SpeechRequest::new("Irrigate tonight").with_language_code("pa-IN")
            ))
        );
        assert_eq!(playback.state(), &PlaybackState::Generating);

        assert_eq!(playback.handle(PlaybackEvent::Activate), None);
        assert_eq!(playback.state(), &PlaybackState::Generating);
    }

    #[test]
    fn test_blank_text_is_noop() {
        let mut playback = SpeechPlayback::new("   ");
        assert_eq!(playback.handle(PlaybackEvent::Activate), None);
        assert_eq!(playback.state(), &PlaybackState::Idle);
    }

    #[test]
    fn test_replay_uses_cached_audio() {
        let mut playback = SpeechPlayback::new("Harvest in April");
        playback.handle(PlaybackEvent::Activate);
        assert_eq!(
            playback.handle(PlaybackEvent::Generated(URI.into())),
            Some(PlaybackEffect::Play(URI.into()))
        );
        assert_eq!(playback.handle(PlaybackEvent::Activate), None);

        playback.handle(PlaybackEvent::PlaybackEnded);
        assert_eq!(playback.state(), &PlaybackState::Ready(URI.into()));
        assert_eq!(
            playback.handle(PlaybackEvent::Activate),
            Some(PlaybackEffect::Play(URI.into()))
        );
    }

    #[test]
    fn test_stop_returns_to_ready() {
        let mut playback = SpeechPlayback::new("Harvest in April");
        playback.handle(PlaybackEvent::Activate);
        playback.handle(PlaybackEvent::Generated(URI.into()));

        assert_eq!(playback.handle(PlaybackEvent::Stop), Some(PlaybackEffect::StopAudio));
        assert_eq!(playback.state(), &PlaybackState::Ready(URI.into()));
    }

    #[test]
    fn test_stop_does_not_cancel_generation() {
        let mut playback = SpeechPlayback::new("Harvest in April");
        playback.handle(PlaybackEvent::Activate);
        assert_eq!(playback.handle(PlaybackEvent::Stop), None);
        assert_eq!(playback.state(), &PlaybackState::Generating);
    }

    #[test]
    fn test_text_change_discards_cache_and_late_result() {
        let mut playback = SpeechPlayback::new("old");
        playback.handle(PlaybackEvent::Activate);
        playback.handle(PlaybackEvent::TextChanged("new advice".into()));
        assert_eq!(playback.state(), &PlaybackState::Idle);

        assert_eq!(playback.handle(PlaybackEvent::Generated(URI.into())), None);
        assert_eq!(playback.cached_media(), None);
        assert_eq!(playback.text(), "new advice");
    }

    #[test]
    fn test_playback_failure_stays_local() {
        let mut playback = SpeechPlayback::new("Harvest in April");
        playback.handle(PlaybackEvent::Activate);
        playback.handle(PlaybackEvent::Generated(URI.into()));

        playback.handle(PlaybackEvent::PlaybackFailed(AudioPlaybackError::Device(
            "no output".into(),
        )));
        assert_eq!(
            playback.state(),
            &PlaybackState::Failed("Audio device error: no output".into())
        );
        assert!(matches!(
            playback.handle(PlaybackEvent::Activate),
            Some(PlaybackEffect::RequestSpeech(_))
        ));
    }

    #[test]
    fn test_activate_through_advisor_caches() {
        let (advisor, speech) = advisor(Some(tone()));
        let mut playback = SpeechPlayback::new("Spray before rain");

        let effect = tokio_test::block_on(playback.activate(&advisor));
        let Some(PlaybackEffect::Play(uri)) = effect else {
            panic!("expected play, got {:?}", effect);
        };
        let (format, pcm) = load_media(&uri).unwrap();
        assert_eq!(format.sample_rate, 24_000);
        assert_eq!(pcm, tone().pcm);

        playback.handle(PlaybackEvent::PlaybackEnded);
        tokio_test::block_on(playback.activate(&advisor));
        assert_eq!(speech.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_activate_through_advisor_failure() {
        let (advisor, _) = advisor(None);
        let mut playback = SpeechPlayback::new("Spray before rain");

        assert_eq!(tokio_test::block_on(playback.activate(&advisor)), None);
        assert_eq!(
            playback.state(),
            &PlaybackState::Failed("Failed to generate audio. Please try again.".into())
        );
    }

    #[test]
    fn test_load_media_rejects_other_types() {
        let uri = audio::to_data_uri("audio/mpeg", &[1, 2, 3]);
        assert!(matches!(load_media(&uri), Err(AudioPlaybackError::Decode(_))));
    }
}
