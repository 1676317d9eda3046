//! PCM → WAVE → data URI
//!
//! Speech models return headerless little-endian PCM. Browsers need a
//! container, so the samples are wrapped in a RIFF/WAVE file and inlined as a
//! base64 data URI. [`decode_data_uri`] and [`decode_wav`] reverse both steps.

use std::io::Cursor;

use base64::{engine::general_purpose, Engine};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use serde::{Deserialize, Serialize};

use crate::error::AudioError;

pub const WAV_MIME: &str = "audio/wav";

/// Layout of a raw PCM buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PcmFormat {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

impl Default for PcmFormat {
    fn default() -> Self {
        Self {
            sample_rate: 24_000,
            channels: 1,
            bits_per_sample: 16,
        }
    }
}

impl PcmFormat {
    pub fn new(sample_rate: u32, channels: u16, bits_per_sample: u16) -> Self {
        Self {
            sample_rate,
            channels,
            bits_per_sample,
        }
    }

    /// Bytes per interleaved frame
    pub fn frame_width(&self) -> usize {
        usize::from(self.bits_per_sample / 8) * usize::from(self.channels)
    }

    /// Apply the `rate=` and `channels=` parameters of a provider MIME type
    /// such as `audio/L16;codec=pcm;rate=24000` on top of `self`.
    pub fn with_mime_params(mut self, mime: &str) -> Self {
        for param in mime.split(';').skip(1) {
            let Some((key, value)) = param.split_once('=') else {
                continue;
            };
            match key.trim().to_ascii_lowercase().as_str() {
                "rate" => {
                    if let Ok(rate) = value.trim().parse() {
                        self.sample_rate = rate;
                    }
                }
                "channels" => {
                    if let Ok(channels) = value.trim().parse() {
                        self.channels = channels;
                    }
                }
                _ => {}
            }
        }
        if let Some(bits) = mime
            .split(';')
            .next()
            .and_then(|base| base.trim().strip_prefix("audio/L"))
            .and_then(|bits| bits.parse().ok())
        {
            self.bits_per_sample = bits;
        }
        self
    }

    fn spec(&self) -> WavSpec {
        WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: self.bits_per_sample,
            sample_format: SampleFormat::Int,
        }
    }
}

/// Wrap little-endian PCM in a WAVE container.
pub fn encode_wav(pcm: &[u8], format: PcmFormat) -> Result<Vec<u8>, AudioError> {
    let width = format.frame_width();
    if !matches!(format.bits_per_sample, 16 | 32) {
        return Err(AudioError::UnsupportedBitDepth(format.bits_per_sample));
    }
    if width == 0 || pcm.len() % width != 0 {
        return Err(AudioError::TruncatedSample {
            len: pcm.len(),
            width,
        });
    }

    let mut wav = Vec::with_capacity(pcm.len() + 44);
    {
        let mut writer = WavWriter::new(Cursor::new(&mut wav), format.spec())?;
        match format.bits_per_sample {
            16 => {
                for chunk in pcm.chunks_exact(2) {
                    writer.write_sample(i16::from_le_bytes([chunk[0], chunk[1]]))?;
                }
            }
            _ => {
                for chunk in pcm.chunks_exact(4) {
                    writer.write_sample(i32::from_le_bytes([
                        chunk[0], chunk[1], chunk[2], chunk[3],
                    ]))?;
                }
            }
        }
        writer.finalize()?;
    }

    Ok(wav)
}

/// Read a WAVE container back into its format and little-endian PCM.
pub fn decode_wav(wav: &[u8]) -> Result<(PcmFormat, Vec<u8>), AudioError> {
    let mut reader = WavReader::new(Cursor::new(wav))?;
    let spec = reader.spec();
    let format = PcmFormat::new(spec.sample_rate, spec.channels, spec.bits_per_sample);

    let mut pcm = Vec::with_capacity(reader.len() as usize * usize::from(spec.bits_per_sample / 8));
    match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 16) => {
            for sample in reader.samples::<i16>() {
                pcm.extend_from_slice(&sample?.to_le_bytes());
            }
        }
        (SampleFormat::Int, 32) => {
            for sample in reader.samples::<i32>() {
                pcm.extend_from_slice(&sample?.to_le_bytes());
            }
        }
        (_, bits) => return Err(AudioError::UnsupportedBitDepth(bits)),
    }

    Ok((format, pcm))
}

/// `data:<mime>;base64,<payload>`
pub fn to_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, general_purpose::STANDARD.encode(bytes))
}

/// Split a base64 data URI into its MIME type and decoded bytes.
pub fn decode_data_uri(uri: &str) -> Result<(String, Vec<u8>), AudioError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| AudioError::InvalidDataUri("missing `data:` scheme".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| AudioError::InvalidDataUri("missing `,` separator".into()))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| AudioError::InvalidDataUri("payload is not base64".into()))?;

    let bytes = general_purpose::STANDARD.decode(payload)?;
    Ok((mime.to_string(), bytes))
}

/// PCM straight to a playable `audio/wav` data URI.
pub fn pcm_to_wav_data_uri(pcm: &[u8], format: PcmFormat) -> Result<String, AudioError> {
    let wav = encode_wav(pcm, format)?;
    Ok(to_data_uri(WAV_MIME, &wav))
}
