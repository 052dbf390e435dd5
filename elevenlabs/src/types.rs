//! Common types for the ElevenLabs API.

use serde::{Deserialize, Serialize};

use super::error::{Error, Result};

// ==================== Voice Settings ====================

/// Synthesis settings for a voice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    /// How closely the output should match the original voice (0.0-1.0).
    pub similarity_boost: f32,

    /// Stability of the voice across generations (0.0-1.0).
    pub stability: f32,

    /// Style exaggeration (0.0-1.0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<f32>,

    /// Boost similarity to the original speaker.
    #[serde(
        default,
        rename = "use_speaker_boost",
        skip_serializing_if = "Option::is_none"
    )]
    pub speaker_boost: Option<bool>,
}

// ==================== Output Format ====================

/// Audio output format for synthesis, as `codec_samplerate[_bitrate]`.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    #[serde(rename = "mp3_22050_32")]
    Mp3_22050_32,
    #[default]
    #[serde(rename = "mp3_44100_128")]
    Mp3_44100_128,
    #[serde(rename = "mp3_44100_192")]
    Mp3_44100_192,
    #[serde(rename = "pcm_16000")]
    Pcm16000,
    #[serde(rename = "pcm_22050")]
    Pcm22050,
    #[serde(rename = "pcm_24000")]
    Pcm24000,
    #[serde(rename = "pcm_44100")]
    Pcm44100,
    #[serde(rename = "ulaw_8000")]
    Ulaw8000,
}

impl OutputFormat {
    /// Every supported format.
    pub const ALL: [OutputFormat; 8] = [
        OutputFormat::Mp3_22050_32,
        OutputFormat::Mp3_44100_128,
        OutputFormat::Mp3_44100_192,
        OutputFormat::Pcm16000,
        OutputFormat::Pcm22050,
        OutputFormat::Pcm24000,
        OutputFormat::Pcm44100,
        OutputFormat::Ulaw8000,
    ];

    /// Returns the wire name of the format.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Mp3_22050_32 => "mp3_22050_32",
            OutputFormat::Mp3_44100_128 => "mp3_44100_128",
            OutputFormat::Mp3_44100_192 => "mp3_44100_192",
            OutputFormat::Pcm16000 => "pcm_16000",
            OutputFormat::Pcm22050 => "pcm_22050",
            OutputFormat::Pcm24000 => "pcm_24000",
            OutputFormat::Pcm44100 => "pcm_44100",
            OutputFormat::Ulaw8000 => "ulaw_8000",
        }
    }

    /// Returns the usual file extension for the format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Mp3_22050_32
            | OutputFormat::Mp3_44100_128
            | OutputFormat::Mp3_44100_192 => "mp3",
            OutputFormat::Ulaw8000 => "ulaw",
            _ => "pcm",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        OutputFormat::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| Error::Validation(format!("unknown output format: {}", s)))
    }
}
