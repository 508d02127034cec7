//! Encoded artifact model and encoders.
//!
//! This module provides:
//! - The [`EncodedArtifact`] byte-stream + format-tag model
//! - Canonical RIFF/WAVE (PCM16) encoding and parsing
//! - MP3 transcoding through an injected capability, with WAV fallback

pub mod mp3;
pub mod wav;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use thiserror::Error;

// Re-export commonly used types
#[cfg(feature = "mp3-lame")]
pub use mp3::LameMp3;
pub use mp3::{transcode_wav, Mp3Capability, Mp3Error, Mp3Session, MP3_BLOCK_FRAMES};
pub use wav::{encode_wav, parse_wav, WavError, WavPcm};

/// Container format of an encoded artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Wav,
    Mp3,
}

impl AudioFormat {
    /// File extension for the format, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "wav",
            AudioFormat::Mp3 => "mp3",
        }
    }
}

/// A finished encoded byte stream plus its container tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedArtifact {
    /// Encoded bytes.
    pub data: Vec<u8>,
    /// Container format of `data`.
    pub format: AudioFormat,
}

impl EncodedArtifact {
    /// Encoded size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the artifact holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// The bytes travel out of band (download blob); the serialized form carries
// metadata only.
impl Serialize for EncodedArtifact {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("EncodedArtifact", 2)?;
        state.serialize_field("format", &self.format)?;
        state.serialize_field("size", &self.data.len())?;
        state.end()
    }
}

/// Non-fatal encoding downgrades reported alongside a usable artifact.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EncodeWarning {
    /// MP3 capability missing or failed; the WAV artifact was kept.
    #[error("MP3 encoding unavailable ({reason}); keeping WAV output")]
    Mp3Fallback { reason: String },

    /// Requested container is not supported; the WAV artifact was kept.
    #[error("{format} output is not supported; keeping WAV output")]
    UnsupportedFormat { format: String },
}
