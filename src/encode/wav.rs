//! Canonical RIFF/WAVE serialization.
//!
//! Produces the fixed 44-byte-header PCM16 layout consumed at the system
//! boundary, and parses the same layout back for transcoding and tests.

use thiserror::Error;

use super::{AudioFormat, EncodedArtifact};
use crate::audio::AudioTrack;

const HEADER_LEN: usize = 44;

/// Errors that can occur while parsing a WAV stream.
#[derive(Debug, Error)]
pub enum WavError {
    #[error("WAV stream truncated: need at least {needed} bytes but got {got}")]
    Truncated { needed: usize, got: usize },

    #[error("Not a canonical RIFF/WAVE stream")]
    BadMagic,

    #[error("Unsupported WAV encoding: {0}")]
    Unsupported(String),
}

/// PCM16 contents recovered from a canonical WAV stream.
#[derive(Debug)]
pub struct WavPcm {
    /// One buffer of i16 samples per channel.
    pub channels: Vec<Vec<i16>>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl WavPcm {
    /// Number of channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of frames (samples per channel).
    pub fn frame_count(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }
}

/// Serialize a track to a canonical 44-byte-header RIFF/WAVE stream with
/// interleaved little-endian PCM16 data.
pub fn encode_wav(track: &AudioTrack) -> EncodedArtifact {
    let channel_count = track.channel_count() as u32;
    let sample_rate = track.sample_rate();
    let data_size = track.frame_count() as u32 * channel_count * 2;

    let mut bytes = Vec::with_capacity(HEADER_LEN + data_size as usize);

    // RIFF header
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_size).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");

    // fmt chunk
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes()); // chunk size
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM format
    bytes.extend_from_slice(&(channel_count as u16).to_le_bytes());
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&(sample_rate * channel_count * 2).to_le_bytes()); // byte rate
    bytes.extend_from_slice(&((channel_count * 2) as u16).to_le_bytes()); // block align
    bytes.extend_from_slice(&16u16.to_le_bytes()); // bits per sample

    // data chunk
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_size.to_le_bytes());

    for sample in track.to_interleaved() {
        bytes.extend_from_slice(&quantize(sample).to_le_bytes());
    }

    EncodedArtifact {
        data: bytes,
        format: AudioFormat::Wav,
    }
}

/// Map a float sample to i16.
///
/// Scaling is asymmetric (32768 below zero, 32767 at or above) so that ±1.0
/// reach the full i16 range without overflow.
fn quantize(sample: f32) -> i16 {
    let clamped = sample.clamp(-1.0, 1.0);
    if clamped < 0.0 {
        (clamped * 32768.0).round() as i16
    } else {
        (clamped * 32767.0).round() as i16
    }
}

/// Parse a canonical WAV stream produced by [`encode_wav`] back into PCM16
/// channel buffers.
pub fn parse_wav(bytes: &[u8]) -> Result<WavPcm, WavError> {
    if bytes.len() < HEADER_LEN {
        return Err(WavError::Truncated {
            needed: HEADER_LEN,
            got: bytes.len(),
        });
    }

    if &bytes[0..4] != b"RIFF"
        || &bytes[8..12] != b"WAVE"
        || &bytes[12..16] != b"fmt "
        || &bytes[36..40] != b"data"
    {
        return Err(WavError::BadMagic);
    }

    let audio_format = read_u16(bytes, 20);
    if audio_format != 1 {
        return Err(WavError::Unsupported(format!(
            "audio format tag {audio_format}, expected PCM"
        )));
    }
    let bits_per_sample = read_u16(bytes, 34);
    if bits_per_sample != 16 {
        return Err(WavError::Unsupported(format!(
            "{bits_per_sample} bits per sample, expected 16"
        )));
    }
    let channel_count = read_u16(bytes, 22) as usize;
    if channel_count == 0 {
        return Err(WavError::Unsupported("zero channels".into()));
    }

    let sample_rate = read_u32(bytes, 24);
    let data_size = (read_u32(bytes, 40) as usize).min(bytes.len() - HEADER_LEN);
    let frame_count = data_size / (channel_count * 2);

    let mut channels: Vec<Vec<i16>> = (0..channel_count)
        .map(|_| Vec::with_capacity(frame_count))
        .collect();
    for frame in 0..frame_count {
        for (channel_index, channel) in channels.iter_mut().enumerate() {
            let at = HEADER_LEN + (frame * channel_count + channel_index) * 2;
            channel.push(i16::from_le_bytes([bytes[at], bytes[at + 1]]));
        }
    }

    Ok(WavPcm {
        channels,
        sample_rate,
    })
}

fn read_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}
