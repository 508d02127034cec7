//! In-memory audio decoding using Symphonia.
//!
//! Supports WAV, MP3, FLAC, and AAC formats. Input arrives as raw file bytes
//! from the client; nothing here touches the filesystem.

use std::io::Cursor;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use thiserror::Error;

use super::track::AudioTrack;

/// Errors that can occur during audio decoding.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Unsupported or corrupt audio stream: {0}")]
    Format(#[from] symphonia::core::errors::Error),

    #[error("No audio track found in stream")]
    NoAudioTrack,

    #[error("Unknown sample rate")]
    UnknownSampleRate,

    #[error("Stream decoded to zero frames")]
    EmptyStream,
}

/// Decode raw file bytes into an [`AudioTrack`].
///
/// `name_hint` is the original file name, if known; its extension helps the
/// probe pick a demuxer. Samples are decoded to f32 normalized to -1.0..1.0
/// and de-interleaved into per-channel buffers.
pub fn decode_bytes(bytes: Vec<u8>, name_hint: Option<&str>) -> Result<AudioTrack, DecodeError> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = name_hint
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
    {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;

    let mut format = probed.format;

    // Find the first audio track
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(DecodeError::NoAudioTrack)?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or(DecodeError::UnknownSampleRate)?;
    let channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(2);

    let mut decoder =
        symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    // Decode all samples
    let mut samples = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(symphonia::core::errors::Error::ResetRequired) => {
                // Reset decoder and continue
                decoder.reset();
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(symphonia::core::errors::Error::DecodeError(_)) => {
                // Skip decode errors
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        // Initialize sample buffer on first decode
        if sample_buf.is_none() {
            let spec = *decoded.spec();
            let capacity = decoded.capacity() as u64;
            sample_buf = Some(SampleBuffer::new(capacity, spec));
        }

        if let Some(buf) = &mut sample_buf {
            buf.copy_interleaved_ref(decoded);
            samples.extend_from_slice(buf.samples());
        }
    }

    if samples.len() < channels {
        return Err(DecodeError::EmptyStream);
    }

    Ok(AudioTrack::from_interleaved(&samples, channels, sample_rate))
}
