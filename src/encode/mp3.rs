//! MP3 transcoding through an injected encoder capability.
//!
//! Perceptual encoding is not implemented here. The adapter slices PCM16
//! recovered from a WAV artifact into fixed blocks and feeds them to whatever
//! [`Mp3Capability`] the caller supplied. With no capability, or a failing
//! one, the WAV artifact passes through unchanged and the caller receives a
//! non-fatal warning.

use thiserror::Error;

use super::wav::{parse_wav, WavError};
use super::{AudioFormat, EncodeWarning, EncodedArtifact};

/// Samples fed to the encoder per channel and call (one MPEG-1 Layer III
/// granule pair).
pub const MP3_BLOCK_FRAMES: usize = 1152;

/// Errors raised by an MP3 capability. All of them are non-fatal at the
/// pipeline level: the WAV artifact is kept instead.
#[derive(Debug, Error)]
pub enum Mp3Error {
    #[error("MP3 encoder rejected session parameters: {0}")]
    Session(String),

    #[error("MP3 encoder failed: {0}")]
    Encode(String),

    #[error("MP3 encoding supports 1 or 2 channels, got {0}")]
    ChannelCount(usize),

    #[error(transparent)]
    Wav(#[from] WavError),
}

/// An injectable MP3 encoder backend.
///
/// The engine probes nothing at runtime; whoever constructs the pipeline
/// decides which capability, if any, is available.
pub trait Mp3Capability {
    /// Whether the capability can open sessions at all.
    fn is_available(&self) -> bool {
        true
    }

    /// Open an encoding session for the given stream parameters.
    fn open_session(
        &self,
        channel_count: u16,
        sample_rate: u32,
        bitrate_kbps: u32,
    ) -> Result<Box<dyn Mp3Session>, Mp3Error>;
}

/// One sequential encoding session.
pub trait Mp3Session {
    /// Encode one block of per-channel PCM16 samples. `right` is `None` for
    /// mono streams. May return an empty chunk while the encoder buffers.
    fn encode_block(&mut self, left: &[i16], right: Option<&[i16]>) -> Result<Vec<u8>, Mp3Error>;

    /// Drain whatever the encoder still holds. Called exactly once, last.
    fn flush(&mut self) -> Result<Vec<u8>, Mp3Error>;
}

/// Transcode a WAV artifact to MP3 via `capability`.
///
/// Returns the MP3 artifact on success. If the capability is absent,
/// unavailable, or fails at any point, returns the WAV artifact unchanged
/// together with a degraded-output warning.
pub fn transcode_wav(
    wav: &EncodedArtifact,
    bitrate_kbps: u32,
    capability: Option<&dyn Mp3Capability>,
) -> (EncodedArtifact, Option<EncodeWarning>) {
    let Some(capability) = capability.filter(|c| c.is_available()) else {
        log::warn!("No MP3 encoder available, keeping WAV output");
        return (
            wav.clone(),
            Some(EncodeWarning::Mp3Fallback {
                reason: "no MP3 encoder available".into(),
            }),
        );
    };

    match try_transcode(wav, bitrate_kbps, capability) {
        Ok(mp3) => (mp3, None),
        Err(err) => {
            log::warn!("MP3 encoding failed, keeping WAV output: {err}");
            (
                wav.clone(),
                Some(EncodeWarning::Mp3Fallback {
                    reason: err.to_string(),
                }),
            )
        }
    }
}

fn try_transcode(
    wav: &EncodedArtifact,
    bitrate_kbps: u32,
    capability: &dyn Mp3Capability,
) -> Result<EncodedArtifact, Mp3Error> {
    let pcm = parse_wav(&wav.data)?;
    let channel_count = pcm.channel_count();
    if channel_count > 2 {
        return Err(Mp3Error::ChannelCount(channel_count));
    }

    let mut session =
        capability.open_session(channel_count as u16, pcm.sample_rate, bitrate_kbps)?;

    let left = &pcm.channels[0];
    let frame_count = pcm.frame_count();
    let mut data = Vec::new();

    let mut start = 0;
    while start < frame_count {
        let end = (start + MP3_BLOCK_FRAMES).min(frame_count);
        let right = pcm.channels.get(1).map(|r| &r[start..end]);
        let chunk = session.encode_block(&left[start..end], right)?;
        if !chunk.is_empty() {
            data.extend_from_slice(&chunk);
        }
        start = end;
    }

    let tail = session.flush()?;
    if !tail.is_empty() {
        data.extend_from_slice(&tail);
    }

    Ok(EncodedArtifact {
        data,
        format: AudioFormat::Mp3,
    })
}

#[cfg(feature = "mp3-lame")]
mod lame {
    //! LAME-backed capability via `mp3lame-encoder`.

    use std::mem::MaybeUninit;

    use mp3lame_encoder::{Bitrate, Builder, DualPcm, Encoder, FlushNoGap, MonoPcm, Quality};

    use super::{Mp3Capability, Mp3Error, Mp3Session, MP3_BLOCK_FRAMES};

    /// MP3 capability backed by the bundled LAME encoder.
    pub struct LameMp3;

    impl Mp3Capability for LameMp3 {
        fn open_session(
            &self,
            channel_count: u16,
            sample_rate: u32,
            bitrate_kbps: u32,
        ) -> Result<Box<dyn Mp3Session>, Mp3Error> {
            let mut builder = Builder::new()
                .ok_or_else(|| Mp3Error::Session("failed to create LAME encoder".into()))?;

            builder
                .set_num_channels(channel_count as u8)
                .map_err(|e| Mp3Error::Session(format!("invalid channel count: {e:?}")))?;
            builder
                .set_sample_rate(sample_rate)
                .map_err(|e| Mp3Error::Session(format!("invalid sample rate: {e:?}")))?;
            builder
                .set_brate(nearest_bitrate(bitrate_kbps))
                .map_err(|e| Mp3Error::Session(format!("invalid bitrate: {e:?}")))?;
            builder
                .set_quality(Quality::Best)
                .map_err(|e| Mp3Error::Session(format!("invalid quality: {e:?}")))?;

            let encoder = builder
                .build()
                .map_err(|e| Mp3Error::Session(format!("failed to build encoder: {e:?}")))?;

            Ok(Box::new(LameSession { encoder }))
        }
    }

    /// LAME accepts discrete bitrates; pick the tier covering the request.
    fn nearest_bitrate(kbps: u32) -> Bitrate {
        match kbps {
            0..=96 => Bitrate::Kbps96,
            97..=112 => Bitrate::Kbps112,
            113..=128 => Bitrate::Kbps128,
            129..=160 => Bitrate::Kbps160,
            161..=192 => Bitrate::Kbps192,
            193..=224 => Bitrate::Kbps224,
            225..=256 => Bitrate::Kbps256,
            _ => Bitrate::Kbps320,
        }
    }

    struct LameSession {
        encoder: Encoder,
    }

    impl Mp3Session for LameSession {
        fn encode_block(
            &mut self,
            left: &[i16],
            right: Option<&[i16]>,
        ) -> Result<Vec<u8>, Mp3Error> {
            let mut buffer = output_buffer(left.len());
            let written = match right {
                Some(right) => self.encoder.encode(DualPcm { left, right }, &mut buffer),
                None => self.encoder.encode(MonoPcm(left), &mut buffer),
            }
            .map_err(|e| Mp3Error::Encode(format!("{e:?}")))?;
            Ok(take_init(&buffer, written))
        }

        fn flush(&mut self) -> Result<Vec<u8>, Mp3Error> {
            let mut buffer = output_buffer(MP3_BLOCK_FRAMES);
            let written = self
                .encoder
                .flush::<FlushNoGap>(&mut buffer)
                .map_err(|e| Mp3Error::Encode(format!("{e:?}")))?;
            Ok(take_init(&buffer, written))
        }
    }

    // LAME worst case: 1.25 * samples + 7200 bytes.
    fn output_buffer(frames: usize) -> Vec<MaybeUninit<u8>> {
        vec![MaybeUninit::uninit(); frames * 5 / 4 + 7200]
    }

    fn take_init(buffer: &[MaybeUninit<u8>], len: usize) -> Vec<u8> {
        buffer[..len]
            .iter()
            // Safety: the encoder reported `len` bytes written.
            .map(|b| unsafe { b.assume_init() })
            .collect()
    }
}

#[cfg(feature = "mp3-lame")]
pub use lame::LameMp3;
