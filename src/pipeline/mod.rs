//! Combine and batch-convert pipelines over raw file bytes.
//!
//! Two top-level operations:
//! - [`combine_files`]: decode every input, merge into one continuous track,
//!   encode. A failure anywhere aborts the whole operation.
//! - [`convert_all`]: transcode each input independently; per-file failures
//!   are recorded in the result list and never abort the batch.
//!
//! Both report progress as percentages in `0..=100`, non-decreasing within
//! one operation.

use serde::Serialize;
use thiserror::Error;

use crate::audio::{decode_bytes, resample, AudioTrack, DecodeError};
use crate::encode::{
    encode_wav, transcode_wav, EncodeWarning, EncodedArtifact, Mp3Capability,
};
use crate::merge::{merge_tracks, MergeError};

/// Raw input file handed over by the client.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Original file name, used for format hints and result naming.
    pub name: String,
    /// Raw container bytes.
    pub data: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// Output container requested by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    Wav,
    Mp3,
    /// Accepted as a request but not encodable; output degrades to WAV.
    Ogg,
}

impl TargetFormat {
    /// Parse a client-supplied format name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "wav" => Some(TargetFormat::Wav),
            "mp3" => Some(TargetFormat::Mp3),
            "ogg" => Some(TargetFormat::Ogg),
            _ => None,
        }
    }
}

/// Configuration for [`combine_files`].
#[derive(Debug, Clone)]
pub struct CombineConfig {
    /// Silence inserted between consecutive tracks, in seconds.
    pub gap_seconds: f64,
    /// Output container.
    pub format: TargetFormat,
    /// MP3 bitrate in kbps; ignored for other formats.
    pub bitrate_kbps: u32,
}

impl Default for CombineConfig {
    fn default() -> Self {
        Self {
            gap_seconds: 0.0,
            format: TargetFormat::Wav,
            bitrate_kbps: 192,
        }
    }
}

/// Configuration for [`convert_all`].
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Output container.
    pub format: TargetFormat,
    /// MP3 bitrate in kbps; ignored for other formats.
    pub bitrate_kbps: u32,
    /// Output sample rate in Hz; tracks at other rates are resampled.
    pub sample_rate: u32,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            format: TargetFormat::Mp3,
            bitrate_kbps: 192,
            sample_rate: 44100,
        }
    }
}

/// Errors that abort a combine operation.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to decode '{name}': {source}")]
    Decode {
        name: String,
        #[source]
        source: DecodeError,
    },

    #[error("Merge error: {0}")]
    Merge(#[from] MergeError),
}

/// Result of one combine operation. The caller owns every buffer; dropping
/// the value releases them.
#[derive(Debug)]
pub struct CombineOutput {
    /// The merged track, ready for playback.
    pub track: AudioTrack,
    /// The encoded artifact, ready for download.
    pub artifact: EncodedArtifact,
    /// Non-fatal downgrades that occurred while encoding.
    pub warnings: Vec<EncodeWarning>,
}

/// Outcome of one file in a batch conversion.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ConversionResult {
    Success {
        original_name: String,
        output_name: String,
        /// Seconds of audio in the converted track.
        duration: f64,
        /// Encoded size in bytes.
        size: usize,
        artifact: EncodedArtifact,
    },
    Failure {
        original_name: String,
        error: String,
    },
}

impl ConversionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ConversionResult::Success { .. })
    }

    /// Name of the input file this result belongs to.
    pub fn original_name(&self) -> &str {
        match self {
            ConversionResult::Success { original_name, .. }
            | ConversionResult::Failure { original_name, .. } => original_name,
        }
    }
}

/// Decode, merge, and encode `files` into one downloadable artifact.
///
/// Progress: decoding covers 0–50, merging 50–90, encoding 90–100.
/// Any decode failure or an empty input list aborts the whole operation.
pub fn combine_files(
    files: Vec<SourceFile>,
    config: &CombineConfig,
    mp3: Option<&dyn Mp3Capability>,
    progress: Option<&dyn Fn(f32)>,
) -> Result<CombineOutput, PipelineError> {
    let report = |percent: f32| {
        if let Some(callback) = progress {
            callback(percent);
        }
    };

    let total = files.len();
    let mut tracks = Vec::with_capacity(total);
    for (index, file) in files.into_iter().enumerate() {
        let SourceFile { name, data } = file;
        let track =
            decode_bytes(data, Some(&name)).map_err(|source| PipelineError::Decode {
                name,
                source,
            })?;
        tracks.push(track);
        report((index + 1) as f32 / total as f32 * 50.0);
    }

    let merged = merge_tracks(
        &tracks,
        config.gap_seconds,
        Some(&|fraction: f32| report(50.0 + fraction * 40.0)),
    )?;
    drop(tracks);

    log::info!(
        "Combined {} inputs into {:.2}s of audio at {} Hz",
        total,
        merged.duration(),
        merged.sample_rate()
    );

    let mut warnings = Vec::new();
    let artifact = encode_to_target(&merged, config.format, config.bitrate_kbps, mp3, &mut warnings);
    report(100.0);

    Ok(CombineOutput {
        track: merged,
        artifact,
        warnings,
    })
}

/// Convert each file independently to the target format and sample rate.
///
/// Files are processed strictly sequentially; at most one file's decoded
/// buffers are held at a time. Every input yields exactly one result, in
/// input order; failures are isolated per file. Progress is reported after
/// each file, success or not.
pub fn convert_all(
    files: Vec<SourceFile>,
    config: &ConvertConfig,
    mp3: Option<&dyn Mp3Capability>,
    progress: Option<&dyn Fn(f32)>,
) -> Vec<ConversionResult> {
    let total = files.len();
    let mut results = Vec::with_capacity(total);

    for (index, file) in files.into_iter().enumerate() {
        let original_name = file.name.clone();
        let result = match convert_one(file, config, mp3) {
            Ok(result) => result,
            Err(err) => {
                log::warn!("Conversion failed for '{original_name}': {err}");
                ConversionResult::Failure {
                    original_name,
                    error: err.to_string(),
                }
            }
        };
        results.push(result);

        if let Some(callback) = progress {
            callback((index + 1) as f32 / total as f32 * 100.0);
        }
    }

    results
}

fn convert_one(
    file: SourceFile,
    config: &ConvertConfig,
    mp3: Option<&dyn Mp3Capability>,
) -> Result<ConversionResult, DecodeError> {
    let SourceFile { name, data } = file;
    let track = decode_bytes(data, Some(&name))?;

    let track = if track.sample_rate() != config.sample_rate {
        let channels = track
            .channels()
            .iter()
            .map(|channel| resample(channel, track.sample_rate(), config.sample_rate))
            .collect();
        AudioTrack::new(channels, config.sample_rate)
    } else {
        track
    };

    let mut warnings = Vec::new();
    let artifact = encode_to_target(&track, config.format, config.bitrate_kbps, mp3, &mut warnings);

    Ok(ConversionResult::Success {
        output_name: output_name(&name, &artifact),
        original_name: name,
        duration: track.duration(),
        size: artifact.len(),
        artifact,
    })
}

fn encode_to_target(
    track: &AudioTrack,
    format: TargetFormat,
    bitrate_kbps: u32,
    mp3: Option<&dyn Mp3Capability>,
    warnings: &mut Vec<EncodeWarning>,
) -> EncodedArtifact {
    let wav = encode_wav(track);
    match format {
        TargetFormat::Wav => wav,
        TargetFormat::Mp3 => {
            let (artifact, warning) = transcode_wav(&wav, bitrate_kbps, mp3);
            warnings.extend(warning);
            artifact
        }
        TargetFormat::Ogg => {
            log::warn!("OGG output is not supported, keeping WAV");
            warnings.push(EncodeWarning::UnsupportedFormat {
                format: "ogg".into(),
            });
            wav
        }
    }
}

/// Original basename with the produced artifact's extension substituted, so
/// the name never contradicts the bytes after a degraded encode.
fn output_name(original: &str, artifact: &EncodedArtifact) -> String {
    let stem = match original.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => original,
    };
    format!("{stem}.{}", artifact.format.extension())
}
