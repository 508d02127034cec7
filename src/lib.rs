//! Mixdown Core
//!
//! Audio track combination and batch transcoding engine.
//!
//! # Features
//!
//! - In-memory decoding (WAV, MP3, FLAC, AAC) via Symphonia
//! - Sample-accurate multi-track merging with configurable silence gaps
//! - Linear-interpolation sample-rate conversion
//! - Canonical RIFF/WAVE (PCM16) encoding
//! - MP3 encoding through an injected LAME capability (when the `mp3-lame`
//!   feature is enabled), degrading to WAV when absent
//! - Sequential batch conversion with per-file failure isolation
//!
//! # Example
//!
//! ```no_run
//! use mixdown::{combine_files, CombineConfig, SourceFile, TargetFormat};
//!
//! let files = vec![
//!     SourceFile::new("intro.mp3", std::fs::read("intro.mp3").unwrap()),
//!     SourceFile::new("outro.wav", std::fs::read("outro.wav").unwrap()),
//! ];
//! let config = CombineConfig {
//!     gap_seconds: 2.0,
//!     format: TargetFormat::Wav,
//!     ..Default::default()
//! };
//! let output = combine_files(files, &config, None, Some(&|p| println!("{p:.0}%")))
//!     .expect("combine failed");
//! println!("{} bytes of {:?}", output.artifact.len(), output.artifact.format);
//! ```

pub mod audio;
pub mod encode;
pub mod merge;
pub mod pipeline;

// Re-export commonly used types
pub use audio::{decode_bytes, resample, AudioTrack, DecodeError};
#[cfg(feature = "mp3-lame")]
pub use encode::LameMp3;
pub use encode::{
    encode_wav, parse_wav, transcode_wav, AudioFormat, EncodeWarning, EncodedArtifact,
    Mp3Capability, Mp3Error, Mp3Session, WavError, WavPcm,
};
pub use merge::{merge_tracks, MergeError};
pub use pipeline::{
    combine_files, convert_all, CombineConfig, CombineOutput, ConversionResult, ConvertConfig,
    PipelineError, SourceFile, TargetFormat,
};
