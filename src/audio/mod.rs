//! Audio track model, decoding, resampling, and test-signal synthesis.
//!
//! This module provides:
//! - In-memory decoding via Symphonia (WAV, MP3, FLAC, AAC)
//! - The per-channel [`AudioTrack`] buffer model
//! - Linear-interpolation sample-rate conversion
//! - Deterministic synthetic signals for tests and benchmarks

pub mod decoder;
pub mod resampler;
pub mod synth;
pub mod track;

// Re-export commonly used types
pub use decoder::{decode_bytes, DecodeError};
pub use resampler::resample;
pub use track::AudioTrack;
