//! Synthetic audio generation for testing.
//!
//! Generates test signals like sine waves, white noise, and silence
//! for unit tests, integration tests, and benchmarks.

use std::f32::consts::PI;

use super::track::AudioTrack;

/// Generate a sine wave.
///
/// # Arguments
/// * `frequency` - Frequency in Hz
/// * `sample_rate` - Sample rate in Hz
/// * `duration` - Duration in seconds
/// * `amplitude` - Amplitude (0.0 to 1.0)
pub fn generate_sine(frequency: f32, sample_rate: u32, duration: f32, amplitude: f32) -> Vec<f32> {
    let num_samples = (duration * sample_rate as f32) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            amplitude * (2.0 * PI * frequency * t).sin()
        })
        .collect()
}

/// Generate white noise.
///
/// Uses a simple linear congruential generator for reproducibility.
pub fn generate_white_noise(
    sample_rate: u32,
    duration: f32,
    amplitude: f32,
    seed: u64,
) -> Vec<f32> {
    let num_samples = (duration * sample_rate as f32) as usize;

    // Simple LCG for reproducible "random" noise
    let mut state = seed;
    let a: u64 = 6364136223846793005;
    let c: u64 = 1442695040888963407;

    (0..num_samples)
        .map(|_| {
            state = state.wrapping_mul(a).wrapping_add(c);
            let normalized = (state as f32 / u64::MAX as f32) * 2.0 - 1.0;
            amplitude * normalized
        })
        .collect()
}

/// Generate `frames` zero-valued samples.
pub fn generate_silence(frames: usize) -> Vec<f32> {
    vec![0.0; frames]
}

/// Build a track carrying the same sine wave in every channel.
pub fn sine_track(
    frequency: f32,
    sample_rate: u32,
    duration: f32,
    channel_count: usize,
) -> AudioTrack {
    let samples = generate_sine(frequency, sample_rate, duration, 0.8);
    AudioTrack::new(vec![samples; channel_count], sample_rate)
}

/// Build an all-silent track.
pub fn silent_track(sample_rate: u32, duration: f32, channel_count: usize) -> AudioTrack {
    let frames = (duration * sample_rate as f32) as usize;
    AudioTrack::new(vec![generate_silence(frames); channel_count], sample_rate)
}
