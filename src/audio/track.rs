//! Channel-buffer track model.
//!
//! A track is a set of per-channel sample buffers at one sample rate. Every
//! stage of the engine (decoder, merger, encoders) produces or consumes this
//! shape; buffers are owned by whoever holds the value.

/// Decoded PCM audio: one buffer per channel, samples normalized to -1.0..1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioTrack {
    channels: Vec<Vec<f32>>,
    sample_rate: u32,
}

impl AudioTrack {
    /// Create a track from per-channel buffers.
    ///
    /// # Panics
    ///
    /// Panics if `channels` is empty, the buffers differ in length, or
    /// `sample_rate` is zero.
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: u32) -> Self {
        assert!(!channels.is_empty(), "Track must have at least one channel");
        assert!(sample_rate > 0, "Sample rate must be positive");
        let frames = channels[0].len();
        assert!(
            channels.iter().all(|c| c.len() == frames),
            "All channels must have the same frame count"
        );
        Self {
            channels,
            sample_rate,
        }
    }

    /// Create a track from interleaved samples (frame-major, channel-minor).
    ///
    /// A trailing partial frame is dropped.
    pub fn from_interleaved(samples: &[f32], channel_count: usize, sample_rate: u32) -> Self {
        assert!(channel_count > 0, "Track must have at least one channel");
        let frames = samples.len() / channel_count;
        let mut channels: Vec<Vec<f32>> = (0..channel_count)
            .map(|_| Vec::with_capacity(frames))
            .collect();
        for frame in samples.chunks_exact(channel_count) {
            for (channel, &sample) in channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }
        Self::new(channels, sample_rate)
    }

    /// Per-channel sample buffers.
    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// One channel's samples.
    ///
    /// # Panics
    ///
    /// Panics if `index >= channel_count()`.
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    /// Number of channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of frames (samples per channel).
    pub fn frame_count(&self) -> usize {
        self.channels[0].len()
    }

    /// Duration of the track in seconds.
    pub fn duration(&self) -> f64 {
        self.frame_count() as f64 / self.sample_rate as f64
    }

    /// Interleave all channels (frame-major, channel-minor: L,R,L,R,...).
    pub fn to_interleaved(&self) -> Vec<f32> {
        let mut samples = Vec::with_capacity(self.frame_count() * self.channel_count());
        for frame in 0..self.frame_count() {
            for channel in &self.channels {
                samples.push(channel[frame]);
            }
        }
        samples
    }
}
