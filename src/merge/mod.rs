//! Multi-track combination with channel and sample-rate reconciliation.
//!
//! Merges decoded tracks back to back into one continuous track, optionally
//! separated by silence. The first track's sample rate is the merge target;
//! tracks at other rates are linearly resampled to it. Tracks with fewer
//! channels than the widest input are upmixed by duplicating their first
//! channel into the missing output channels — never by averaging — so output
//! stays byte-for-byte reproducible.

use thiserror::Error;

use crate::audio::{resample, AudioTrack};

/// Errors that can occur while merging tracks.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("No tracks to merge")]
    EmptyInput,
}

/// Merge `tracks` in order into one continuous track.
///
/// `gap_seconds` of silence is inserted strictly between consecutive tracks:
/// never before the first or after the last. Each input reserves a region of
/// its own frame count in the output; a track whose copied data shortened or
/// lengthened under resampling still advances the write offset by its
/// original frame count, with silence filling any shortfall.
///
/// `progress` receives the fraction of tracks processed (0.0..=1.0), once per
/// track; the caller scales it into whatever range it reports upstream.
pub fn merge_tracks(
    tracks: &[AudioTrack],
    gap_seconds: f64,
    progress: Option<&dyn Fn(f32)>,
) -> Result<AudioTrack, MergeError> {
    let first = tracks.first().ok_or(MergeError::EmptyInput)?;

    let target_rate = first.sample_rate();
    let target_channels = tracks
        .iter()
        .map(|t| t.channel_count())
        .max()
        .unwrap_or(1);

    let gap_frames = if gap_seconds > 0.0 {
        (gap_seconds * target_rate as f64).floor() as usize
    } else {
        0
    };

    let total_frames = tracks.iter().map(|t| t.frame_count()).sum::<usize>()
        + gap_frames * (tracks.len() - 1);

    log::debug!(
        "Merging {} tracks: {} Hz, {} channels, {} frames",
        tracks.len(),
        target_rate,
        target_channels,
        total_frames
    );

    // Zero-initialized output: gaps and resampling shortfalls stay silent.
    let mut channels = vec![vec![0.0f32; total_frames]; target_channels];

    let mut offset = 0;
    for (index, track) in tracks.iter().enumerate() {
        for (out_index, out_channel) in channels.iter_mut().enumerate() {
            let source_index = if out_index < track.channel_count() {
                out_index
            } else {
                0
            };
            let source = track.channel(source_index);

            let resampled;
            let data: &[f32] = if track.sample_rate() != target_rate {
                resampled = resample(source, track.sample_rate(), target_rate);
                &resampled
            } else {
                source
            };

            let end = (offset + data.len()).min(total_frames);
            out_channel[offset..end].copy_from_slice(&data[..end - offset]);
        }

        offset += track.frame_count();
        if gap_frames > 0 && index + 1 < tracks.len() {
            offset += gap_frames;
        }

        if let Some(report) = progress {
            report((index + 1) as f32 / tracks.len() as f32);
        }
    }

    Ok(AudioTrack::new(channels, target_rate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::synth::{silent_track, sine_track};

    #[test]
    fn test_empty_input_fails() {
        let result = merge_tracks(&[], 0.0, None);
        assert!(matches!(result, Err(MergeError::EmptyInput)));
    }

    #[test]
    fn test_single_track_passthrough_shape() {
        let track = sine_track(440.0, 44100, 1.0, 2);
        let merged = merge_tracks(std::slice::from_ref(&track), 5.0, None).unwrap();

        // One track: no gap anywhere.
        assert_eq!(merged.frame_count(), track.frame_count());
        assert_eq!(merged.channel_count(), 2);
        assert_eq!(merged.channel(0), track.channel(0));
    }

    #[test]
    fn test_gap_only_between_tracks() {
        let a = silent_track(1000, 1.0, 1);
        let b = silent_track(1000, 1.0, 1);
        let merged = merge_tracks(&[a, b], 0.5, None).unwrap();
        assert_eq!(merged.frame_count(), 1000 + 500 + 1000);
    }

    #[test]
    fn test_negative_gap_ignored() {
        let a = silent_track(1000, 1.0, 1);
        let b = silent_track(1000, 1.0, 1);
        let merged = merge_tracks(&[a, b], -1.0, None).unwrap();
        assert_eq!(merged.frame_count(), 2000);
    }

    #[test]
    fn test_upmix_duplicates_first_channel() {
        let mono = sine_track(440.0, 8000, 0.1, 1);
        let stereo = sine_track(880.0, 8000, 0.1, 2);
        let merged = merge_tracks(&[mono.clone(), stereo], 0.0, None).unwrap();

        assert_eq!(merged.channel_count(), 2);
        let frames = mono.frame_count();
        assert_eq!(&merged.channel(0)[..frames], &merged.channel(1)[..frames]);
    }

    #[test]
    fn test_progress_per_track() {
        use std::cell::RefCell;

        let tracks = vec![
            silent_track(8000, 0.1, 1),
            silent_track(8000, 0.1, 1),
            silent_track(8000, 0.1, 1),
        ];
        let seen = RefCell::new(Vec::new());
        let report = |f: f32| seen.borrow_mut().push(f);
        merge_tracks(&tracks, 0.0, Some(&report)).unwrap();

        let seen = seen.into_inner();
        assert_eq!(seen.len(), 3);
        assert!((seen[2] - 1.0).abs() < f32::EPSILON);
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    }
}
