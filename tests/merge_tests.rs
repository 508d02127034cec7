//! Integration tests for merging and resampling.

use mixdown::audio::synth::{silent_track, sine_track};
use mixdown::{merge_tracks, resample, AudioTrack, MergeError};

const SAMPLE_RATE: u32 = 44100;

#[test]
fn test_empty_merge_fails() {
    assert!(matches!(
        merge_tracks(&[], 1.0, None),
        Err(MergeError::EmptyInput)
    ));
}

#[test]
fn test_merged_duration_sums_tracks_and_gaps() {
    let tracks = vec![
        sine_track(440.0, SAMPLE_RATE, 1.0, 1),
        sine_track(523.0, SAMPLE_RATE, 2.0, 1),
        sine_track(659.0, SAMPLE_RATE, 0.5, 1),
    ];
    let gap = 0.25;
    let merged = merge_tracks(&tracks, gap, None).unwrap();

    let expected: f64 = tracks.iter().map(AudioTrack::duration).sum::<f64>()
        + gap * (tracks.len() - 1) as f64;
    assert!(
        (merged.duration() - expected).abs() < 1e-4,
        "Expected {}s, got {}s",
        expected,
        merged.duration()
    );
}

#[test]
fn test_two_silent_seconds_with_one_second_gap() {
    // Two 1s mono tracks at 44100 Hz with a 1s gap: exactly 3s of output.
    let a = silent_track(SAMPLE_RATE, 1.0, 1);
    let b = silent_track(SAMPLE_RATE, 1.0, 1);
    let merged = merge_tracks(&[a, b], 1.0, None).unwrap();

    assert_eq!(merged.channel_count(), 1);
    assert_eq!(merged.frame_count(), 132_300);
    assert!((merged.duration() - 3.0).abs() < 1e-9);
}

#[test]
fn test_channel_count_is_max_of_inputs() {
    let mono = sine_track(440.0, SAMPLE_RATE, 0.5, 1);
    let stereo = sine_track(880.0, SAMPLE_RATE, 0.5, 2);
    let merged = merge_tracks(&[stereo, mono], 0.0, None).unwrap();
    assert_eq!(merged.channel_count(), 2);
}

#[test]
fn test_upmix_duplicates_not_averages() {
    // A mono track whose samples are all 0.5 merged with a stereo track:
    // both output channels must carry 0.5 in the mono region, the literal
    // duplicate of channel 0, not some mixed value.
    let mono = AudioTrack::new(vec![vec![0.5; 1000]], SAMPLE_RATE);
    let stereo = AudioTrack::new(vec![vec![0.1; 500], vec![-0.1; 500]], SAMPLE_RATE);
    let merged = merge_tracks(&[mono, stereo], 0.0, None).unwrap();

    assert!(merged.channel(0)[..1000].iter().all(|&s| s == 0.5));
    assert!(merged.channel(1)[..1000].iter().all(|&s| s == 0.5));
    // The stereo region keeps its own channels.
    assert!(merged.channel(0)[1000..].iter().all(|&s| s == 0.1));
    assert!(merged.channel(1)[1000..].iter().all(|&s| s == -0.1));
}

#[test]
fn test_gap_frames_are_silent() {
    let a = AudioTrack::new(vec![vec![0.7; 100]], 1000);
    let b = AudioTrack::new(vec![vec![0.7; 100]], 1000);
    let merged = merge_tracks(&[a, b], 0.5, None).unwrap();

    assert_eq!(merged.frame_count(), 100 + 500 + 100);
    assert!(merged.channel(0)[100..600].iter().all(|&s| s == 0.0));
    assert!(merged.channel(0)[600..].iter().all(|&s| s == 0.7));
}

#[test]
fn test_merge_resamples_to_first_track_rate() {
    // Second track at double the rate: its samples are resampled down to the
    // first track's rate, landing in the first half of its reserved region;
    // the remainder of that region stays silent.
    let a = AudioTrack::new(vec![vec![0.3; 1000]], 1000);
    let b = AudioTrack::new(vec![vec![0.9; 1000]], 2000);
    let merged = merge_tracks(&[a, b], 0.0, None).unwrap();

    assert_eq!(merged.sample_rate(), 1000);
    assert_eq!(merged.frame_count(), 2000);
    assert!(merged.channel(0)[1000..1500].iter().all(|&s| s == 0.9));
    assert!(merged.channel(0)[1500..].iter().all(|&s| s == 0.0));
}

#[test]
fn test_resample_identity_at_same_rate() {
    let input = vec![0.25, -0.75, 1.0, -1.0, 0.0];
    assert_eq!(resample(&input, SAMPLE_RATE, SAMPLE_RATE), input);
}

#[test]
fn test_resample_doubling_interpolates() {
    let output = resample(&[1.0, -1.0, 1.0, -1.0], 2, 4);

    assert_eq!(output.len(), 8);
    // Even indices land on original samples.
    for (i, expected) in [(0, 1.0), (2, -1.0), (4, 1.0), (6, -1.0)] {
        assert_eq!(output[i], expected, "index {} should be an original sample", i);
    }
    // Positions between two original samples interpolate strictly inside
    // their range; the final position clamps to the last sample.
    for &midpoint in &[output[1], output[3], output[5]] {
        assert!(
            midpoint.abs() < 1.0,
            "midpoint {} should be strictly interior",
            midpoint
        );
    }
    assert_eq!(output[7], -1.0);
}

#[test]
fn test_resample_downsampling_keeps_shape() {
    let input = mixdown::audio::synth::generate_sine(100.0, 8000, 1.0, 0.8);
    let output = resample(&input, 8000, 4000);

    assert_eq!(output.len(), 4000);
    let max = output.iter().cloned().fold(0.0f32, f32::max);
    assert!((max - 0.8).abs() < 0.05, "Peak should survive downsampling");
}
