//! Benchmarks for merge, resample, and WAV encoding.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mixdown::audio::synth::{generate_white_noise, sine_track};
use mixdown::{encode_wav, merge_tracks, resample, AudioTrack};

const SAMPLE_RATE: u32 = 44100;

fn bench_resample(c: &mut Criterion) {
    let mut group = c.benchmark_group("Resample");

    let samples = generate_white_noise(SAMPLE_RATE, 10.0, 1.0, 42);
    group.throughput(Throughput::Elements(samples.len() as u64));

    for target_rate in [22050u32, 48000, 96000] {
        group.bench_with_input(
            BenchmarkId::new("linear", target_rate),
            &target_rate,
            |b, &rate| {
                b.iter(|| black_box(resample(&samples, SAMPLE_RATE, rate)));
            },
        );
    }

    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("Merge");

    for track_count in [2usize, 4, 8] {
        let tracks: Vec<AudioTrack> = (0..track_count)
            .map(|i| sine_track(220.0 * (i + 1) as f32, SAMPLE_RATE, 5.0, 2))
            .collect();

        group.bench_with_input(
            BenchmarkId::new("tracks", track_count),
            &tracks,
            |b, tracks| {
                b.iter(|| black_box(merge_tracks(tracks, 0.5, None).unwrap()));
            },
        );
    }

    group.finish();
}

fn bench_wav_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("WAV Encode");

    for seconds in [1u32, 10, 60] {
        let track = sine_track(440.0, SAMPLE_RATE, seconds as f32, 2);
        group.throughput(Throughput::Bytes(
            (track.frame_count() * track.channel_count() * 2) as u64,
        ));
        group.bench_with_input(BenchmarkId::new("pcm16", seconds), &track, |b, track| {
            b.iter(|| black_box(encode_wav(track)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resample, bench_merge, bench_wav_encode);
criterion_main!(benches);
