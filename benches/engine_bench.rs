//! Benchmarks for envelope evaluation and multi-track block rendering.
//!
//! Run with: cargo bench
//!
//! Reference timing at 48kHz sample rate:
//!   - 64 samples  = 1.33ms deadline
//!   - 128 samples = 2.67ms deadline
//!   - 256 samples = 5.33ms deadline
//!   - 512 samples = 10.67ms deadline

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use tonedeck::{
    automation::AutomationLane,
    deck::Deck,
    params::{ParamChange, Waveform},
};

/// Common buffer sizes used in audio applications.
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];
const SAMPLE_RATE: f32 = 48_000.0;

fn bench_lane(c: &mut Criterion) {
    let mut group = c.benchmark_group("automation/lane");

    let mut lane = AutomationLane::new(0.0);
    lane.set_value_at(0.0, 0.0);
    lane.linear_ramp_to(1.0, 0.1);
    lane.linear_ramp_to(0.7, 0.2);

    for &size in BLOCK_SIZES {
        group.bench_with_input(BenchmarkId::new("value_at", size), &size, |b, &size| {
            b.iter(|| {
                let mut acc = 0.0f32;
                for i in 0..size {
                    let t = 0.05 + i as f64 / f64::from(SAMPLE_RATE);
                    acc += lane.value_at(black_box(t));
                }
                acc
            })
        });
    }
    group.finish();
}

fn bench_deck_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("deck/render");

    for &size in BLOCK_SIZES {
        let mut deck = Deck::new(SAMPLE_RATE);
        for i in 0..8 {
            let id = deck.create_track();
            deck.set_param(id, ParamChange::Frequency(110.0 * (i + 1) as f32));
            deck.set_param(id, ParamChange::Waveform(Waveform::Sawtooth));
            deck.set_param(id, ParamChange::Pan(i as f32 / 4.0 - 1.0));
        }
        deck.play_all();

        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];

        group.bench_with_input(BenchmarkId::new("8_voices", size), &size, |b, _| {
            b.iter(|| {
                deck.render_block(black_box(&mut left), black_box(&mut right));
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_lane, bench_deck_render);
criterion_main!(benches);
