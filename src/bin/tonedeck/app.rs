//! Demo runner: builds a small deck, streams it through the default output
//! device, and drives it from the main thread over the control link.

use std::thread;
use std::time::Duration;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use tonedeck::{
    control::{control_link, ControlMsg},
    deck::Deck,
    params::{FilterShape, ParamChange, TrackId, Waveform},
    store::{FileStore, LoadOutcome},
    MAX_BLOCK_SIZE,
};

const CONTROL_QUEUE_SIZE: usize = 64;

pub struct Demo;

impl Demo {
    pub fn new() -> Self {
        Self
    }

    /// Run the demo (takes over, plays audio).
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        println!("=== tonedeck ===");
        println!("Sample rate: {} Hz", sample_rate);
        println!("Channels: {}", channels);
        println!();

        let mut deck = Deck::new(sample_rate);
        build_chord(&mut deck);

        // Round-trip the configuration through the store before streaming.
        let mut store = FileStore::new(std::env::temp_dir().join("tonedeck-demo.json"));
        deck.save_to(&mut store)
            .wrap_err("failed to save track configuration")?;
        match deck
            .load_from(&store)
            .wrap_err("failed to reload track configuration")?
        {
            LoadOutcome::Restored(count) => {
                println!("Restored {} tracks from {}", count, store.path().display())
            }
            LoadOutcome::NothingSaved => println!("No saved configuration found"),
        }

        let ids: Vec<TrackId> = deck.tracks().map(|(id, _, _)| id).collect();
        for (id, params, _) in deck.tracks() {
            println!("  Track {}: {:.2} Hz {:?}", id, params.frequency, params.waveform);
        }
        println!();

        let (mut tx, mut rx) = control_link(CONTROL_QUEUE_SIZE);

        let mut render_l = vec![0.0f32; MAX_BLOCK_SIZE];
        let mut render_r = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                let total_frames = data.len() / channels;
                let mut written = 0;

                while written < total_frames {
                    let frames = (total_frames - written).min(MAX_BLOCK_SIZE);

                    for fault in deck.drain_control(&mut rx) {
                        eprintln!("control error: {}", fault);
                    }
                    deck.render_block(&mut render_l[..frames], &mut render_r[..frames]);

                    let base = written * channels;
                    for i in 0..frames {
                        let frame = &mut data[base + i * channels..base + (i + 1) * channels];
                        frame[0] = render_l[i];
                        if channels > 1 {
                            frame[1] = render_r[i];
                        }
                        for extra in frame.iter_mut().skip(2) {
                            *extra = 0.0;
                        }
                    }

                    written += frames;
                }
            },
            |err| eprintln!("audio error: {}", err),
            None,
        )?;
        stream.play()?;

        println!("Playing chord...");
        tx.push(ControlMsg::PlayAll)
            .map_err(|_| eyre!("control queue full"))?;
        thread::sleep(Duration::from_secs(2));

        // Brighten and detune the middle voice while it sounds.
        if let Some(&mid) = ids.get(1) {
            let _ = tx.push(ControlMsg::Set(mid, ParamChange::Detune(12.0)));
            let _ = tx.push(ControlMsg::Set(mid, ParamChange::FilterFreq(4000.0)));
        }
        thread::sleep(Duration::from_secs(2));

        println!("Releasing...");
        tx.push(ControlMsg::StopAll)
            .map_err(|_| eyre!("control queue full"))?;
        thread::sleep(Duration::from_millis(1500));

        Ok(())
    }
}

impl Default for Demo {
    fn default() -> Self {
        Self::new()
    }
}

/// Three tracks spread across the stereo field, A major-ish.
fn build_chord(deck: &mut Deck) {
    let voicing: [(f32, Waveform, f32); 3] = [
        (220.0, Waveform::Sawtooth, -0.5),
        (277.18, Waveform::Sine, 0.0),
        (329.63, Waveform::Triangle, 0.5),
    ];

    for (frequency, waveform, pan) in voicing {
        let id = deck.create_track();
        deck.set_param(id, ParamChange::Frequency(frequency));
        deck.set_param(id, ParamChange::Waveform(waveform));
        deck.set_param(id, ParamChange::Pan(pan));
        deck.set_param(id, ParamChange::Volume(0.25));
        deck.set_param(id, ParamChange::Attack(0.05));
        deck.set_param(id, ParamChange::Release(0.8));
        deck.set_param(id, ParamChange::FilterType(FilterShape::Lowpass));
        deck.set_param(id, ParamChange::FilterFreq(2500.0));
    }
}
