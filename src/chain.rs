//! Signal chain construction, live updates, and block rendering.
//!
//! One chain per sounding track, always the same topology:
//!
//!   oscillator → filter → envelope-scaled gain → stereo panner
//!
//! The chain owns its stages outright; tearing it down consumes the value,
//! so a second teardown is unrepresentable. Everything between build and
//! teardown goes through `apply_live_update` — callers never reach the
//! stages directly.

use crate::{
    automation::AutomationLane,
    dsp::{filter::SvFilter, oscillator::OscillatorBlock, pan::StereoPanner},
    envelope,
    error::ChainError,
    params::{ParamChange, TrackParams},
    MAX_BLOCK_SIZE,
};

pub struct SignalChain {
    oscillator: OscillatorBlock,
    filter: SvFilter,
    envelope: AutomationLane,
    gain_scale: f32,
    panner: StereoPanner,
    sample_rate: f32,
    scratch: Vec<f32>,
}

impl SignalChain {
    /// Allocate the four stages and configure each from the record's current
    /// values. The envelope lane starts silent; scheduling it is the
    /// caller's next move.
    pub fn build(params: &TrackParams, sample_rate: f32) -> Result<Self, ChainError> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(ChainError::BadSampleRate { sample_rate });
        }

        Ok(Self {
            oscillator: OscillatorBlock::new(params.waveform, params.frequency, params.detune),
            filter: SvFilter::new(params.filter_type, params.filter_freq, params.filter_q),
            envelope: AutomationLane::new(0.0),
            gain_scale: params.effective_volume(),
            panner: StereoPanner::new(params.pan),
            sample_rate,
            scratch: vec![0.0; MAX_BLOCK_SIZE],
        })
    }

    /// Begin the attack/decay schedule at `now`.
    pub fn start_envelope(&mut self, params: &TrackParams, now: f64) {
        envelope::schedule_attack(&mut self.envelope, params, now);
    }

    /// Begin the release ramp at `now`, anchored at the current level.
    /// Returns the ramp duration in seconds.
    pub fn release_envelope(&mut self, release_secs: f32, now: f64) -> f64 {
        envelope::schedule_release(&mut self.envelope, release_secs, now)
    }

    /// Push one changed field into its live stage. Envelope timing fields
    /// have no live stage; they are read from the record again at the next
    /// start or stop.
    pub fn apply_live_update(&mut self, change: &ParamChange, params: &TrackParams) {
        match change {
            ParamChange::Frequency(hz) => self.oscillator.set_frequency(*hz),
            ParamChange::Waveform(waveform) => self.oscillator.set_waveform(*waveform),
            ParamChange::Detune(cents) => self.oscillator.set_detune(*cents),
            ParamChange::Volume(_) | ParamChange::Muted(_) => {
                self.gain_scale = params.effective_volume();
            }
            ParamChange::Pan(pan) => self.panner.set_pan(*pan),
            ParamChange::FilterType(shape) => self.filter.set_shape(*shape),
            ParamChange::FilterFreq(hz) => self.filter.set_cutoff(*hz),
            ParamChange::FilterQ(q) => self.filter.set_q(*q),
            ParamChange::Attack(_)
            | ParamChange::Decay(_)
            | ParamChange::Sustain(_)
            | ParamChange::Release(_) => {}
        }
    }

    /// Amplitude the gain stage applies at time `t`: envelope level times
    /// the (mute-aware) gain scale.
    pub fn amplitude_at(&self, t: f64) -> f32 {
        self.envelope.value_at(t) * self.gain_scale
    }

    /// Render one block beginning at `now`, adding into the stereo pair.
    pub fn render_into(&mut self, left: &mut [f32], right: &mut [f32], now: f64) {
        let frames = left.len().min(right.len()).min(MAX_BLOCK_SIZE);
        let block = &mut self.scratch[..frames];

        self.oscillator.render(block, self.sample_rate);
        self.filter.render(block, self.sample_rate);

        let dt = 1.0 / f64::from(self.sample_rate);
        for (i, sample) in block.iter_mut().enumerate() {
            *sample *= self.envelope.value_at(now + i as f64 * dt) * self.gain_scale;
        }

        self.panner
            .mix_into(block, &mut left[..frames], &mut right[..frames]);
    }

    /// Disconnect and release every stage.
    pub fn teardown(self) {
        // Stages are exclusively owned; dropping them is the release.
    }
}
