use std::f32::consts::TAU;

use crate::params::Waveform;

/// Phase-accumulator oscillator: one waveform at one frequency, detunable
/// in cents. Phase is carried across blocks so live frequency or waveform
/// edits never snap the output back to zero.
pub struct OscillatorBlock {
    waveform: Waveform,
    frequency_hz: f32,
    detune_cents: f32,
    phase: f32, // 0..1
}

impl OscillatorBlock {
    pub fn new(waveform: Waveform, frequency_hz: f32, detune_cents: f32) -> Self {
        Self {
            waveform,
            frequency_hz,
            detune_cents,
            phase: 0.0,
        }
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    pub fn set_frequency(&mut self, hz: f32) {
        self.frequency_hz = hz;
    }

    /// Detune in cents (100 cents = one semitone).
    pub fn set_detune(&mut self, cents: f32) {
        self.detune_cents = cents;
    }

    /// Frequency after detune: `f * 2^(cents/1200)`, held inside the
    /// audible band whatever the caller wrote into the record.
    fn effective_frequency(&self) -> f32 {
        let base = if self.frequency_hz.is_finite() {
            self.frequency_hz
        } else {
            0.0
        };
        let detuned = if self.detune_cents != 0.0 && self.detune_cents.is_finite() {
            base * 2.0_f32.powf(self.detune_cents / 1200.0)
        } else {
            base
        };
        detuned.clamp(0.0, 20_000.0)
    }

    /// Fill `out` with oscillator output.
    pub fn render(&mut self, out: &mut [f32], sample_rate: f32) {
        let step = self.effective_frequency() / sample_rate;

        for sample in out.iter_mut() {
            *sample = match self.waveform {
                Waveform::Sine => (self.phase * TAU).sin(),
                Waveform::Square => {
                    if self.phase < 0.5 {
                        1.0
                    } else {
                        -1.0
                    }
                }
                Waveform::Sawtooth => 2.0 * self.phase - 1.0,
                Waveform::Triangle => 1.0 - 4.0 * (self.phase - 0.5).abs(),
            };

            self.phase += step;
            if self.phase >= 1.0 {
                self.phase = self.phase.fract();
            }
        }
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;

    #[test]
    fn valid_sine() {
        let mut osc = OscillatorBlock::new(Waveform::Sine, 440.0, 0.0);
        let mut buffer = vec![0.0f32; 128];
        osc.render(&mut buffer, SAMPLE_RATE);

        // sample n should be sin(2pi f n / sr)
        let sample_index = 12;
        let expected = (TAU * 440.0 * sample_index as f32 / SAMPLE_RATE).sin();
        let actual = buffer[sample_index];
        assert!(
            (actual - expected).abs() < 1e-5,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn square_swings_between_rails() {
        let mut osc = OscillatorBlock::new(Waveform::Square, 880.0, 0.0);
        let mut buffer = vec![0.0f32; 256];
        osc.render(&mut buffer, SAMPLE_RATE);

        assert!(buffer.iter().all(|&s| s == 1.0 || s == -1.0));
        assert!(buffer.contains(&1.0) && buffer.contains(&-1.0));
    }

    #[test]
    fn detune_raises_the_pitch() {
        // +1200 cents = one octave: the detuned oscillator completes two
        // cycles in the time the plain one completes one.
        let mut plain = OscillatorBlock::new(Waveform::Sawtooth, 100.0, 0.0);
        let mut detuned = OscillatorBlock::new(Waveform::Sawtooth, 100.0, 1200.0);

        let frames = (SAMPLE_RATE / 100.0) as usize; // one cycle at 100 Hz
        let mut a = vec![0.0f32; frames];
        let mut b = vec![0.0f32; frames];
        plain.render(&mut a, SAMPLE_RATE);
        detuned.render(&mut b, SAMPLE_RATE);

        let zero_crossings = |buf: &[f32]| {
            buf.windows(2).filter(|w| w[0] < 0.0 && w[1] >= 0.0).count()
        };
        assert_eq!(zero_crossings(&a) * 2, zero_crossings(&b));
    }

    #[test]
    fn tolerates_out_of_range_frequency() {
        let mut osc = OscillatorBlock::new(Waveform::Sine, f32::NAN, 0.0);
        let mut buffer = vec![0.0f32; 64];
        osc.render(&mut buffer, SAMPLE_RATE);
        assert!(buffer.iter().all(|s| s.is_finite()));

        osc.set_frequency(1.0e9);
        osc.render(&mut buffer, SAMPLE_RATE);
        assert!(buffer.iter().all(|s| s.is_finite()));
    }
}
