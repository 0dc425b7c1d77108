use std::f32::consts::PI;

use crate::params::FilterShape;

/*
| shape     | passes          | rejects      |
| --------- | --------------- | ------------ |
| low-pass  | below cutoff    | above cutoff |
| high-pass | above cutoff    | below cutoff |
| band-pass | around cutoff   | outside      |
*/

/// Two-integrator state-variable filter. Damping comes straight from the
/// quality factor (`k = 1/Q`), so the Q range a UI exposes maps onto the
/// filter without a separate resonance scale.
pub struct SvFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    shape: FilterShape,
    cutoff_hz: f32,
    q: f32,
}

struct TapOutputs {
    lowpass: f32,
    bandpass: f32,
    highpass: f32,
}

impl SvFilter {
    pub fn new(shape: FilterShape, cutoff_hz: f32, q: f32) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            shape,
            cutoff_hz,
            q,
        }
    }

    pub fn set_shape(&mut self, shape: FilterShape) {
        self.shape = shape;
    }

    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        self.cutoff_hz = cutoff_hz;
    }

    pub fn set_q(&mut self, q: f32) {
        self.q = q;
    }

    /// Prewarped integrator gain. The cutoff is clamped into the audible
    /// band and below Nyquist so a wild record value cannot blow up `tan`.
    fn compute_g(&self, sample_rate: f32) -> f32 {
        let max_hz = (sample_rate * 0.49).min(20_000.0);
        let cutoff = if self.cutoff_hz.is_finite() {
            self.cutoff_hz.clamp(20.0, max_hz)
        } else {
            1000.0
        };
        (PI * cutoff / sample_rate).tan()
    }

    fn damping(&self) -> f32 {
        let q = if self.q.is_finite() {
            self.q.clamp(0.001, 100.0)
        } else {
            1.0
        };
        1.0 / q
    }

    fn next_sample(&mut self, sample: f32, k: f32, g: f32) -> TapOutputs {
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        TapOutputs {
            lowpass: v2,
            bandpass: v1,
            highpass: sample - k * v1 - v2,
        }
    }

    /// Filter the buffer in place.
    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f32) {
        let g = self.compute_g(sample_rate);
        let k = self.damping();

        for sample in buffer.iter_mut() {
            let taps = self.next_sample(*sample, k, g);

            *sample = match self.shape {
                FilterShape::Lowpass => taps.lowpass,
                FilterShape::Highpass => taps.highpass,
                FilterShape::Bandpass => taps.bandpass,
            }
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }
}
