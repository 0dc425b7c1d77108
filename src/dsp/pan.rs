use std::f32::consts::FRAC_PI_4;

/// Equal-power stereo placement: constant perceived loudness as the source
/// sweeps from hard left to hard right.
pub struct StereoPanner {
    pan: f32, // -1 (left) .. 1 (right)
}

impl StereoPanner {
    pub fn new(pan: f32) -> Self {
        Self { pan }
    }

    pub fn set_pan(&mut self, pan: f32) {
        self.pan = pan;
    }

    /// Left/right gains on the sin/cos quarter circle.
    pub fn gains(&self) -> (f32, f32) {
        let pan = if self.pan.is_finite() {
            self.pan.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        let theta = (pan + 1.0) * FRAC_PI_4;
        (theta.cos(), theta.sin())
    }

    /// Add the mono block into the stereo pair.
    pub fn mix_into(&self, mono: &[f32], left: &mut [f32], right: &mut [f32]) {
        let (gain_l, gain_r) = self.gains();
        for ((sample, l), r) in mono.iter().zip(left.iter_mut()).zip(right.iter_mut()) {
            *l += sample * gain_l;
            *r += sample * gain_r;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hard_left_silences_the_right_channel() {
        let panner = StereoPanner::new(-1.0);
        let (gain_l, gain_r) = panner.gains();
        assert!((gain_l - 1.0).abs() < 1e-6);
        assert!(gain_r.abs() < 1e-6);
    }

    #[test]
    fn center_splits_power_evenly() {
        let panner = StereoPanner::new(0.0);
        let (gain_l, gain_r) = panner.gains();
        assert!((gain_l - gain_r).abs() < 1e-6);
        assert!((gain_l * gain_l + gain_r * gain_r - 1.0).abs() < 1e-6);
    }

    #[test]
    fn mix_accumulates_instead_of_overwriting() {
        let panner = StereoPanner::new(1.0);
        let mono = [0.5f32; 4];
        let mut left = [0.25f32; 4];
        let mut right = [0.25f32; 4];
        panner.mix_into(&mono, &mut left, &mut right);

        assert!(left.iter().all(|&l| (l - 0.25).abs() < 1e-6));
        assert!(right.iter().all(|&r| (r - 0.75).abs() < 1e-6));
    }
}
