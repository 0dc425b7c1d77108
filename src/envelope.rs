//! Envelope scheduling over an automation lane.
//!
//! Envelopes run in normalized space: the lane travels 0 → 1 → sustain → 0
//! and the chain multiplies it by the track's gain scale (zero while muted,
//! `volume` otherwise). Mute and volume edits therefore move the effective
//! ramp target live without touching the schedule — the envelope is never
//! retriggered by a gain edit.
//!
//! All ramps are linear in amplitude. Zero-length phases collapse to jumps
//! inside the lane, so an attack, decay, or release of 0 is an ordinary
//! instantaneous envelope, not an error.

use crate::automation::AutomationLane;
use crate::params::TrackParams;

/// Schedule the attack and decay ramps at `now`, replacing anything still
/// pending on the lane. Both ramps go on the schedule in this one call;
/// the decay is never triggered separately.
pub fn schedule_attack(lane: &mut AutomationLane, params: &TrackParams, now: f64) {
    let attack = f64::from(params.attack.max(0.0));
    let decay = f64::from(params.decay.max(0.0));
    let sustain = params.sustain.clamp(0.0, 1.0);

    lane.cancel_scheduled(now);
    lane.set_value_at(0.0, now);
    lane.linear_ramp_to(1.0, now + attack);
    lane.linear_ramp_to(sustain, now + attack + decay);
}

/// Schedule the release ramp at `now`, anchored at the lane's value at that
/// instant — not the nominal sustain level, so a release begun mid-attack or
/// mid-decay starts exactly where the amplitude is. Returns the release
/// duration in seconds for teardown scheduling.
pub fn schedule_release(lane: &mut AutomationLane, release_secs: f32, now: f64) -> f64 {
    let release = f64::from(release_secs.max(0.0));
    let level = lane.value_at(now);

    lane.cancel_scheduled(now);
    lane.set_value_at(level, now);
    lane.linear_ramp_to(0.0, now + release);
    release
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(attack: f32, decay: f32, sustain: f32, release: f32) -> TrackParams {
        TrackParams {
            attack,
            decay,
            sustain,
            release,
            ..TrackParams::default()
        }
    }

    #[test]
    fn attack_then_decay_in_one_schedule() {
        let mut lane = AutomationLane::new(0.0);
        schedule_attack(&mut lane, &params(1.0, 1.0, 0.5, 0.3), 10.0);

        assert_eq!(lane.value_at(10.0), 0.0);
        assert!((lane.value_at(10.5) - 0.5).abs() < 1e-6, "mid-attack");
        assert_eq!(lane.value_at(11.0), 1.0, "attack peak");
        assert!((lane.value_at(11.5) - 0.75).abs() < 1e-6, "mid-decay");
        assert_eq!(lane.value_at(12.0), 0.5, "sustain");
        assert_eq!(lane.value_at(99.0), 0.5, "sustain holds until release");
    }

    #[test]
    fn release_anchors_at_the_level_at_stop() {
        let mut lane = AutomationLane::new(0.0);
        schedule_attack(&mut lane, &params(2.0, 0.1, 0.5, 1.0), 0.0);

        // Stop a quarter of the way through the attack.
        let release = schedule_release(&mut lane, 1.0, 0.5);

        assert_eq!(release, 1.0);
        assert!((lane.value_at(0.5) - 0.25).abs() < 1e-6, "anchor = level at stop");
        assert!((lane.value_at(1.0) - 0.125).abs() < 1e-6, "half the release gone");
        assert_eq!(lane.value_at(1.5), 0.0);
    }

    #[test]
    fn release_reaches_zero_by_deadline() {
        let mut lane = AutomationLane::new(0.0);
        schedule_attack(&mut lane, &params(0.1, 0.1, 0.5, 0.2), 0.0);

        // Stop immediately after start, before the attack moved anywhere.
        let release = schedule_release(&mut lane, 0.2, 0.0);
        assert_eq!(lane.value_at(release), 0.0);
    }

    #[test]
    fn zero_duration_phases_jump() {
        let mut lane = AutomationLane::new(0.0);
        schedule_attack(&mut lane, &params(0.0, 0.0, 1.0, 0.0), 5.0);
        assert_eq!(lane.value_at(5.0), 1.0, "instant attack at full level");

        let release = schedule_release(&mut lane, 0.0, 6.0);
        assert_eq!(release, 0.0);
        assert_eq!(lane.value_at(6.0), 0.0, "instant release");
    }

    #[test]
    fn restart_cancels_the_pending_release() {
        let mut lane = AutomationLane::new(0.0);
        let p = params(0.0, 0.0, 1.0, 10.0);
        schedule_attack(&mut lane, &p, 0.0);
        schedule_release(&mut lane, 10.0, 1.0);

        // Retrigger while the long release is still ramping.
        schedule_attack(&mut lane, &p, 2.0);
        assert_eq!(lane.value_at(2.0), 1.0);
        assert_eq!(lane.value_at(5.0), 1.0, "release ramp must not fire");
    }
}
