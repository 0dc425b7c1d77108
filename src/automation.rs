/*
Scheduled parameter values
==========================

An AutomationLane is a parameter whose value is a piecewise-linear function
of absolute time. Callers append scheduling events; the render path asks for
the value at a given instant.

Two event kinds:

  SetValue  pin `value` at time `at` (an instantaneous step)
  RampTo    arrive at `value` at time `at`, moving linearly from the
            previous event's value starting at the previous event's time

Evaluation rules:

  - Before the first event the lane holds its initial value.
  - Between two events the value either holds (next event is a step) or
    interpolates (next event is a ramp).
  - At or after the last event the value holds that event's value.
  - A ramp whose segment has zero (or negative) length is a step: no
    division by zero, the value just jumps when its time arrives.

Cancellation drops every event scheduled at or after the given instant and
nothing else. Past events keep contributing, so the lane's current value
survives a cancel; the caller re-anchors with a SetValue and schedules the
replacement ramps. Doing that on every start and stop is what keeps rapid
start/stop toggling glitch-free: stale ramps can never fire after a newer
gesture.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventKind {
    Set,
    Ramp,
}

#[derive(Debug, Clone, Copy)]
struct SchedEvent {
    at: f64,
    value: f32,
    kind: EventKind,
}

#[derive(Debug, Clone)]
pub struct AutomationLane {
    initial: f32,
    events: Vec<SchedEvent>, // sorted by `at`; ties keep insertion order
}

impl AutomationLane {
    pub fn new(initial: f32) -> Self {
        Self {
            initial,
            events: Vec::new(),
        }
    }

    /// Pin `value` at time `at`.
    pub fn set_value_at(&mut self, value: f32, at: f64) {
        self.insert(SchedEvent {
            at,
            value,
            kind: EventKind::Set,
        });
    }

    /// Ramp linearly from the previous event to `value`, arriving at `at`.
    /// With no earlier event to anchor on, the ramp degrades to a step at
    /// its scheduled time.
    pub fn linear_ramp_to(&mut self, value: f32, at: f64) {
        self.insert(SchedEvent {
            at,
            value,
            kind: EventKind::Ramp,
        });
    }

    /// Drop every event scheduled at or after `from`.
    pub fn cancel_scheduled(&mut self, from: f64) {
        self.events.retain(|e| e.at < from);
    }

    fn insert(&mut self, event: SchedEvent) {
        let idx = self.events.partition_point(|e| e.at <= event.at);
        self.events.insert(idx, event);
    }

    /// Evaluate the curve at time `t`.
    pub fn value_at(&self, t: f64) -> f32 {
        let next = self.events.partition_point(|e| e.at <= t);
        let held = if next == 0 {
            self.initial
        } else {
            self.events[next - 1].value
        };

        match self.events.get(next) {
            Some(e) if e.kind == EventKind::Ramp && next > 0 => {
                let prev = &self.events[next - 1];
                if e.at <= prev.at {
                    e.value
                } else {
                    let frac = ((t - prev.at) / (e.at - prev.at)).clamp(0.0, 1.0);
                    held + (e.value - held) * frac as f32
                }
            }
            _ => held,
        }
    }
}
