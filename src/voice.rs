use tracing::debug;

use crate::{
    chain::SignalChain,
    error::ChainError,
    params::{ParamChange, TrackId, TrackParams},
};

/// Lifecycle of one track's audio-producing side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Idle,      // No chain
    Sounding,  // Chain built, envelope in attack/decay/sustain
    Releasing, // Chain still built, envelope ramping to zero
}

/// One track at runtime: its parameter record plus ownership of at most one
/// live signal chain. The chain exists exactly while the voice is Sounding
/// or Releasing; teardown after stop is deferred by the release duration and
/// tracked as an explicit deadline against the engine clock.
pub struct Voice {
    id: TrackId,
    params: TrackParams,
    state: VoiceState,
    chain: Option<SignalChain>,
    teardown_at: Option<f64>,
}

impl Voice {
    pub fn new(id: TrackId, params: TrackParams) -> Self {
        Self {
            id,
            params,
            state: VoiceState::Idle,
            chain: None,
            teardown_at: None,
        }
    }

    pub fn id(&self) -> TrackId {
        self.id
    }

    pub fn params(&self) -> &TrackParams {
        &self.params
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == VoiceState::Idle
    }

    pub fn has_chain(&self) -> bool {
        self.chain.is_some()
    }

    /// Build the chain and begin the attack. Silently ignored unless Idle,
    /// so a double start leaves the first envelope untouched.
    pub fn start(&mut self, sample_rate: f32, now: f64) -> Result<(), ChainError> {
        if self.state != VoiceState::Idle {
            return Ok(());
        }

        let mut chain = SignalChain::build(&self.params, sample_rate)?;
        chain.start_envelope(&self.params, now);
        self.chain = Some(chain);
        self.teardown_at = None;
        self.state = VoiceState::Sounding;
        debug!(track = %self.id, "voice sounding");
        Ok(())
    }

    /// Begin the release and schedule teardown for `now + release`.
    /// Silently ignored unless Sounding.
    pub fn stop(&mut self, now: f64) {
        if self.state != VoiceState::Sounding {
            return;
        }
        let Some(chain) = self.chain.as_mut() else {
            return;
        };

        let release = chain.release_envelope(self.params.release, now);
        self.teardown_at = Some(now + release);
        self.state = VoiceState::Releasing;
        debug!(track = %self.id, release, "voice releasing");
    }

    /// Force the voice through stop ahead of removal. The scheduled
    /// teardown deadline is kept, not cancelled; `finalize` will honor it.
    pub fn begin_removal(&mut self, now: f64) {
        self.stop(now);
    }

    /// Tear the chain down once the scheduled deadline has passed.
    /// Idempotent: safe to call every block and after removal.
    pub fn finalize(&mut self, now: f64) {
        if self.state != VoiceState::Releasing {
            return;
        }
        if !self.teardown_at.is_some_and(|at| now >= at) {
            return;
        }

        if let Some(chain) = self.chain.take() {
            chain.teardown();
        }
        self.teardown_at = None;
        self.state = VoiceState::Idle;
        debug!(track = %self.id, "voice idle");
    }

    /// Write a field edit into the record unconditionally; push it into the
    /// live chain whenever one exists (Sounding or Releasing).
    pub fn set_param(&mut self, change: ParamChange) {
        self.params.apply(&change);
        if let Some(chain) = self.chain.as_mut() {
            chain.apply_live_update(&change, &self.params);
        }
    }

    /// Amplitude the gain stage applies at `t`; zero without a chain.
    pub fn amplitude_at(&self, t: f64) -> f32 {
        self.chain.as_ref().map_or(0.0, |c| c.amplitude_at(t))
    }

    pub(crate) fn render(&mut self, left: &mut [f32], right: &mut [f32], now: f64) {
        if let Some(chain) = self.chain.as_mut() {
            chain.render_into(left, right, now);
        }
    }
}
