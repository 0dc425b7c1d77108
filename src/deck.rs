//! Track registry and render loop.
//!
//! The deck owns every voice, hands out identities, fans the global verbs
//! out per voice, and drives rendering: mix all live chains, advance the
//! clock, then run any teardown whose deadline has passed. All of it runs
//! on one control/render context; the only deferred work is the
//! release-delayed teardown, and that is a deadline checked each block, not
//! a background timer.

use tracing::{debug, warn};

use crate::{
    clock::SampleClock,
    control::{ControlMsg, MessageReceiver},
    error::{ChainError, ConfigError, PersistError, TrackFault},
    params::{ParamChange, TrackId, TrackParams},
    store::{ConfigStore, LoadOutcome},
    voice::{Voice, VoiceState},
    MAX_BLOCK_SIZE,
};

pub struct Deck {
    /// Registered voices, in display order.
    voices: Vec<Voice>,
    /// Removed voices whose chains are still releasing. Invisible to every
    /// query; discarded once their scheduled teardown runs.
    draining: Vec<Voice>,
    next_id: u64,
    clock: SampleClock,
}

impl Deck {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            voices: Vec::new(),
            draining: Vec::new(),
            next_id: 0,
            clock: SampleClock::new(sample_rate),
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.clock.sample_rate()
    }

    /// Current engine time in seconds.
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    fn push_voice(&mut self, params: TrackParams) -> TrackId {
        let id = TrackId(self.next_id);
        self.next_id += 1;
        self.voices.push(Voice::new(id, params));
        id
    }

    fn voice_mut(&mut self, id: TrackId) -> Option<&mut Voice> {
        self.voices.iter_mut().find(|v| v.id() == id)
    }

    /// Append a new track with default parameters and a fresh identity.
    pub fn create_track(&mut self) -> TrackId {
        let id = self.push_voice(TrackParams::default());
        debug!(track = %id, "track created");
        id
    }

    /// Unregister a track immediately. A Sounding voice is forced through
    /// stop first; its chain keeps draining until the originally scheduled
    /// teardown deadline. Returns false for an unknown id.
    pub fn remove_track(&mut self, id: TrackId) -> bool {
        let Some(pos) = self.voices.iter().position(|v| v.id() == id) else {
            return false;
        };

        let mut voice = self.voices.remove(pos);
        voice.begin_removal(self.clock.now());
        if voice.is_idle() {
            debug!(track = %id, "track removed");
        } else {
            self.draining.push(voice);
            debug!(track = %id, "track removed, chain draining");
        }
        true
    }

    /// Start one track. Unknown ids are a no-op: the verb may legitimately
    /// race a removal.
    pub fn start_track(&mut self, id: TrackId) -> Result<(), ChainError> {
        let now = self.clock.now();
        let sample_rate = self.clock.sample_rate();
        match self.voice_mut(id) {
            Some(voice) => voice.start(sample_rate, now),
            None => Ok(()),
        }
    }

    /// Stop one track. Unknown ids and invalid states are no-ops.
    pub fn stop_track(&mut self, id: TrackId) {
        let now = self.clock.now();
        if let Some(voice) = self.voice_mut(id) {
            voice.stop(now);
        }
    }

    /// Start every track in display order. One track's failure does not
    /// block the rest; failures come back collected.
    pub fn play_all(&mut self) -> Vec<TrackFault> {
        let now = self.clock.now();
        let sample_rate = self.clock.sample_rate();
        let mut faults = Vec::new();
        for voice in &mut self.voices {
            if let Err(error) = voice.start(sample_rate, now) {
                warn!(track = %voice.id(), %error, "failed to start track");
                faults.push(TrackFault {
                    id: voice.id(),
                    error,
                });
            }
        }
        faults
    }

    /// Stop every track in display order.
    pub fn stop_all(&mut self) {
        let now = self.clock.now();
        for voice in &mut self.voices {
            voice.stop(now);
        }
    }

    /// Write a field edit into a track's record; while the track has a live
    /// chain the edit is pushed into it as well.
    pub fn set_param(&mut self, id: TrackId, change: ParamChange) {
        if let Some(voice) = self.voice_mut(id) {
            voice.set_param(change);
        }
    }

    // --- read surface for a UI ---

    pub fn voice_state(&self, id: TrackId) -> Option<VoiceState> {
        self.voices.iter().find(|v| v.id() == id).map(Voice::state)
    }

    pub fn params(&self, id: TrackId) -> Option<&TrackParams> {
        self.voices.iter().find(|v| v.id() == id).map(Voice::params)
    }

    /// Registered tracks in display order.
    pub fn tracks(&self) -> impl Iterator<Item = (TrackId, &TrackParams, VoiceState)> {
        self.voices.iter().map(|v| (v.id(), v.params(), v.state()))
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// Chains currently allocated, registered or draining. Diagnostic.
    pub fn live_chain_count(&self) -> usize {
        self.voices
            .iter()
            .chain(self.draining.iter())
            .filter(|v| v.has_chain())
            .count()
    }

    // --- persistence ---

    /// Ordered parameter records, identity-free, ready for persistence.
    pub fn snapshot(&self) -> Vec<TrackParams> {
        self.voices.iter().map(|v| *v.params()).collect()
    }

    pub fn serialize_config(&self) -> Result<String, ConfigError> {
        serde_json::to_string(&self.snapshot()).map_err(ConfigError::Malformed)
    }

    /// Replace the whole registry: stop and discard every current voice,
    /// reset the identity counter, then create one fresh voice per record
    /// in order. Release tails of the discarded voices drain to completion.
    pub fn restore(&mut self, records: Vec<TrackParams>) {
        let now = self.clock.now();
        for mut voice in std::mem::take(&mut self.voices) {
            voice.begin_removal(now);
            if !voice.is_idle() {
                self.draining.push(voice);
            }
        }

        self.next_id = 0;
        let count = records.len();
        for params in records {
            self.push_voice(params);
        }
        debug!(count, "registry restored");
    }

    /// Parse and restore. A malformed blob fails loudly here, before any
    /// existing track is touched.
    pub fn restore_config(&mut self, blob: &str) -> Result<usize, ConfigError> {
        let records: Vec<TrackParams> =
            serde_json::from_str(blob).map_err(ConfigError::Malformed)?;
        let count = records.len();
        self.restore(records);
        Ok(count)
    }

    pub fn save_to<S: ConfigStore>(&self, store: &mut S) -> Result<(), PersistError> {
        let blob = self.serialize_config()?;
        store.save(&blob)?;
        Ok(())
    }

    /// Load from the store. An absent blob is the normal "nothing saved"
    /// outcome, not a failure.
    pub fn load_from<S: ConfigStore>(&mut self, store: &S) -> Result<LoadOutcome, PersistError> {
        match store.load()? {
            None => Ok(LoadOutcome::NothingSaved),
            Some(blob) => {
                let count = self.restore_config(&blob)?;
                Ok(LoadOutcome::Restored(count))
            }
        }
    }

    // --- control + rendering ---

    /// Apply queued control messages in arrival order. Start failures are
    /// collected, never silently dropped.
    pub fn drain_control<R: MessageReceiver>(&mut self, rx: &mut R) -> Vec<TrackFault> {
        let mut faults = Vec::new();
        while let Some(msg) = rx.pop() {
            match msg {
                ControlMsg::Start(id) => {
                    if let Err(error) = self.start_track(id) {
                        warn!(track = %id, %error, "failed to start track");
                        faults.push(TrackFault { id, error });
                    }
                }
                ControlMsg::Stop(id) => self.stop_track(id),
                ControlMsg::Remove(id) => {
                    self.remove_track(id);
                }
                ControlMsg::PlayAll => faults.extend(self.play_all()),
                ControlMsg::StopAll => self.stop_all(),
                ControlMsg::Set(id, change) => self.set_param(id, change),
            }
        }
        faults
    }

    /// Render one stereo block, overwrite both buffers, advance the clock,
    /// and run teardowns that came due. Buffers must be equal length.
    pub fn render_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        let frames = left.len().min(right.len());
        left[..frames].fill(0.0);
        right[..frames].fill(0.0);

        let mut offset = 0;
        while offset < frames {
            let chunk = (frames - offset).min(MAX_BLOCK_SIZE);
            let now = self.clock.now();
            let chunk_l = &mut left[offset..offset + chunk];
            let chunk_r = &mut right[offset..offset + chunk];

            for voice in self.voices.iter_mut().chain(self.draining.iter_mut()) {
                voice.render(chunk_l, chunk_r, now);
            }

            self.clock.advance(chunk);
            let after = self.clock.now();
            for voice in self.voices.iter_mut().chain(self.draining.iter_mut()) {
                voice.finalize(after);
            }

            offset += chunk;
        }

        self.draining.retain(|v| !v.is_idle());
    }
}
