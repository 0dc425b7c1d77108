use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of one track. Assigned by the registry, monotonically
/// increasing, and never handed out twice while the registry lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(pub u64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterShape {
    Lowpass,
    Highpass,
    Bandpass,
}

/// One track's full configuration: pitch, timbre, placement, filter, and
/// envelope timings. This record is the sole unit of persistence; its
/// serialized form is the wire contract (camelCase field names, lowercase
/// enum strings), so renames here are format changes.
///
/// The record itself does not validate ranges. Out-of-range values are
/// tolerated and clamped where the render math requires it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackParams {
    /// Oscillator pitch in Hz (nominal range 20..20000).
    pub frequency: f32,
    pub waveform: Waveform,
    /// Output level, 0..1.
    pub volume: f32,
    /// Stereo position, -1 (hard left) .. 1 (hard right).
    pub pan: f32,
    /// Pitch offset in cents (100 cents = one semitone).
    pub detune: f32,
    pub is_muted: bool,
    /// Seconds from silence to full level.
    pub attack: f32,
    /// Seconds from full level down to the sustain level.
    pub decay: f32,
    /// Held level as a fraction of volume, 0..1.
    pub sustain: f32,
    /// Seconds from the level at stop down to silence.
    pub release: f32,
    pub filter_type: FilterShape,
    /// Filter cutoff/center in Hz.
    pub filter_freq: f32,
    /// Filter quality factor (nominal range 0.001..100).
    pub filter_q: f32,
}

impl Default for TrackParams {
    fn default() -> Self {
        Self {
            frequency: 440.0,
            waveform: Waveform::Sine,
            volume: 0.5,
            pan: 0.0,
            detune: 0.0,
            is_muted: false,
            attack: 0.1,
            decay: 0.1,
            sustain: 0.5,
            release: 0.1,
            filter_type: FilterShape::Lowpass,
            filter_freq: 1000.0,
            filter_q: 1.0,
        }
    }
}

impl TrackParams {
    /// The gain target the chain aims for: zero while muted, `volume`
    /// otherwise.
    pub fn effective_volume(&self) -> f32 {
        if self.is_muted {
            0.0
        } else {
            self.volume
        }
    }

    /// Write one field edit into the record. Total: every change applies,
    /// whatever the track's lifecycle state.
    pub fn apply(&mut self, change: &ParamChange) {
        match *change {
            ParamChange::Frequency(hz) => self.frequency = hz,
            ParamChange::Waveform(waveform) => self.waveform = waveform,
            ParamChange::Volume(volume) => self.volume = volume,
            ParamChange::Pan(pan) => self.pan = pan,
            ParamChange::Detune(cents) => self.detune = cents,
            ParamChange::Muted(muted) => self.is_muted = muted,
            ParamChange::Attack(secs) => self.attack = secs,
            ParamChange::Decay(secs) => self.decay = secs,
            ParamChange::Sustain(level) => self.sustain = level,
            ParamChange::Release(secs) => self.release = secs,
            ParamChange::FilterType(shape) => self.filter_type = shape,
            ParamChange::FilterFreq(hz) => self.filter_freq = hz,
            ParamChange::FilterQ(q) => self.filter_q = q,
        }
    }
}

/// Field-level setter vocabulary: one variant per record field. This is the
/// whole write surface a UI gets, and the only shape the live-update path
/// accepts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamChange {
    Frequency(f32),
    Waveform(Waveform),
    Volume(f32),
    Pan(f32),
    Detune(f32),
    Muted(bool),
    Attack(f32),
    Decay(f32),
    Sustain(f32),
    Release(f32),
    FilterType(FilterShape),
    FilterFreq(f32),
    FilterQ(f32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format_uses_camel_case_and_lowercase_enums() {
        let json = serde_json::to_string(&TrackParams::default()).unwrap();

        assert!(json.contains("\"isMuted\":false"), "got {json}");
        assert!(json.contains("\"filterType\":\"lowpass\""), "got {json}");
        assert!(json.contains("\"filterFreq\":1000.0"), "got {json}");
        assert!(json.contains("\"filterQ\":1.0"), "got {json}");
        assert!(json.contains("\"waveform\":\"sine\""), "got {json}");
    }

    #[test]
    fn wire_format_round_trips() {
        let mut params = TrackParams::default();
        params.frequency = 880.0;
        params.waveform = Waveform::Sawtooth;
        params.is_muted = true;
        params.filter_type = FilterShape::Bandpass;

        let json = serde_json::to_string(&params).unwrap();
        let back: TrackParams = serde_json::from_str(&json).unwrap();
        assert_eq!(params, back);
    }

    #[test]
    fn rejects_unknown_waveform_strings() {
        let json = r#"{"frequency":440.0,"waveform":"pulse","volume":0.5,
            "pan":0.0,"detune":0.0,"isMuted":false,"attack":0.1,"decay":0.1,
            "sustain":0.5,"release":0.1,"filterType":"lowpass",
            "filterFreq":1000.0,"filterQ":1.0}"#;
        assert!(serde_json::from_str::<TrackParams>(json).is_err());
    }

    #[test]
    fn apply_writes_each_field() {
        let mut params = TrackParams::default();
        params.apply(&ParamChange::Frequency(220.0));
        params.apply(&ParamChange::Muted(true));
        params.apply(&ParamChange::FilterQ(12.0));

        assert_eq!(params.frequency, 220.0);
        assert!(params.is_muted);
        assert_eq!(params.filter_q, 12.0);
        assert_eq!(params.effective_volume(), 0.0);

        params.apply(&ParamChange::Muted(false));
        assert_eq!(params.effective_volume(), 0.5);
    }
}
