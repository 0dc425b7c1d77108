//! Allocation-free render primitives used by the signal chain.
//!
//! These stay focused on the per-sample math. Chain assembly, envelope
//! scheduling, and lifecycle all live above them.

/// State-variable filter with lowpass/highpass/bandpass responses.
pub mod filter;
/// Audio-band oscillator waveforms.
pub mod oscillator;
/// Equal-power stereo placement.
pub mod pan;
