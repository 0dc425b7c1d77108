pub mod automation; // Absolute-time scheduled parameter values
pub mod chain; // Signal chain construction, teardown, live updates
pub mod clock;
pub mod control; // Lock-free control messages into the engine
pub mod deck; // Track registry, fan-out verbs, render loop
pub mod dsp;
pub mod envelope; // Attack/decay and anchored release scheduling
pub mod error;
pub mod params; // Per-track parameter records
pub mod store; // Persisted configuration access
pub mod voice; // Per-track lifecycle state machine

/// Upper bound on frames rendered in one internal block.
pub const MAX_BLOCK_SIZE: usize = 2048;
