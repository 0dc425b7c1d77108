//! Control messages crossing from a UI thread into the engine.
//!
//! The deck itself is single-context: verbs are plain method calls. When the
//! deck lives inside an audio callback, a lock-free SPSC queue carries the
//! verbs over; the deck drains it at block boundaries, so per-track
//! operations apply in exactly the order they were sent.

#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, RingBuffer};

use crate::params::{ParamChange, TrackId};

#[derive(Debug, Clone, Copy)]
pub enum ControlMsg {
    Start(TrackId),
    Stop(TrackId),
    Remove(TrackId),
    PlayAll,
    StopAll,
    Set(TrackId, ParamChange),
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<ControlMsg>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<ControlMsg> {
    fn pop(&mut self) -> Option<ControlMsg> {
        Consumer::pop(self).ok()
    }
}

/// Producer/consumer pair for control messages. The producer stays with the
/// UI/control side; the consumer goes wherever the deck renders.
#[cfg(feature = "rtrb")]
pub fn control_link(capacity: usize) -> (Producer<ControlMsg>, Consumer<ControlMsg>) {
    RingBuffer::new(capacity)
}
