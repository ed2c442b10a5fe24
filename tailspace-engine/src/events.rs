//! Real-time diagnostics.
//!
//! The audio thread must not log: formatting allocates and logger backends
//! take locks. Instead it pushes small `Copy` events into a wait-free SPSC ring
//! (`rtrb`), and the control side drains them into the `log` facade whenever it
//! likes.

use rtrb::{Consumer, Producer, RingBuffer};

/// Something noteworthy that happened inside `process_block`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RtEvent {
    /// Non-finite output detected; kernel state was cleared and the block muted.
    NumericFault { block_index: u64 },
    /// The caller passed buffers shorter than `frame_count`; only `processed`
    /// frames were handled.
    ShortBuffer { requested: usize, processed: usize },
    /// The engine observed `enabled == false` and switched to passthrough.
    Bypassed,
    /// The engine observed `enabled == true` again.
    Resumed,
}

/// Producer half, owned by the engine on the audio thread.
#[derive(Debug)]
pub(crate) struct EventSink {
    producer: Producer<RtEvent>,
    dropped: u64,
}

impl EventSink {
    /// Non-blocking; when the ring is full the event is counted and discarded.
    #[inline]
    pub(crate) fn push(&mut self, event: RtEvent) {
        if self.producer.push(event).is_err() {
            self.dropped += 1;
        }
    }

    #[inline]
    pub(crate) fn dropped(&self) -> u64 {
        self.dropped
    }
}

/// Consumer half, handed to the control side.
#[derive(Debug)]
pub struct EventLog {
    consumer: Consumer<RtEvent>,
}

impl EventLog {
    /// Next pending event, if any.
    #[inline]
    pub fn pop(&mut self) -> Option<RtEvent> {
        self.consumer.pop().ok()
    }

    /// Number of events currently queued.
    #[inline]
    pub fn pending(&self) -> usize {
        self.consumer.slots()
    }

    /// Pop every pending event and forward it to the `log` facade.
    /// Returns how many were drained.
    pub fn drain(&mut self) -> usize {
        let mut n = 0;
        while let Some(ev) = self.pop() {
            match ev {
                RtEvent::NumericFault { block_index } => {
                    log::warn!("reverb: numeric fault in block {block_index}, state reset and block muted")
                }
                RtEvent::ShortBuffer { requested, processed } => {
                    log::warn!("reverb: short buffer, {processed} of {requested} frames processed")
                }
                RtEvent::Bypassed => log::debug!("reverb: bypassed"),
                RtEvent::Resumed => log::debug!("reverb: resumed"),
            }
            n += 1;
        }
        n
    }

    /// Drain into a caller-supplied closure instead of the logger.
    pub fn drain_with(&mut self, mut f: impl FnMut(RtEvent)) -> usize {
        let mut n = 0;
        while let Some(ev) = self.pop() {
            f(ev);
            n += 1;
        }
        n
    }
}

/// Allocate a ring with `capacity` slots (at least one).
pub(crate) fn channel(capacity: usize) -> (EventSink, EventLog) {
    let (producer, consumer) = RingBuffer::new(capacity.max(1));
    (EventSink { producer, dropped: 0 }, EventLog { consumer })
}
