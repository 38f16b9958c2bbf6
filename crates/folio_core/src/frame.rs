//! Animation frame queue and timers
//!
//! Frame callbacks are one-shot: a callback that wants to keep animating
//! requests another frame from inside itself. Callbacks queued while a frame
//! is running are deferred to the next frame.

use crate::host::Host;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a pending animation frame callback
    pub struct FrameId;
    /// Handle to a pending timer
    pub struct TimerId;
}

/// Frame callback, receives the frame timestamp in milliseconds
pub type FrameCallback = Box<dyn FnOnce(&Host, f64)>;

/// Timer callback
pub type TimerCallback = Box<dyn FnOnce(&Host)>;

/// Pending animation frame callbacks
#[derive(Default)]
pub struct FrameQueue {
    callbacks: SlotMap<FrameId, FrameCallback>,
    order: Vec<FrameId>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self, callback: FrameCallback) -> FrameId {
        let id = self.callbacks.insert(callback);
        self.order.push(id);
        id
    }

    /// Cancel a pending callback. Returns false if it already ran.
    pub fn cancel(&mut self, id: FrameId) -> bool {
        self.callbacks.remove(id).is_some()
    }

    /// Take the ids queued so far; later requests go to the next batch
    pub fn take_batch(&mut self) -> Vec<FrameId> {
        std::mem::take(&mut self.order)
    }

    /// Take a callback out of the queue (None if it was cancelled)
    pub fn take(&mut self, id: FrameId) -> Option<FrameCallback> {
        self.callbacks.remove(id)
    }

    pub fn is_pending(&self, id: FrameId) -> bool {
        self.callbacks.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

struct Timer {
    due_ms: f64,
    seq: u64,
    callback: TimerCallback,
}

/// Pending one-shot timers
#[derive(Default)]
pub struct TimerQueue {
    timers: SlotMap<TimerId, Timer>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, due_ms: f64, callback: TimerCallback) -> TimerId {
        self.next_seq += 1;
        self.timers.insert(Timer {
            due_ms,
            seq: self.next_seq,
            callback,
        })
    }

    /// Clear a pending timer. Returns false if it already fired.
    pub fn clear(&mut self, id: TimerId) -> bool {
        self.timers.remove(id).is_some()
    }

    /// Ids of timers due at `now_ms`, earliest first
    pub fn due(&self, now_ms: f64) -> Vec<TimerId> {
        let mut due: Vec<_> = self
            .timers
            .iter()
            .filter(|(_, t)| t.due_ms <= now_ms)
            .map(|(id, t)| (t.due_ms, t.seq, id))
            .collect();
        due.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        due.into_iter().map(|(_, _, id)| id).collect()
    }

    pub fn take(&mut self, id: TimerId) -> Option<TimerCallback> {
        self.timers.remove(id).map(|t| t.callback)
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}
