//! Scoped effects
//!
//! A [`Scope`] owns everything a component registers with the host:
//! listeners, pending frames, timers and arbitrary cleanups. Disposing the
//! scope (explicitly or by dropping it) releases them in reverse order, once.
//!
//! ```rust
//! use folio_core::{EventKind, EventTarget, Host, Scope};
//!
//! let host = Host::default();
//! let mut scope = Scope::new(&host);
//! scope.listen(EventTarget::Window, EventKind::Resize, |_, _| {});
//! assert_eq!(host.listener_count(), 1);
//!
//! scope.dispose();
//! assert_eq!(host.listener_count(), 0);
//! ```

use crate::events::{Event, EventKind, EventTarget, ListenerId};
use crate::frame::{FrameId, TimerId};
use crate::host::{Host, WeakHost};
use std::cell::Cell;
use std::rc::Rc;

enum Disposer {
    Listener(ListenerId),
    Frames(FrameSlot),
    Timers(TimerSlot),
    Custom(Box<dyn FnOnce()>),
}

/// Liveness flag shared with callbacks created inside a scope
#[derive(Clone)]
pub struct AliveToken(Rc<Cell<bool>>);

impl AliveToken {
    pub fn is_alive(&self) -> bool {
        self.0.get()
    }
}

/// Owner of a component's host registrations
pub struct Scope {
    host: WeakHost,
    disposers: Vec<Disposer>,
    alive: Rc<Cell<bool>>,
}

impl Scope {
    pub fn new(host: &Host) -> Self {
        Self {
            host: host.downgrade(),
            disposers: Vec::new(),
            alive: Rc::new(Cell::new(true)),
        }
    }

    /// Register a listener owned by this scope
    ///
    /// Returns None if the host has already been dropped.
    pub fn listen<F>(
        &mut self,
        target: EventTarget,
        kind: EventKind,
        callback: F,
    ) -> Option<ListenerId>
    where
        F: Fn(&Host, &Event) + 'static,
    {
        let Some(host) = self.host.upgrade() else {
            tracing::warn!("listener registered on a dropped host");
            return None;
        };
        let alive = self.alive_token();
        let id = host.add_listener(target, kind, move |host, event| {
            if alive.is_alive() {
                callback(host, event);
            }
        });
        self.disposers.push(Disposer::Listener(id));
        Some(id)
    }

    /// Cancel `slot`'s pending frame when the scope is disposed
    pub fn own_frames(&mut self, slot: &FrameSlot) {
        self.disposers.push(Disposer::Frames(slot.clone()));
    }

    /// Clear `slot`'s pending timer when the scope is disposed
    pub fn own_timers(&mut self, slot: &TimerSlot) {
        self.disposers.push(Disposer::Timers(slot.clone()));
    }

    /// Run `f` when the scope is disposed
    pub fn on_cleanup<F>(&mut self, f: F)
    where
        F: FnOnce() + 'static,
    {
        self.disposers.push(Disposer::Custom(Box::new(f)));
    }

    pub fn alive_token(&self) -> AliveToken {
        AliveToken(Rc::clone(&self.alive))
    }

    pub fn is_disposed(&self) -> bool {
        !self.alive.get()
    }

    /// Number of registrations still owned
    pub fn len(&self) -> usize {
        self.disposers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.disposers.is_empty()
    }

    /// Release every registration in reverse order
    pub fn dispose(&mut self) {
        if self.is_disposed() {
            return;
        }
        self.alive.set(false);
        let host = self.host.upgrade();
        while let Some(disposer) = self.disposers.pop() {
            match disposer {
                Disposer::Listener(id) => {
                    if let Some(host) = &host {
                        host.remove_listener(id);
                    }
                }
                Disposer::Frames(slot) => {
                    if let Some(host) = &host {
                        slot.cancel(host);
                    }
                }
                Disposer::Timers(slot) => {
                    if let Some(host) = &host {
                        slot.clear(host);
                    }
                }
                Disposer::Custom(f) => f(),
            }
        }
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// At most one pending animation frame, shared between a component and the
/// callbacks it schedules
#[derive(Clone, Default)]
pub struct FrameSlot(Rc<Cell<Option<FrameId>>>);

impl FrameSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `callback` unless a frame is already pending
    pub fn schedule<F>(&self, host: &Host, callback: F) -> bool
    where
        F: FnOnce(&Host, f64) + 'static,
    {
        if let Some(id) = self.0.get() {
            if host.is_frame_pending(id) {
                return false;
            }
        }
        let slot = self.clone();
        let id = host.request_frame(move |host, now| {
            slot.0.set(None);
            callback(host, now);
        });
        self.0.set(Some(id));
        true
    }

    pub fn is_pending(&self, host: &Host) -> bool {
        self.0.get().is_some_and(|id| host.is_frame_pending(id))
    }

    pub fn cancel(&self, host: &Host) {
        if let Some(id) = self.0.take() {
            host.cancel_frame(id);
        }
    }
}

/// At most one pending timer (debounce)
#[derive(Clone, Default)]
pub struct TimerSlot(Rc<Cell<Option<TimerId>>>);

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any pending timer with a new one
    pub fn restart<F>(&self, host: &Host, delay_ms: f64, callback: F)
    where
        F: FnOnce(&Host) + 'static,
    {
        self.clear(host);
        let slot = self.clone();
        let id = host.set_timeout(delay_ms, move |host| {
            slot.0.set(None);
            callback(host);
        });
        self.0.set(Some(id));
    }

    pub fn is_pending(&self, host: &Host) -> bool {
        self.0.get().is_some_and(|id| host.is_timer_pending(id))
    }

    pub fn clear(&self, host: &Host) {
        if let Some(id) = self.0.take() {
            host.clear_timeout(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispose_removes_listeners_and_frames() {
        let host = Host::default();
        let mut scope = Scope::new(&host);
        let frames = FrameSlot::new();
        scope.own_frames(&frames);
        scope.listen(EventTarget::Window, EventKind::Scroll, |_, _| {});
        frames.schedule(&host, |_, _| {});

        assert_eq!(host.listener_count(), 1);
        assert_eq!(host.pending_frames(), 1);

        scope.dispose();
        assert_eq!(host.listener_count(), 0);
        assert_eq!(host.pending_frames(), 0);
        assert!(scope.is_disposed());
    }

    #[test]
    fn test_drop_disposes() {
        let host = Host::default();
        let cleaned = Rc::new(Cell::new(false));
        {
            let mut scope = Scope::new(&host);
            let flag = cleaned.clone();
            scope.on_cleanup(move || flag.set(true));
            scope.listen(EventTarget::Window, EventKind::Resize, |_, _| {});
        }
        assert!(cleaned.get());
        assert_eq!(host.listener_count(), 0);
    }

    #[test]
    fn test_cleanup_runs_in_reverse_order() {
        let host = Host::default();
        let order = Rc::new(std::cell::RefCell::new(Vec::new()));
        let mut scope = Scope::new(&host);
        for n in 0..3 {
            let order = order.clone();
            scope.on_cleanup(move || order.borrow_mut().push(n));
        }
        scope.dispose();
        scope.dispose();
        assert_eq!(*order.borrow(), vec![2, 1, 0]);
    }

    #[test]
    fn test_frame_slot_keeps_one_pending() {
        let host = Host::default();
        let slot = FrameSlot::new();
        assert!(slot.schedule(&host, |_, _| {}));
        assert!(!slot.schedule(&host, |_, _| {}));
        assert_eq!(host.pending_frames(), 1);

        host.advance(16.0);
        assert!(!slot.is_pending(&host));
        assert!(slot.schedule(&host, |_, _| {}));
    }

    #[test]
    fn test_timer_slot_restart_debounces() {
        let host = Host::default();
        let slot = TimerSlot::new();
        let fired = Rc::new(Cell::new(0));

        let counter = fired.clone();
        slot.restart(&host, 100.0, move |_| counter.set(counter.get() + 1));
        host.advance(80.0);
        let counter = fired.clone();
        slot.restart(&host, 100.0, move |_| counter.set(counter.get() + 1));
        host.advance(80.0);
        assert_eq!(fired.get(), 0);
        host.advance(30.0);
        assert_eq!(fired.get(), 1);
    }
}
