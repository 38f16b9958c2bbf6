//! Hover intent
//!
//! Activates only after the pointer has stayed over an element for a delay,
//! so brushing past it does nothing.

use folio_core::{EventKind, EventTarget, Host, NodeId, Scope, TimerSlot};
use std::cell::Cell;
use std::rc::Rc;

/// Continuous hover required before activating (ms)
pub const HOVER_INTENT_DELAY_MS: f64 = 600.0;

type IntentCallback = Box<dyn Fn(&Host, bool)>;

struct HoverInner {
    active: Cell<bool>,
    timer: TimerSlot,
    delay_ms: f64,
    on_change: IntentCallback,
}

impl HoverInner {
    fn enter(self: &Rc<Self>, host: &Host) {
        let inner = Rc::clone(self);
        self.timer.restart(host, self.delay_ms, move |host| {
            if !inner.active.replace(true) {
                (inner.on_change)(host, true);
            }
        });
    }

    fn leave(&self, host: &Host) {
        self.timer.clear(host);
        if self.active.replace(false) {
            (self.on_change)(host, false);
        }
    }
}

/// Calls back with `true` after a sustained hover and `false` on leave
pub struct HoverIntent {
    inner: Rc<HoverInner>,
    scope: Scope,
}

impl HoverIntent {
    pub fn mount<F>(host: &Host, node: NodeId, delay_ms: f64, on_change: F) -> Self
    where
        F: Fn(&Host, bool) + 'static,
    {
        let inner = Rc::new(HoverInner {
            active: Cell::new(false),
            timer: TimerSlot::new(),
            delay_ms: delay_ms.max(0.0),
            on_change: Box::new(on_change),
        });

        let mut scope = Scope::new(host);
        scope.own_timers(&inner.timer);
        let hover = Rc::clone(&inner);
        scope.listen(EventTarget::Node(node), EventKind::PointerEnter, move |host, _| {
            hover.enter(host);
        });
        let hover = Rc::clone(&inner);
        scope.listen(EventTarget::Node(node), EventKind::PointerLeave, move |host, _| {
            hover.leave(host);
        });

        Self { inner, scope }
    }

    /// Mount with the default 600ms delay
    pub fn with_default_delay<F>(host: &Host, node: NodeId, on_change: F) -> Self
    where
        F: Fn(&Host, bool) + 'static,
    {
        Self::mount(host, node, HOVER_INTENT_DELAY_MS, on_change)
    }

    pub fn is_active(&self) -> bool {
        self.inner.active.get()
    }

    pub fn is_pending(&self, host: &Host) -> bool {
        self.inner.timer.is_pending(host)
    }

    pub fn unmount(mut self) {
        self.scope.dispose();
    }
}
