//! Pointer-following spotlight
//!
//! Publishes the pointer position relative to the anchor as CSS custom
//! properties so a radial gradient can follow it.

use folio_core::{EventKind, EventTarget, FrameSlot, Host, NodeId, NodeRef, Point, Rect, Scope};
use std::cell::Cell;
use std::rc::Rc;

pub const SPOTLIGHT_X: &str = "--spotlight-x";
pub const SPOTLIGHT_Y: &str = "--spotlight-y";
pub const SPOTLIGHT_OPACITY: &str = "--spotlight-opacity";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpotlightOptions {
    /// Time to fade out after the pointer leaves (ms)
    pub fade_ms: f64,
}

impl Default for SpotlightOptions {
    fn default() -> Self {
        Self { fade_ms: 300.0 }
    }
}

struct SpotlightInner {
    node: NodeRef,
    options: SpotlightOptions,
    rect: Cell<Option<Rect>>,
    opacity: Cell<f32>,
    inside: Cell<bool>,
    last_frame: Cell<Option<f64>>,
    frames: FrameSlot,
}

impl SpotlightInner {
    fn anchor(&self) -> Option<Rect> {
        if self.rect.get().is_none() {
            self.rect.set(self.node.measure());
        }
        self.rect.get()
    }

    fn pointer_moved(self: &Rc<Self>, host: &Host, pointer: Point) {
        let Some(rect) = self.anchor() else {
            return;
        };
        if rect.contains(pointer) {
            self.inside.set(true);
            self.opacity.set(1.0);
            self.last_frame.set(None);
            self.frames.cancel(host);
            self.node
                .set_property(SPOTLIGHT_X, &format!("{:.1}px", pointer.x - rect.left()));
            self.node
                .set_property(SPOTLIGHT_Y, &format!("{:.1}px", pointer.y - rect.top()));
            self.node.set_property(SPOTLIGHT_OPACITY, "1");
        } else {
            self.left(host);
        }
    }

    fn left(self: &Rc<Self>, host: &Host) {
        if !self.inside.replace(false) {
            return;
        }
        self.schedule_fade(host);
    }

    fn schedule_fade(self: &Rc<Self>, host: &Host) {
        let inner = Rc::clone(self);
        self.frames.schedule(host, move |host, now| inner.fade(host, now));
    }

    fn fade(self: &Rc<Self>, host: &Host, now: f64) {
        let dt = self
            .last_frame
            .replace(Some(now))
            .map(|last| now - last)
            .unwrap_or(16.0);
        let step = if self.options.fade_ms <= 0.0 {
            1.0
        } else {
            (dt / self.options.fade_ms) as f32
        };
        let opacity = (self.opacity.get() - step).max(0.0);
        self.opacity.set(opacity);
        if !self
            .node
            .set_property(SPOTLIGHT_OPACITY, &format!("{:.3}", opacity))
        {
            return;
        }
        if opacity > 0.0 {
            self.schedule_fade(host);
        } else {
            self.last_frame.set(None);
        }
    }
}

/// Tracks the pointer over an element
pub struct Spotlight {
    inner: Rc<SpotlightInner>,
    scope: Scope,
}

impl Spotlight {
    pub fn mount(host: &Host, node: NodeId, options: SpotlightOptions) -> Self {
        let inner = Rc::new(SpotlightInner {
            node: host.node(node),
            options,
            rect: Cell::new(None),
            opacity: Cell::new(0.0),
            inside: Cell::new(false),
            last_frame: Cell::new(None),
            frames: FrameSlot::new(),
        });
        inner.node.set_property(SPOTLIGHT_OPACITY, "0");

        let mut scope = Scope::new(host);
        scope.own_frames(&inner.frames);

        let spot = Rc::clone(&inner);
        scope.listen(EventTarget::Window, EventKind::PointerMove, move |host, event| {
            if let Some(pointer) = event.position() {
                spot.pointer_moved(host, pointer);
            }
        });
        let spot = Rc::clone(&inner);
        scope.listen(EventTarget::Window, EventKind::PointerLeave, move |host, _| {
            spot.left(host);
        });
        for kind in [EventKind::Scroll, EventKind::Resize] {
            let spot = Rc::clone(&inner);
            scope.listen(EventTarget::Window, kind, move |_, _| spot.rect.set(None));
        }

        Self { inner, scope }
    }

    pub fn opacity(&self) -> f32 {
        self.inner.opacity.get()
    }

    pub fn is_inside(&self) -> bool {
        self.inner.inside.get()
    }

    pub fn unmount(mut self) {
        self.scope.dispose();
        self.inner.node.set_property(SPOTLIGHT_OPACITY, "0");
    }
}
