//! Scroll parallax

use folio_core::{EventKind, EventTarget, FrameSlot, Host, NodeId, NodeRef, Scope, Transform};
use std::cell::Cell;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParallaxOptions {
    /// Positive values drift against the scroll direction
    pub speed: f32,
    /// Largest offset in either direction (px)
    pub max_offset: f32,
}

impl Default for ParallaxOptions {
    fn default() -> Self {
        Self {
            speed: 0.2,
            max_offset: 120.0,
        }
    }
}

impl ParallaxOptions {
    /// Offset for an anchor whose centre sits at `anchor_center_y` in a
    /// viewport of `viewport_height`
    pub fn offset(&self, anchor_center_y: f32, viewport_height: f32) -> f32 {
        let raw = (anchor_center_y - viewport_height / 2.0) * -self.speed;
        raw.clamp(-self.max_offset.abs(), self.max_offset.abs())
    }
}

struct ParallaxInner {
    node: NodeRef,
    options: ParallaxOptions,
    applied: Cell<Option<f32>>,
    frames: FrameSlot,
}

impl ParallaxInner {
    fn request(self: &Rc<Self>, host: &Host) {
        let inner = Rc::clone(self);
        self.frames.schedule(host, move |host, _| inner.update(host));
    }

    fn update(&self, host: &Host) {
        let Some(rect) = self.node.measure() else {
            return;
        };
        let offset = self
            .options
            .offset(rect.center().y, host.viewport().height);
        if self.applied.get() == Some(offset) {
            return;
        }
        if self.node.set_transform(Transform::translate(0.0, offset)) {
            self.applied.set(Some(offset));
        }
    }
}

/// Moves an element at a different rate than the page scrolls
pub struct Parallax {
    inner: Rc<ParallaxInner>,
    scope: Scope,
}

impl Parallax {
    pub fn mount(host: &Host, node: NodeId, options: ParallaxOptions) -> Self {
        let inner = Rc::new(ParallaxInner {
            node: host.node(node),
            options,
            applied: Cell::new(None),
            frames: FrameSlot::new(),
        });

        let mut scope = Scope::new(host);
        scope.own_frames(&inner.frames);
        for kind in [EventKind::Scroll, EventKind::Resize] {
            let parallax = Rc::clone(&inner);
            scope.listen(EventTarget::Window, kind, move |host, _| {
                parallax.request(host);
            });
        }
        inner.request(host);

        Self { inner, scope }
    }

    /// Last offset written, if any
    pub fn offset(&self) -> Option<f32> {
        self.inner.applied.get()
    }

    /// Stops tracking and puts the element back where layout placed it
    pub fn unmount(mut self) {
        self.scope.dispose();
        if self.inner.applied.take().is_some() {
            self.inner.node.set_transform(Transform::IDENTITY);
        }
    }
}
