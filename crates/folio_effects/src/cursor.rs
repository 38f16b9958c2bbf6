//! Custom cursor
//!
//! A floating node that trails the pointer and grows over interactive
//! elements. While mounted it holds a [`CursorLease`] so the native cursor
//! stays hidden.

use folio_core::{
    CursorLease, Document, Event, EventKind, EventTarget, FrameSlot, Host, NodeId, NodeRef,
    Point, Scope, Transform,
};
use std::cell::Cell;
use std::rc::Rc;

/// Owner name reported for the cursor lease
pub const CURSOR_OWNER: &str = "custom-cursor";
/// Attribute marking the cursor node
pub const CURSOR_ATTR: &str = "data-custom-cursor";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CursorOptions {
    /// Fraction of the remaining distance covered each frame
    pub lerp: f32,
    /// Scale while over an interactive element
    pub hover_scale: f32,
    /// Diameter of the cursor node (px)
    pub size: f32,
}

impl Default for CursorOptions {
    fn default() -> Self {
        Self {
            lerp: 0.15,
            hover_scale: 1.8,
            size: 24.0,
        }
    }
}

/// Links, buttons and anything marked `data-cursor="hover"`, checked on the
/// node and its ancestors
pub fn is_interactive(doc: &Document, node: NodeId) -> bool {
    doc.closest(node, |doc, id| {
        matches!(doc.tag(id), Some("a") | Some("button"))
            || doc.attribute(id, "data-cursor") == Some("hover")
    })
    .is_some()
}

struct CursorInner {
    node: NodeRef,
    options: CursorOptions,
    target: Cell<Point>,
    position: Cell<Option<Point>>,
    scale: Cell<f32>,
    hovering: Cell<bool>,
    visible: Cell<bool>,
    frames: FrameSlot,
}

impl CursorInner {
    fn moved(self: &Rc<Self>, host: &Host, event: &Event) {
        let Event::PointerMove { position, target } = *event else {
            return;
        };
        self.target.set(position);
        if self.position.get().is_none() {
            self.position.set(Some(position));
        }
        let hovering = target.is_some_and(|node| is_interactive(&host.document(), node));
        self.hovering.set(hovering);
        self.visible.set(true);
        self.schedule(host);
    }

    fn hide(self: &Rc<Self>, host: &Host) {
        self.visible.set(false);
        self.schedule(host);
    }

    fn schedule(self: &Rc<Self>, host: &Host) {
        let inner = Rc::clone(self);
        self.frames.schedule(host, move |host, _| inner.tick(host));
    }

    fn tick(self: &Rc<Self>, host: &Host) {
        let target = self.target.get();
        let current = self.position.get().unwrap_or(target);
        let lerp = self.options.lerp.clamp(0.0, 1.0);

        let mut next = Point::new(
            current.x + (target.x - current.x) * lerp,
            current.y + (target.y - current.y) * lerp,
        );
        if next.distance(target) < 0.1 {
            next = target;
        }
        self.position.set(Some(next));

        let goal = if self.hovering.get() {
            self.options.hover_scale
        } else {
            1.0
        };
        let mut scale = self.scale.get() + (goal - self.scale.get()) * lerp;
        if (scale - goal).abs() < 0.001 {
            scale = goal;
        }
        self.scale.set(scale);

        let half = self.options.size / 2.0;
        let opacity = if self.visible.get() { 1.0 } else { 0.0 };
        let transform = Transform::translate(next.x - half, next.y - half).with_scale(scale);
        if !self.node.set_visual(opacity, transform) {
            return;
        }

        if next != target || scale != goal {
            self.schedule(host);
        }
    }
}

/// Pointer-following cursor node
pub struct CustomCursor {
    inner: Rc<CursorInner>,
    scope: Scope,
    lease: Option<CursorLease>,
}

impl CustomCursor {
    /// Create the cursor node under the document root and take cursor
    /// ownership
    pub fn mount(host: &Host, options: CursorOptions) -> Self {
        let node = {
            let mut doc = host.document_mut();
            let node = doc.create_element("div");
            doc.set_attribute(node, CURSOR_ATTR, "");
            doc.set_attribute(node, "aria-hidden", "true");
            let root = doc.root();
            doc.append_child(root, node);
            node
        };
        let inner = Rc::new(CursorInner {
            node: host.node(node),
            options,
            target: Cell::new(Point::ZERO),
            position: Cell::new(None),
            scale: Cell::new(1.0),
            hovering: Cell::new(false),
            visible: Cell::new(false),
            frames: FrameSlot::new(),
        });
        inner.node.set_opacity(0.0);

        let mut scope = Scope::new(host);
        scope.own_frames(&inner.frames);

        let cursor = Rc::clone(&inner);
        scope.listen(EventTarget::Window, EventKind::PointerMove, move |host, event| {
            cursor.moved(host, event);
        });
        let cursor = Rc::clone(&inner);
        scope.listen(EventTarget::Window, EventKind::PointerLeave, move |host, _| {
            cursor.hide(host);
        });

        Self {
            inner,
            scope,
            lease: Some(host.acquire_cursor(CURSOR_OWNER)),
        }
    }

    pub fn node(&self) -> NodeId {
        self.inner.node.id()
    }

    pub fn position(&self) -> Option<Point> {
        self.inner.position.get()
    }

    pub fn scale(&self) -> f32 {
        self.inner.scale.get()
    }

    pub fn is_hovering(&self) -> bool {
        self.inner.hovering.get()
    }

    pub fn is_visible(&self) -> bool {
        self.inner.visible.get()
    }

    /// Stop following, remove the node and give the native cursor back
    pub fn unmount(mut self) {
        self.scope.dispose();
        if let Some(lease) = self.lease.take() {
            lease.release();
        }
        if let Some(host) = self.inner.node.host() {
            host.document_mut().delete(self.inner.node.id());
        }
    }
}
