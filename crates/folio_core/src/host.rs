//! Single-threaded headless host
//!
//! [`Host`] bundles the document, the listener registry, the frame queue,
//! timers, viewport/pointer state and the cursor ownership resource. It is a
//! cheap `Rc` handle; callbacks receive `&Host` instead of capturing one, and
//! long-lived handles ([`NodeRef`], leases) hold a [`WeakHost`] so nothing
//! registered with the host keeps it alive.
//!
//! # Example
//!
//! ```rust
//! use folio_core::{EventKind, EventTarget, Host};
//!
//! let host = Host::default();
//! let id = host.add_listener(EventTarget::Window, EventKind::Scroll, |host, _| {
//!     assert!(host.viewport().scroll_y > 0.0);
//! });
//! host.scroll_to(120.0);
//! assert!(host.remove_listener(id));
//! ```

use crate::cursor::CursorState;
use crate::dom::{Document, NodeId, Style, Transform};
use crate::events::{Event, EventKind, EventTarget, ListenerId, ListenerRegistry};
use crate::frame::{FrameId, FrameQueue, TimerId, TimerQueue};
use crate::geometry::{Point, Rect, Viewport};
use indexmap::IndexMap;
use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

pub(crate) struct HostInner {
    pub(crate) document: RefCell<Document>,
    pub(crate) listeners: RefCell<ListenerRegistry>,
    pub(crate) frames: RefCell<FrameQueue>,
    pub(crate) timers: RefCell<TimerQueue>,
    pub(crate) cursor: RefCell<CursorState>,
    pub(crate) stylesheet: RefCell<IndexMap<String, String>>,
    viewport: Cell<Viewport>,
    pointer: Cell<Option<Point>>,
    now_ms: Cell<f64>,
    frame_count: Cell<u64>,
    invocations: Cell<u64>,
}

/// Handle to the headless host
#[derive(Clone)]
pub struct Host {
    pub(crate) inner: Rc<HostInner>,
}

impl Host {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            inner: Rc::new(HostInner {
                document: RefCell::new(Document::new()),
                listeners: RefCell::new(ListenerRegistry::new()),
                frames: RefCell::new(FrameQueue::new()),
                timers: RefCell::new(TimerQueue::new()),
                cursor: RefCell::new(CursorState::default()),
                stylesheet: RefCell::new(IndexMap::new()),
                viewport: Cell::new(viewport),
                pointer: Cell::new(None),
                now_ms: Cell::new(0.0),
                frame_count: Cell::new(0),
                invocations: Cell::new(0),
            }),
        }
    }

    pub fn downgrade(&self) -> WeakHost {
        WeakHost {
            inner: Rc::downgrade(&self.inner),
        }
    }

    // =========================================================================
    // Document access
    // =========================================================================

    /// Borrow the document. Do not hold the borrow across host calls.
    pub fn document(&self) -> Ref<'_, Document> {
        self.inner.document.borrow()
    }

    pub fn document_mut(&self) -> RefMut<'_, Document> {
        self.inner.document.borrow_mut()
    }

    pub fn root(&self) -> NodeId {
        self.document().root()
    }

    /// Create an element and append it to `parent`
    pub fn append_element(&self, parent: NodeId, tag: &str) -> NodeId {
        let mut doc = self.document_mut();
        let node = doc.create_element(tag);
        doc.append_child(parent, node);
        node
    }

    pub fn node(&self, id: NodeId) -> NodeRef {
        NodeRef {
            host: self.downgrade(),
            id,
        }
    }

    /// Layout rectangle relative to the viewport (document rect minus scroll)
    pub fn client_rect(&self, node: NodeId) -> Option<Rect> {
        let scroll_y = self.viewport().scroll_y;
        self.document().rect(node).map(|r| r.offset(0.0, -scroll_y))
    }

    // =========================================================================
    // Viewport, pointer and clock
    // =========================================================================

    pub fn viewport(&self) -> Viewport {
        self.inner.viewport.get()
    }

    /// Last known pointer position, if the pointer has moved inside the window
    pub fn pointer(&self) -> Option<Point> {
        self.inner.pointer.get()
    }

    /// Current host time in milliseconds
    pub fn now(&self) -> f64 {
        self.inner.now_ms.get()
    }

    /// Number of animation frames run so far
    pub fn frame_count(&self) -> u64 {
        self.inner.frame_count.get()
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    pub fn add_listener<F>(&self, target: EventTarget, kind: EventKind, callback: F) -> ListenerId
    where
        F: Fn(&Host, &Event) + 'static,
    {
        self.inner
            .listeners
            .borrow_mut()
            .add(target, kind, Rc::new(callback))
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.inner.listeners.borrow_mut().remove(id)
    }

    pub fn has_listener(&self, id: ListenerId) -> bool {
        self.inner.listeners.borrow().contains(id)
    }

    /// Total number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    pub fn listener_count_for(&self, target: EventTarget, kind: EventKind) -> usize {
        self.inner.listeners.borrow().count_for(target, kind)
    }

    /// Total number of listener invocations since creation
    pub fn listener_invocations(&self) -> u64 {
        self.inner.invocations.get()
    }

    /// Deliver an event to the listeners of one target
    pub fn dispatch(&self, target: EventTarget, event: Event) {
        self.apply_event_state(&event);
        self.deliver(target, &event);
    }

    fn deliver(&self, target: EventTarget, event: &Event) {
        let snapshot = self
            .inner
            .listeners
            .borrow()
            .snapshot(target, event.kind());
        for (id, callback) in snapshot {
            if !self.has_listener(id) {
                continue;
            }
            self.inner.invocations.set(self.inner.invocations.get() + 1);
            callback(self, event);
        }
    }

    fn apply_event_state(&self, event: &Event) {
        match *event {
            Event::Resize { width, height } => {
                let mut viewport = self.viewport();
                viewport.width = width;
                viewport.height = height;
                self.inner.viewport.set(viewport);
            }
            Event::Scroll { scroll_y } => {
                let mut viewport = self.viewport();
                viewport.scroll_y = scroll_y;
                self.inner.viewport.set(viewport);
            }
            Event::PointerMove { position, .. }
            | Event::PointerDown { position }
            | Event::PointerUp { position } => self.inner.pointer.set(Some(position)),
            Event::PointerEnter { .. } | Event::PointerLeave { .. } => {}
        }
    }

    /// Resize the window and notify resize listeners
    pub fn resize(&self, width: f32, height: f32) {
        self.dispatch(EventTarget::Window, Event::Resize { width, height });
    }

    /// Scroll the window and notify scroll listeners
    pub fn scroll_to(&self, scroll_y: f32) {
        self.dispatch(EventTarget::Window, Event::Scroll { scroll_y });
    }

    /// Move the pointer. Window listeners run first, then the target node and
    /// its ancestors (bubbling).
    pub fn pointer_move(&self, x: f32, y: f32, target: Option<NodeId>) {
        let event = Event::PointerMove {
            position: Point::new(x, y),
            target,
        };
        self.apply_event_state(&event);
        self.deliver(EventTarget::Window, &event);

        let mut current = target;
        while let Some(node) = current {
            self.deliver(EventTarget::Node(node), &event);
            current = self.document().parent(node);
        }
    }

    /// Pointer entered a node (does not bubble)
    pub fn pointer_enter(&self, node: NodeId) {
        let position = self.pointer().unwrap_or(Point::ZERO);
        self.dispatch(EventTarget::Node(node), Event::PointerEnter { position });
    }

    /// Pointer left a node (does not bubble)
    pub fn pointer_leave(&self, node: NodeId) {
        let position = self.pointer().unwrap_or(Point::ZERO);
        self.dispatch(EventTarget::Node(node), Event::PointerLeave { position });
    }

    /// Pointer left the window
    pub fn pointer_leave_window(&self) {
        let position = self.pointer().unwrap_or(Point::ZERO);
        self.dispatch(EventTarget::Window, Event::PointerLeave { position });
    }

    // =========================================================================
    // Frames and timers
    // =========================================================================

    pub fn request_frame<F>(&self, callback: F) -> FrameId
    where
        F: FnOnce(&Host, f64) + 'static,
    {
        self.inner.frames.borrow_mut().request(Box::new(callback))
    }

    pub fn cancel_frame(&self, id: FrameId) -> bool {
        self.inner.frames.borrow_mut().cancel(id)
    }

    pub fn is_frame_pending(&self, id: FrameId) -> bool {
        self.inner.frames.borrow().is_pending(id)
    }

    pub fn pending_frames(&self) -> usize {
        self.inner.frames.borrow().len()
    }

    pub fn set_timeout<F>(&self, delay_ms: f64, callback: F) -> TimerId
    where
        F: FnOnce(&Host) + 'static,
    {
        let due = self.now() + delay_ms.max(0.0);
        self.inner.timers.borrow_mut().set(due, Box::new(callback))
    }

    pub fn clear_timeout(&self, id: TimerId) -> bool {
        self.inner.timers.borrow_mut().clear(id)
    }

    pub fn is_timer_pending(&self, id: TimerId) -> bool {
        self.inner.timers.borrow().is_pending(id)
    }

    pub fn pending_timers(&self) -> usize {
        self.inner.timers.borrow().len()
    }

    /// Advance the clock by `dt_ms`, fire due timers, then run one frame
    pub fn advance(&self, dt_ms: f64) {
        let now = self.now() + dt_ms.max(0.0);
        self.inner.now_ms.set(now);

        let due = self.inner.timers.borrow().due(now);
        for id in due {
            let callback = self.inner.timers.borrow_mut().take(id);
            if let Some(callback) = callback {
                callback(self);
            }
        }

        let batch = self.inner.frames.borrow_mut().take_batch();
        for id in batch {
            let callback = self.inner.frames.borrow_mut().take(id);
            if let Some(callback) = callback {
                callback(self, now);
            }
        }
        self.inner.frame_count.set(self.inner.frame_count.get() + 1);
    }

    /// Run `frames` frames of `dt_ms` each
    pub fn run_frames(&self, frames: usize, dt_ms: f64) {
        for _ in 0..frames {
            self.advance(dt_ms);
        }
    }

    // =========================================================================
    // Injected stylesheet
    // =========================================================================

    /// Insert or replace a global stylesheet rule
    pub fn insert_rule(&self, id: &str, css: &str) {
        self.inner
            .stylesheet
            .borrow_mut()
            .insert(id.to_string(), css.to_string());
    }

    pub fn remove_rule(&self, id: &str) -> bool {
        self.inner.stylesheet.borrow_mut().shift_remove(id).is_some()
    }

    pub fn rule(&self, id: &str) -> Option<String> {
        self.inner.stylesheet.borrow().get(id).cloned()
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

/// A weak handle to the host
///
/// Held by anything that outlives a single callback. Operations on a weak
/// handle whose host is gone safely no-op.
#[derive(Clone)]
pub struct WeakHost {
    inner: Weak<HostInner>,
}

impl WeakHost {
    pub fn upgrade(&self) -> Option<Host> {
        self.inner.upgrade().map(|inner| Host { inner })
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

/// Imperative handle to one node
///
/// All per-frame writes go through this type. Every write first checks that
/// the node is still connected and does nothing otherwise, so a callback that
/// fires after its element was removed is harmless.
#[derive(Clone)]
pub struct NodeRef {
    host: WeakHost,
    id: NodeId,
}

impl NodeRef {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn host(&self) -> Option<Host> {
        self.host.upgrade()
    }

    pub fn is_connected(&self) -> bool {
        match self.host.upgrade() {
            Some(host) => {
                let connected = host.document().is_connected(self.id);
                connected
            }
            None => false,
        }
    }

    fn write<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut Style),
    {
        let Some(host) = self.host.upgrade() else {
            return false;
        };
        let mut doc = host.document_mut();
        if !doc.is_connected(self.id) {
            tracing::trace!("skipping style write to detached node {:?}", self.id);
            return false;
        }
        doc.update_style(self.id, f)
    }

    pub fn set_opacity(&self, opacity: f32) -> bool {
        self.write(|style| style.opacity = opacity)
    }

    pub fn set_transform(&self, transform: Transform) -> bool {
        self.write(|style| style.transform = transform)
    }

    /// Write opacity and transform in a single style update
    pub fn set_visual(&self, opacity: f32, transform: Transform) -> bool {
        self.write(|style| {
            style.opacity = opacity;
            style.transform = transform;
        })
    }

    pub fn set_property(&self, name: &str, value: &str) -> bool {
        self.write(|style| {
            style
                .properties
                .insert(name.to_string(), value.to_string());
        })
    }

    pub fn remove_property(&self, name: &str) -> bool {
        self.write(|style| {
            style.properties.shift_remove(name);
        })
    }

    /// Viewport-relative bounding box, None if detached
    pub fn measure(&self) -> Option<Rect> {
        let host = self.host.upgrade()?;
        if !host.document().is_connected(self.id) {
            return None;
        }
        host.client_rect(self.id)
    }

    /// Snapshot of the node's inline style
    pub fn style(&self) -> Option<Style> {
        let host = self.host.upgrade()?;
        let doc = host.document();
        doc.style(self.id).cloned()
    }
}
