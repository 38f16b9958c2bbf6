//! Input events and the listener registry
//!
//! Listeners are keyed by target (window or node) and event kind. Dispatch
//! takes a snapshot of matching listeners and calls them in registration
//! order, skipping any listener removed while the dispatch is running.

use crate::dom::NodeId;
use crate::geometry::Point;
use crate::host::Host;
use indexmap::IndexMap;
use smallvec::SmallVec;
use std::rc::Rc;

/// Kind of input event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    PointerMove,
    PointerEnter,
    PointerLeave,
    PointerDown,
    PointerUp,
    Scroll,
    Resize,
}

/// Where a listener is attached
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Window,
    Node(NodeId),
}

/// An input event delivered to listeners
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    PointerMove {
        position: Point,
        /// Topmost node under the pointer, if known
        target: Option<NodeId>,
    },
    PointerEnter {
        position: Point,
    },
    PointerLeave {
        position: Point,
    },
    PointerDown {
        position: Point,
    },
    PointerUp {
        position: Point,
    },
    Scroll {
        scroll_y: f32,
    },
    Resize {
        width: f32,
        height: f32,
    },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::PointerMove { .. } => EventKind::PointerMove,
            Event::PointerEnter { .. } => EventKind::PointerEnter,
            Event::PointerLeave { .. } => EventKind::PointerLeave,
            Event::PointerDown { .. } => EventKind::PointerDown,
            Event::PointerUp { .. } => EventKind::PointerUp,
            Event::Scroll { .. } => EventKind::Scroll,
            Event::Resize { .. } => EventKind::Resize,
        }
    }

    /// Pointer position carried by pointer events
    pub fn position(&self) -> Option<Point> {
        match *self {
            Event::PointerMove { position, .. }
            | Event::PointerEnter { position }
            | Event::PointerLeave { position }
            | Event::PointerDown { position }
            | Event::PointerUp { position } => Some(position),
            Event::Scroll { .. } | Event::Resize { .. } => None,
        }
    }
}

/// Listener callback
pub type ListenerCallback = Rc<dyn Fn(&Host, &Event)>;

/// Handle to a registered listener
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

struct Listener {
    target: EventTarget,
    kind: EventKind,
    callback: ListenerCallback,
}

/// Registry of event listeners, ordered by registration
#[derive(Default)]
pub struct ListenerRegistry {
    next_id: u64,
    listeners: IndexMap<ListenerId, Listener>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        target: EventTarget,
        kind: EventKind,
        callback: ListenerCallback,
    ) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.insert(
            id,
            Listener {
                target,
                kind,
                callback,
            },
        );
        id
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        self.listeners.shift_remove(&id).is_some()
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.listeners.contains_key(&id)
    }

    /// Listeners currently registered for a target and kind, in order
    pub fn snapshot(
        &self,
        target: EventTarget,
        kind: EventKind,
    ) -> SmallVec<[(ListenerId, ListenerCallback); 8]> {
        self.listeners
            .iter()
            .filter(|(_, l)| l.target == target && l.kind == kind)
            .map(|(id, l)| (*id, Rc::clone(&l.callback)))
            .collect()
    }

    /// Total number of registered listeners
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Number of listeners for a target and kind
    pub fn count_for(&self, target: EventTarget, kind: EventKind) -> usize {
        self.listeners
            .values()
            .filter(|l| l.target == target && l.kind == kind)
            .count()
    }
}
