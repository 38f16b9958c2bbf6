//! Magnetic pull toward the pointer

use folio_animation::{PointSpring, SpringConfig};
use folio_core::{
    Event, EventKind, EventTarget, FrameSlot, Host, NodeId, NodeRef, Point, Rect, Scope,
    Transform,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MagneticOptions {
    /// Pull applies within this distance of the anchor centre (px)
    pub radius: f32,
    /// Fraction of the pointer offset applied to the element
    pub strength: f32,
    pub spring: SpringConfig,
}

impl Default for MagneticOptions {
    fn default() -> Self {
        Self {
            radius: 120.0,
            strength: 0.35,
            spring: SpringConfig::magnetic(),
        }
    }
}

impl MagneticOptions {
    /// Target offset for a pointer at `pointer` and an anchor box `rect`
    pub fn offset(&self, pointer: Point, rect: Rect) -> Point {
        let center = rect.center();
        if pointer.distance(center) > self.radius {
            return Point::ZERO;
        }
        Point::new(
            (pointer.x - center.x) * self.strength,
            (pointer.y - center.y) * self.strength,
        )
    }
}

struct MagneticInner {
    node: NodeRef,
    options: MagneticOptions,
    rect: Cell<Option<Rect>>,
    spring: RefCell<PointSpring>,
    last_frame: Cell<Option<f64>>,
    frames: FrameSlot,
}

impl MagneticInner {
    fn anchor(&self) -> Option<Rect> {
        if let Some(rect) = self.rect.get() {
            return Some(rect);
        }
        let rect = self.node.measure()?;
        self.rect.set(Some(rect));
        Some(rect)
    }

    fn retarget(self: &Rc<Self>, host: &Host, pointer: Option<Point>) {
        let Some(rect) = self.anchor() else {
            return;
        };
        let target = pointer
            .map(|p| self.options.offset(p, rect))
            .unwrap_or(Point::ZERO);
        self.spring.borrow_mut().set_target(target);
        self.schedule(host);
    }

    fn schedule(self: &Rc<Self>, host: &Host) {
        let inner = Rc::clone(self);
        self.frames.schedule(host, move |host, now| inner.tick(host, now));
    }

    fn tick(self: &Rc<Self>, host: &Host, now: f64) {
        let dt = self
            .last_frame
            .replace(Some(now))
            .map(|last| ((now - last) / 1000.0) as f32)
            .unwrap_or(1.0 / 60.0)
            .clamp(0.0, 0.1);

        let (offset, settled) = {
            let mut spring = self.spring.borrow_mut();
            spring.step(dt);
            (spring.position(), spring.is_at_rest())
        };
        if !self.node.set_transform(Transform::translate(offset.x, offset.y)) {
            return;
        }
        if settled {
            self.last_frame.set(None);
        } else {
            self.schedule(host);
        }
    }
}

/// Pulls an element toward the pointer when it comes close
pub struct Magnetic {
    inner: Rc<MagneticInner>,
    scope: Scope,
}

impl Magnetic {
    pub fn mount(host: &Host, node: NodeId, options: MagneticOptions) -> Self {
        let inner = Rc::new(MagneticInner {
            node: host.node(node),
            options,
            rect: Cell::new(None),
            spring: RefCell::new(PointSpring::new(options.spring, Point::ZERO)),
            last_frame: Cell::new(None),
            frames: FrameSlot::new(),
        });

        let mut scope = Scope::new(host);
        scope.own_frames(&inner.frames);

        let magnet = Rc::clone(&inner);
        scope.listen(EventTarget::Window, EventKind::PointerMove, move |host, event| {
            magnet.retarget(host, event.position());
        });
        let magnet = Rc::clone(&inner);
        scope.listen(EventTarget::Window, EventKind::PointerLeave, move |host, _| {
            magnet.retarget(host, None);
        });
        for kind in [EventKind::Scroll, EventKind::Resize] {
            let magnet = Rc::clone(&inner);
            scope.listen(EventTarget::Window, kind, move |_, _: &Event| {
                magnet.rect.set(None);
            });
        }

        Self { inner, scope }
    }

    /// Current applied offset
    pub fn offset(&self) -> Point {
        self.inner.spring.borrow().position()
    }

    pub fn is_settled(&self) -> bool {
        self.inner.spring.borrow().is_at_rest()
    }

    /// Remove listeners, cancel the pending frame and reset the element
    pub fn unmount(mut self) {
        self.scope.dispose();
        self.inner.node.set_transform(Transform::IDENTITY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Host, NodeId) {
        let host = Host::default();
        let button = host.append_element(host.root(), "button");
        host.document_mut()
            .set_rect(button, Rect::new(100.0, 100.0, 100.0, 40.0));
        (host, button)
    }

    #[test]
    fn test_offset_within_radius() {
        let options = MagneticOptions {
            radius: 100.0,
            strength: 0.5,
            ..Default::default()
        };
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(
            options.offset(Point::new(70.0, 50.0), rect),
            Point::new(10.0, 0.0)
        );
        assert_eq!(options.offset(Point::new(400.0, 50.0), rect), Point::ZERO);
    }

    #[test]
    fn test_pull_then_release_on_leave() {
        let (host, button) = setup();
        let magnetic = Magnetic::mount(&host, button, MagneticOptions::default());

        host.pointer_move(170.0, 120.0, Some(button));
        host.run_frames(120, 16.0);
        let offset = magnetic.offset();
        assert!((offset.x - 20.0 * 0.35).abs() < 0.1);
        assert!(magnetic.is_settled());
        assert_eq!(host.pending_frames(), 0);

        host.pointer_leave_window();
        host.run_frames(120, 16.0);
        assert!(magnetic.offset().x.abs() < 0.1);
    }

    #[test]
    fn test_unmount_stops_writes() {
        let (host, button) = setup();
        let magnetic = Magnetic::mount(&host, button, MagneticOptions::default());
        host.pointer_move(160.0, 120.0, None);
        host.run_frames(2, 16.0);

        magnetic.unmount();
        let writes = host.document().style_writes();
        host.pointer_move(150.0, 130.0, None);
        host.run_frames(30, 16.0);

        assert_eq!(host.document().style_writes(), writes);
        assert_eq!(host.listener_count(), 0);
        assert!(host
            .document()
            .style(button)
            .unwrap()
            .transform
            .is_identity());
    }

    #[test]
    fn test_missing_anchor_is_noop() {
        let (host, button) = setup();
        host.document_mut().remove(button);
        let _magnetic = Magnetic::mount(&host, button, MagneticOptions::default());
        host.pointer_move(150.0, 120.0, None);
        assert_eq!(host.pending_frames(), 0);
    }
}
