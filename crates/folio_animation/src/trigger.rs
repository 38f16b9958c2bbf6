//! Scroll-triggered playback
//!
//! A [`ScrollTrigger`] watches where a node sits in the viewport and drives a
//! [`TriggerAction`] (usually a [`Timeline`]) when it crosses a threshold:
//! play once, replay on every entry, or scrub with scroll position.
//!
//! Thresholds use the familiar `"<element edge> <viewport position>"` form:
//! `"top 80%"` holds once the node's top edge is at or above 80% of the
//! viewport height.

use crate::timeline::Timeline;
use folio_core::{
    EventKind, EventTarget, FolioError, Host, ListenerId, NodeId, NodeRef, Rect, Scope,
};
use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::str::FromStr;

/// Edge of the trigger element
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Edge {
    #[default]
    Top,
    Center,
    Bottom,
}

impl Edge {
    fn of(self, rect: Rect) -> f32 {
        match self {
            Edge::Top => rect.top(),
            Edge::Center => rect.center().y,
            Edge::Bottom => rect.bottom(),
        }
    }
}

/// An element edge paired with a line in the viewport
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerPoint {
    pub edge: Edge,
    /// Fraction of the viewport height, 0.0 = top
    pub viewport: f32,
}

impl TriggerPoint {
    pub fn new(edge: Edge, viewport: f32) -> Self {
        Self { edge, viewport }
    }

    /// Signed distance from the element edge down to the viewport line.
    /// Zero or negative means the threshold has been reached.
    pub fn distance(&self, rect: Rect, viewport_height: f32) -> f32 {
        self.edge.of(rect) - self.viewport * viewport_height
    }

    pub fn is_reached(&self, rect: Rect, viewport_height: f32) -> bool {
        self.distance(rect, viewport_height) <= 0.0
    }
}

fn parse_position(word: &str) -> Option<f32> {
    match word {
        "top" => Some(0.0),
        "center" => Some(0.5),
        "bottom" => Some(1.0),
        _ => {
            let pct = word.strip_suffix('%')?;
            pct.parse::<f32>().ok().map(|p| p / 100.0)
        }
    }
}

impl FromStr for TriggerPoint {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let mut words = lower.split_whitespace();
        let (Some(edge), Some(position), None) = (words.next(), words.next(), words.next())
        else {
            return Err(FolioError::InvalidTrigger(s.to_string()));
        };

        let edge = match edge {
            "top" => Edge::Top,
            "center" => Edge::Center,
            "bottom" => Edge::Bottom,
            _ => return Err(FolioError::InvalidTrigger(s.to_string())),
        };
        let viewport =
            parse_position(position).ok_or_else(|| FolioError::InvalidTrigger(s.to_string()))?;

        Ok(Self { edge, viewport })
    }
}

/// How a trigger drives its action
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TriggerMode {
    /// Play the first time the start threshold is reached, then detach
    #[default]
    Once,
    /// Play on every entry, reset when scrolled back above the start
    Repeat,
    /// Map scroll position between start and end to progress
    Scrub,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerConfig {
    pub start: TriggerPoint,
    pub end: TriggerPoint,
    pub mode: TriggerMode,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            start: TriggerPoint::new(Edge::Top, 0.8),
            end: TriggerPoint::new(Edge::Bottom, 0.2),
            mode: TriggerMode::Once,
        }
    }
}

impl TriggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse start and end thresholds such as `"top 80%"`
    pub fn parse(start: &str, end: &str) -> folio_core::Result<Self> {
        Ok(Self {
            start: start.parse()?,
            end: end.parse()?,
            mode: TriggerMode::Once,
        })
    }

    pub fn start(mut self, start: TriggerPoint) -> Self {
        self.start = start;
        self
    }

    pub fn end(mut self, end: TriggerPoint) -> Self {
        self.end = end;
        self
    }

    pub fn mode(mut self, mode: TriggerMode) -> Self {
        self.mode = mode;
        self
    }

    /// Scrub progress for a node at `rect`, clamped to `[0, 1]`
    pub fn progress(&self, rect: Rect, viewport_height: f32) -> f32 {
        let a = self.start.distance(rect, viewport_height);
        let b = self.end.distance(rect, viewport_height);
        let span = a - b;
        if span.abs() < f32::EPSILON {
            return if a <= 0.0 { 1.0 } else { 0.0 };
        }
        (a / span).clamp(0.0, 1.0)
    }
}

/// Something a trigger can drive
pub trait TriggerAction {
    fn play(&self);

    /// Return to the pre-play state
    fn reset(&self) {}

    /// Jump to normalised progress
    fn seek(&self, _progress: f32) {}
}

impl TriggerAction for Timeline {
    fn play(&self) {
        Timeline::play(self);
    }

    fn reset(&self) {
        Timeline::reset(self);
    }

    fn seek(&self, progress: f32) {
        Timeline::seek(self, progress);
    }
}

impl<F> TriggerAction for F
where
    F: Fn(),
{
    fn play(&self) {
        self();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerState {
    Armed,
    Fired,
    Outside,
    Inside,
    Scrubbing,
}

struct TriggerInner {
    node: NodeRef,
    config: TriggerConfig,
    action: Box<dyn TriggerAction>,
    state: Cell<TriggerState>,
    fires: Cell<u32>,
    listeners: RefCell<SmallVec<[ListenerId; 2]>>,
}

impl TriggerInner {
    fn update(&self, host: &Host) {
        let Some(rect) = self.node.measure() else {
            return;
        };
        let height = host.viewport().height;

        match self.config.mode {
            TriggerMode::Once => {
                if self.state.get() == TriggerState::Armed
                    && self.config.start.is_reached(rect, height)
                {
                    self.state.set(TriggerState::Fired);
                    self.fires.set(self.fires.get() + 1);
                    self.detach(host);
                    self.action.play();
                }
            }
            TriggerMode::Repeat => {
                let inside = self.config.start.is_reached(rect, height);
                match (self.state.get(), inside) {
                    (TriggerState::Outside, true) => {
                        self.state.set(TriggerState::Inside);
                        self.fires.set(self.fires.get() + 1);
                        self.action.reset();
                        self.action.play();
                    }
                    (TriggerState::Inside, false) => {
                        self.state.set(TriggerState::Outside);
                        self.action.reset();
                    }
                    _ => {}
                }
            }
            TriggerMode::Scrub => {
                self.action.seek(self.config.progress(rect, height));
            }
        }
    }

    fn detach(&self, host: &Host) {
        for id in self.listeners.borrow_mut().drain(..) {
            host.remove_listener(id);
        }
    }
}

/// Binds a node's scroll position to an action
pub struct ScrollTrigger {
    inner: Rc<TriggerInner>,
    scope: Scope,
}

impl ScrollTrigger {
    /// Bind `action` to `node`. The start condition is checked immediately,
    /// then on every scroll and resize.
    pub fn bind<A>(host: &Host, node: NodeId, config: TriggerConfig, action: A) -> Self
    where
        A: TriggerAction + 'static,
    {
        let state = match config.mode {
            TriggerMode::Once => TriggerState::Armed,
            TriggerMode::Repeat => TriggerState::Outside,
            TriggerMode::Scrub => TriggerState::Scrubbing,
        };
        let inner = Rc::new(TriggerInner {
            node: host.node(node),
            config,
            action: Box::new(action),
            state: Cell::new(state),
            fires: Cell::new(0),
            listeners: RefCell::new(SmallVec::new()),
        });
        let mut scope = Scope::new(host);

        inner.update(host);
        if inner.state.get() != TriggerState::Fired {
            for kind in [EventKind::Scroll, EventKind::Resize] {
                let trigger = Rc::clone(&inner);
                let id = scope.listen(EventTarget::Window, kind, move |host, _| {
                    trigger.update(host);
                });
                if let Some(id) = id {
                    inner.listeners.borrow_mut().push(id);
                }
            }
        }
        tracing::debug!(mode = ?config.mode, state = ?inner.state.get(), "scroll trigger bound");

        Self { inner, scope }
    }

    pub fn state(&self) -> TriggerState {
        self.inner.state.get()
    }

    /// Times the action was played by this trigger
    pub fn fire_count(&self) -> u32 {
        self.inner.fires.get()
    }

    /// Whether the trigger still listens for scroll/resize
    pub fn is_attached(&self) -> bool {
        !self.scope.is_disposed() && !self.inner.listeners.borrow().is_empty()
    }

    /// Re-measure and evaluate now
    pub fn refresh(&self, host: &Host) {
        if !self.scope.is_disposed() {
            self.inner.update(host);
        }
    }

    pub fn unmount(mut self) {
        self.scope.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::TimelineBuilder;
    use crate::values::VisualState;
    use folio_core::Viewport;

    fn host_with_section(top: f32) -> (Host, NodeId) {
        let host = Host::new(Viewport::new(1280.0, 800.0));
        let section = host.append_element(host.root(), "section");
        host.document_mut()
            .set_rect(section, Rect::new(0.0, top, 1280.0, 400.0));
        (host, section)
    }

    fn counter() -> (Rc<Cell<u32>>, impl Fn() + 'static) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        (count, move || c.set(c.get() + 1))
    }

    #[test]
    fn test_parse_trigger_point() {
        let point: TriggerPoint = "top 70%".parse().unwrap();
        assert_eq!(point, TriggerPoint::new(Edge::Top, 0.7));
        let point: TriggerPoint = "center center".parse().unwrap();
        assert_eq!(point, TriggerPoint::new(Edge::Center, 0.5));
        assert!("top".parse::<TriggerPoint>().is_err());
        assert!("left 10%".parse::<TriggerPoint>().is_err());
        assert!("top ten%".parse::<TriggerPoint>().is_err());
    }

    #[test]
    fn test_once_plays_exactly_once() {
        let (host, section) = host_with_section(1500.0);
        let (count, action) = counter();
        let trigger = ScrollTrigger::bind(&host, section, TriggerConfig::default(), action);

        assert_eq!(count.get(), 0);
        assert!(trigger.is_attached());
        assert_eq!(host.listener_count(), 2);

        host.scroll_to(500.0);
        assert_eq!(count.get(), 0);
        host.scroll_to(900.0);
        assert_eq!(count.get(), 1);
        assert_eq!(trigger.state(), TriggerState::Fired);
        assert!(!trigger.is_attached());
        assert_eq!(host.listener_count(), 0);

        host.scroll_to(0.0);
        host.scroll_to(1200.0);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_once_fires_at_bind_when_already_visible() {
        let (host, section) = host_with_section(100.0);
        let (count, action) = counter();
        let trigger = ScrollTrigger::bind(&host, section, TriggerConfig::default(), action);
        assert_eq!(count.get(), 1);
        assert_eq!(trigger.fire_count(), 1);
        assert_eq!(host.listener_count(), 0);
    }

    #[test]
    fn test_repeat_replays_on_each_entry() {
        let (host, section) = host_with_section(1500.0);
        let (count, action) = counter();
        let config = TriggerConfig::default().mode(TriggerMode::Repeat);
        let trigger = ScrollTrigger::bind(&host, section, config, action);

        host.scroll_to(900.0);
        host.scroll_to(950.0);
        host.scroll_to(0.0);
        host.scroll_to(900.0);
        assert_eq!(count.get(), 2);
        assert_eq!(trigger.state(), TriggerState::Inside);
    }

    #[test]
    fn test_scrub_seeks_with_scroll() {
        let (host, section) = host_with_section(1000.0);
        let span = host.node(host.append_element(section, "span"));
        let timeline = TimelineBuilder::new(vec![span.clone()])
            .from(VisualState::hidden(0.0))
            .easing(crate::Easing::Linear)
            .build(&host);
        let config = TriggerConfig::parse("top bottom", "bottom top")
            .unwrap()
            .mode(TriggerMode::Scrub);
        let _trigger = ScrollTrigger::bind(&host, section, config, timeline.clone());

        // start at scroll 200 (top 1000 hits 800), end at scroll 1400
        host.scroll_to(200.0);
        assert!(timeline.progress() < 1e-4);
        host.scroll_to(800.0);
        assert!((timeline.progress() - 0.5).abs() < 1e-3);
        host.scroll_to(5000.0);
        assert!((timeline.progress() - 1.0).abs() < 1e-4);
        assert_eq!(host.pending_frames(), 0);
    }

    #[test]
    fn test_unmount_before_firing_removes_listeners() {
        let (host, section) = host_with_section(3000.0);
        let (count, action) = counter();
        let trigger = ScrollTrigger::bind(&host, section, TriggerConfig::default(), action);
        trigger.unmount();

        assert_eq!(host.listener_count(), 0);
        host.scroll_to(2900.0);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_detached_node_never_fires() {
        let (host, section) = host_with_section(100.0);
        host.document_mut().remove(section);
        let (count, action) = counter();
        let _trigger = ScrollTrigger::bind(&host, section, TriggerConfig::default(), action);
        host.scroll_to(50.0);
        assert_eq!(count.get(), 0);
    }
}
