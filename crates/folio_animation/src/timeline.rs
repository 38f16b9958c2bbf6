//! Staggered timelines
//!
//! A [`Timeline`] drives a list of nodes from one [`VisualState`] to another,
//! each target starting `stagger` after the previous one. It advances on host
//! animation frames and writes through [`NodeRef`], so a killed timeline or a
//! detached target simply stops producing writes.
//!
//! ```rust
//! use folio_animation::{TimelineBuilder, VisualState};
//! use folio_core::Host;
//!
//! let host = Host::default();
//! let nodes: Vec<_> = (0..3)
//!     .map(|_| host.node(host.append_element(host.root(), "span")))
//!     .collect();
//!
//! let timeline = TimelineBuilder::new(nodes)
//!     .stagger_ms(50.0)
//!     .duration_ms(200.0)
//!     .from(VisualState::hidden(20.0))
//!     .build(&host);
//! timeline.play();
//!
//! host.run_frames(30, 16.0);
//! assert!(timeline.is_completed());
//! ```

use crate::easing::Easing;
use crate::stagger::StaggerConfig;
use crate::values::{Interpolate, VisualState};
use folio_core::{FrameId, Host, NodeRef, WeakHost};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

type CompleteCallback = Box<dyn FnOnce()>;

/// Lifecycle of a timeline
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimelinePhase {
    Idle,
    Playing,
    Completed,
    /// Terminal; no further writes or callbacks
    Killed,
}

struct Entry {
    node: NodeRef,
    start_ms: f64,
    last: Option<VisualState>,
}

struct TimelineState {
    host: WeakHost,
    entries: SmallVec<[Entry; 16]>,
    duration_ms: f64,
    easing: Easing,
    from: VisualState,
    to: VisualState,
    phase: TimelinePhase,
    started_at: f64,
    elapsed_ms: f64,
    frame: Option<FrameId>,
    on_complete: Option<CompleteCallback>,
    plays: u32,
    completions: u32,
}

impl TimelineState {
    fn total_ms(&self) -> f64 {
        self.entries
            .iter()
            .map(|e| e.start_ms + self.duration_ms)
            .fold(0.0, f64::max)
    }

    fn render(&mut self, elapsed_ms: f64) {
        self.elapsed_ms = elapsed_ms;
        for entry in self.entries.iter_mut() {
            let local = if self.duration_ms <= 0.0 {
                if elapsed_ms >= entry.start_ms {
                    1.0
                } else {
                    0.0
                }
            } else {
                ((elapsed_ms - entry.start_ms) / self.duration_ms).clamp(0.0, 1.0)
            };
            let visual = self.from.lerp(&self.to, self.easing.apply(local as f32));
            if entry.last == Some(visual) {
                continue;
            }
            entry.node.set_visual(visual.opacity, visual.transform());
            entry.last = Some(visual);
        }
    }

    fn cancel_frame(&mut self) {
        if let Some(id) = self.frame.take() {
            if let Some(host) = self.host.upgrade() {
                host.cancel_frame(id);
            }
        }
    }
}

impl Drop for TimelineState {
    fn drop(&mut self) {
        self.cancel_frame();
    }
}

/// Handle to a running or idle timeline
///
/// Clones share state. Frame callbacks hold only a weak reference, so the
/// timeline stops once every handle is dropped.
#[derive(Clone)]
pub struct Timeline {
    state: Rc<RefCell<TimelineState>>,
}

impl Timeline {
    /// Start driving frames. No-op unless idle.
    pub fn play(&self) {
        let host = {
            let mut state = self.state.borrow_mut();
            if state.phase != TimelinePhase::Idle {
                return;
            }
            let Some(host) = state.host.upgrade() else {
                return;
            };
            state.phase = TimelinePhase::Playing;
            state.started_at = host.now();
            state.plays += 1;
            host
        };

        if self.total_ms() <= 0.0 {
            self.state.borrow_mut().render(0.0);
            Self::complete(&self.state);
            return;
        }
        Self::schedule(&self.state, &host);
    }

    /// Reset to the start state and play again. No-op once killed.
    pub fn restart(&self) {
        if self.is_killed() {
            return;
        }
        self.reset();
        self.play();
    }

    /// Cancel the pending frame and go back to the `from` state
    pub fn reset(&self) {
        let mut state = self.state.borrow_mut();
        if state.phase == TimelinePhase::Killed {
            return;
        }
        state.cancel_frame();
        state.phase = TimelinePhase::Idle;
        state.render(0.0);
    }

    /// Stop permanently. Targets stay where they are.
    pub fn kill(&self) {
        let mut state = self.state.borrow_mut();
        if state.phase == TimelinePhase::Killed {
            return;
        }
        state.cancel_frame();
        state.phase = TimelinePhase::Killed;
        state.on_complete = None;
        tracing::trace!("timeline killed after {} plays", state.plays);
    }

    /// Write the state at normalised `progress` without scheduling frames
    pub fn seek(&self, progress: f32) {
        let mut state = self.state.borrow_mut();
        if state.phase == TimelinePhase::Killed {
            return;
        }
        if state.phase == TimelinePhase::Playing {
            state.cancel_frame();
            state.phase = TimelinePhase::Idle;
        }
        let total = state.total_ms();
        state.render(progress.clamp(0.0, 1.0) as f64 * total);
    }

    pub fn phase(&self) -> TimelinePhase {
        self.state.borrow().phase
    }

    pub fn is_active(&self) -> bool {
        self.phase() == TimelinePhase::Playing
    }

    pub fn is_completed(&self) -> bool {
        self.phase() == TimelinePhase::Completed
    }

    pub fn is_killed(&self) -> bool {
        self.phase() == TimelinePhase::Killed
    }

    /// Normalised position of the last rendered state
    pub fn progress(&self) -> f32 {
        let state = self.state.borrow();
        let total = state.total_ms();
        if total <= 0.0 {
            return if state.phase == TimelinePhase::Completed {
                1.0
            } else {
                0.0
            };
        }
        (state.elapsed_ms / total).clamp(0.0, 1.0) as f32
    }

    /// Length from play to completion (ms)
    pub fn total_ms(&self) -> f64 {
        self.state.borrow().total_ms()
    }

    pub fn target_count(&self) -> usize {
        self.state.borrow().entries.len()
    }

    /// Number of times `play` started the timeline
    pub fn plays(&self) -> u32 {
        self.state.borrow().plays
    }

    /// Number of times the timeline ran to its end
    pub fn completions(&self) -> u32 {
        self.state.borrow().completions
    }

    fn schedule(state: &Rc<RefCell<TimelineState>>, host: &Host) {
        let weak: Weak<RefCell<TimelineState>> = Rc::downgrade(state);
        let id = host.request_frame(move |host, now| {
            if let Some(state) = weak.upgrade() {
                Timeline::tick(&state, host, now);
            }
        });
        state.borrow_mut().frame = Some(id);
    }

    fn tick(state: &Rc<RefCell<TimelineState>>, host: &Host, now: f64) {
        let finished = {
            let mut s = state.borrow_mut();
            s.frame = None;
            if s.phase != TimelinePhase::Playing {
                return;
            }
            let elapsed = now - s.started_at;
            s.render(elapsed);
            elapsed >= s.total_ms()
        };

        if finished {
            Self::complete(state);
        } else {
            Self::schedule(state, host);
        }
    }

    fn complete(state: &Rc<RefCell<TimelineState>>) {
        let callback = {
            let mut s = state.borrow_mut();
            s.phase = TimelinePhase::Completed;
            s.completions += 1;
            s.on_complete.take()
        };
        if let Some(callback) = callback {
            callback();
        }
    }
}

impl std::fmt::Debug for Timeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Timeline")
            .field("phase", &state.phase)
            .field("targets", &state.entries.len())
            .field("plays", &state.plays)
            .finish()
    }
}

/// Builder for [`Timeline`]
pub struct TimelineBuilder {
    targets: Vec<NodeRef>,
    stagger: StaggerConfig,
    delay_ms: f64,
    duration_ms: f64,
    easing: Easing,
    from: VisualState,
    to: VisualState,
    on_complete: Option<CompleteCallback>,
}

impl TimelineBuilder {
    pub fn new(targets: impl IntoIterator<Item = NodeRef>) -> Self {
        Self {
            targets: targets.into_iter().collect(),
            stagger: StaggerConfig::default(),
            delay_ms: 0.0,
            duration_ms: 600.0,
            easing: Easing::EaseOutCubic,
            from: VisualState::REST,
            to: VisualState::REST,
            on_complete: None,
        }
    }

    /// Forward stagger of `each_ms` between targets
    pub fn stagger_ms(mut self, each_ms: f64) -> Self {
        self.stagger = StaggerConfig {
            each_ms: each_ms.max(0.0),
            ..self.stagger
        };
        self
    }

    pub fn stagger(mut self, stagger: StaggerConfig) -> Self {
        self.stagger = stagger;
        self
    }

    pub fn delay_ms(mut self, delay_ms: f64) -> Self {
        self.delay_ms = delay_ms.max(0.0);
        self
    }

    pub fn duration_ms(mut self, duration_ms: f64) -> Self {
        self.duration_ms = duration_ms.max(0.0);
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn from(mut self, from: VisualState) -> Self {
        self.from = from;
        self
    }

    pub fn to(mut self, to: VisualState) -> Self {
        self.to = to;
        self
    }

    /// Called once, the first time the timeline reaches its end
    pub fn on_complete<F>(mut self, f: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        self.on_complete = Some(Box::new(f));
        self
    }

    /// Create the timeline and apply the `from` state to every target
    pub fn build(self, host: &Host) -> Timeline {
        let total = self.targets.len();
        let entries = self
            .targets
            .into_iter()
            .enumerate()
            .map(|(i, node)| Entry {
                node,
                start_ms: self.delay_ms + self.stagger.delay_for_index(i, total),
                last: None,
            })
            .collect();

        let mut state = TimelineState {
            host: host.downgrade(),
            entries,
            duration_ms: self.duration_ms,
            easing: self.easing,
            from: self.from,
            to: self.to,
            phase: TimelinePhase::Idle,
            started_at: 0.0,
            elapsed_ms: 0.0,
            frame: None,
            on_complete: self.on_complete,
            plays: 0,
            completions: 0,
        };
        state.render(0.0);

        Timeline {
            state: Rc::new(RefCell::new(state)),
        }
    }
}

/// Owns at most one timeline
///
/// Installing a replacement kills the previous timeline first, and dropping
/// the slot kills whatever it holds.
#[derive(Default)]
pub struct TimelineSlot {
    current: Option<Timeline>,
}

impl TimelineSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, timeline: Timeline) -> &Timeline {
        self.clear();
        self.current.insert(timeline)
    }

    pub fn get(&self) -> Option<&Timeline> {
        self.current.as_ref()
    }

    pub fn clear(&mut self) {
        if let Some(previous) = self.current.take() {
            previous.kill();
        }
    }
}

impl Drop for TimelineSlot {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn spans(host: &Host, n: usize) -> Vec<NodeRef> {
        (0..n)
            .map(|_| host.node(host.append_element(host.root(), "span")))
            .collect()
    }

    #[test]
    fn test_build_applies_from_state() {
        let host = Host::default();
        let nodes = spans(&host, 2);
        let _timeline = TimelineBuilder::new(nodes.clone())
            .from(VisualState::hidden(30.0))
            .build(&host);

        for node in &nodes {
            let style = node.style().unwrap();
            assert_eq!(style.opacity, 0.0);
            assert_eq!(style.transform.translate_y, 30.0);
        }
        assert_eq!(host.pending_frames(), 0);
    }

    #[test]
    fn test_completion_not_before_stagger_plus_duration() {
        let host = Host::default();
        let done_at = Rc::new(Cell::new(None));
        let clock = host.clone();
        let record = done_at.clone();

        let timeline = TimelineBuilder::new(spans(&host, 4))
            .stagger_ms(100.0)
            .duration_ms(300.0)
            .from(VisualState::hidden(10.0))
            .on_complete(move || record.set(Some(clock.now())))
            .build(&host);
        assert_eq!(timeline.total_ms(), 600.0);

        timeline.play();
        host.run_frames(100, 16.0);

        let done = done_at.get().unwrap();
        assert!(done >= 600.0);
        assert!(done < 616.0 + 1e-9);
        assert_eq!(timeline.completions(), 1);
    }

    #[test]
    fn test_on_complete_fires_once_across_restarts() {
        let host = Host::default();
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        let timeline = TimelineBuilder::new(spans(&host, 2))
            .duration_ms(50.0)
            .on_complete(move || counter.set(counter.get() + 1))
            .build(&host);

        timeline.play();
        host.run_frames(10, 16.0);
        timeline.restart();
        host.run_frames(10, 16.0);

        assert_eq!(fired.get(), 1);
        assert_eq!(timeline.plays(), 2);
        assert_eq!(timeline.completions(), 2);
    }

    #[test]
    fn test_empty_timeline_completes_on_play() {
        let host = Host::default();
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        let timeline = TimelineBuilder::new(Vec::new())
            .delay_ms(200.0)
            .on_complete(move || flag.set(true))
            .build(&host);

        timeline.play();
        assert!(fired.get());
        assert!(timeline.is_completed());
        assert_eq!(host.pending_frames(), 0);
    }

    #[test]
    fn test_kill_stops_writes_and_callbacks() {
        let host = Host::default();
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        let timeline = TimelineBuilder::new(spans(&host, 3))
            .stagger_ms(50.0)
            .duration_ms(200.0)
            .from(VisualState::hidden(20.0))
            .on_complete(move || flag.set(true))
            .build(&host);

        timeline.play();
        host.run_frames(3, 16.0);
        timeline.kill();
        let writes = host.document().style_writes();

        host.run_frames(50, 16.0);
        timeline.play();
        host.run_frames(5, 16.0);

        assert_eq!(host.document().style_writes(), writes);
        assert!(!fired.get());
        assert_eq!(host.pending_frames(), 0);
    }

    #[test]
    fn test_seek_writes_without_frames() {
        let host = Host::default();
        let nodes = spans(&host, 1);
        let timeline = TimelineBuilder::new(nodes.clone())
            .duration_ms(100.0)
            .from(VisualState::hidden(40.0))
            .easing(Easing::Linear)
            .build(&host);

        timeline.seek(0.5);
        let style = nodes[0].style().unwrap();
        assert!((style.opacity - 0.5).abs() < 1e-5);
        assert!((style.transform.translate_y - 20.0).abs() < 1e-4);
        assert_eq!(host.pending_frames(), 0);
        assert!((timeline.progress() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_dropping_last_handle_cancels_frame() {
        let host = Host::default();
        let timeline = TimelineBuilder::new(spans(&host, 1))
            .duration_ms(100.0)
            .build(&host);
        timeline.play();
        assert_eq!(host.pending_frames(), 1);
        drop(timeline);
        assert_eq!(host.pending_frames(), 0);
    }

    #[test]
    fn test_slot_kills_previous() {
        let host = Host::default();
        let mut slot = TimelineSlot::new();
        let first = TimelineBuilder::new(spans(&host, 1)).build(&host);
        slot.replace(first.clone());
        first.play();

        let second = TimelineBuilder::new(spans(&host, 1)).build(&host);
        slot.replace(second.clone());
        assert!(first.is_killed());
        assert!(!second.is_killed());

        drop(slot);
        assert!(second.is_killed());
    }

    #[test]
    fn test_detached_target_is_skipped() {
        let host = Host::default();
        let nodes = spans(&host, 2);
        let timeline = TimelineBuilder::new(nodes.clone())
            .duration_ms(100.0)
            .from(VisualState::hidden(10.0))
            .build(&host);
        host.document_mut().remove(nodes[1].id());
        let before = host.document().node_style_writes(nodes[1].id());

        timeline.play();
        host.run_frames(10, 16.0);
        assert!(timeline.is_completed());
        assert_eq!(host.document().node_style_writes(nodes[1].id()), before);
    }
}
