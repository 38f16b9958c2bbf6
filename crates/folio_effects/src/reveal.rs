//! Text reveals
//!
//! [`TextReveal`] splits a container's text, builds a staggered timeline over
//! the pieces and plays it immediately or from a scroll trigger.
//! [`ScrubReveal`] ties the same timeline to scroll position instead.
//! Both read one validated [`RevealOptions`] value.

use folio_animation::{
    Easing, ScrollTrigger, StaggerConfig, Timeline, TimelineBuilder, TimelineSlot, TriggerConfig,
    TriggerMode, VisualState,
};
use folio_core::{FlagStore, FolioError, Host, NodeId, Result};
use folio_text::{SplitOptions, SplitText};
use std::rc::Rc;

/// Every option a text reveal understands
#[derive(Clone, Debug, PartialEq)]
pub struct RevealOptions {
    pub split: SplitOptions,
    pub stagger: StaggerConfig,
    pub delay_ms: f64,
    pub duration_ms: f64,
    pub easing: Easing,
    pub from: VisualState,
    pub to: VisualState,
    /// Play when scrolled into view; `None` plays on mount
    pub trigger: Option<TriggerConfig>,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            split: SplitOptions::chars(),
            stagger: StaggerConfig::new(30.0),
            delay_ms: 0.0,
            duration_ms: 800.0,
            easing: Easing::EaseOutQuart,
            from: VisualState::hidden(40.0),
            to: VisualState::REST,
            trigger: None,
        }
    }
}

impl RevealOptions {
    /// Word-by-word paragraph reveal
    pub fn paragraph() -> Self {
        Self {
            split: SplitOptions::words(),
            stagger: StaggerConfig::new(40.0),
            duration_ms: 600.0,
            from: VisualState::hidden(20.0),
            ..Self::default()
        }
    }

    /// Heading reveal: words split into characters that rotate up into place
    pub fn heading() -> Self {
        Self {
            split: SplitOptions::words_then_chars(),
            stagger: StaggerConfig::new(20.0),
            duration_ms: 1000.0,
            easing: Easing::EaseOutExpo,
            from: VisualState::hidden(60.0).with_rotate(8.0),
            ..Self::default()
        }
    }

    pub fn split(mut self, split: SplitOptions) -> Self {
        self.split = split;
        self
    }

    pub fn stagger_ms(mut self, each_ms: f64) -> Self {
        self.stagger.each_ms = each_ms;
        self
    }

    pub fn delay_ms(mut self, delay_ms: f64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn duration_ms(mut self, duration_ms: f64) -> Self {
        self.duration_ms = duration_ms;
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

    pub fn trigger(mut self, trigger: TriggerConfig) -> Self {
        self.trigger = Some(trigger);
        self
    }

    /// Reject negative or non-finite timings
    pub fn validate(&self) -> Result<()> {
        let timings = [
            ("stagger", self.stagger.each_ms),
            ("delay", self.delay_ms),
            ("duration", self.duration_ms),
        ];
        for (name, value) in timings {
            if !value.is_finite() || value < 0.0 {
                return Err(FolioError::InvalidOption {
                    name,
                    reason: format!("must be a non-negative number of ms, got {}", value),
                });
            }
        }
        for (name, state) in [("from", &self.from), ("to", &self.to)] {
            if !(0.0..=1.0).contains(&state.opacity) {
                return Err(FolioError::InvalidOption {
                    name,
                    reason: format!("opacity {} outside 0..=1", state.opacity),
                });
            }
        }
        Ok(())
    }
}

type RevealCallback = Rc<dyn Fn()>;

/// A mounted text reveal
pub struct TextReveal {
    container: NodeId,
    options: RevealOptions,
    flags: FlagStore,
    split: SplitText,
    timeline: TimelineSlot,
    trigger: Option<ScrollTrigger>,
    on_complete: Option<RevealCallback>,
}

impl TextReveal {
    pub fn mount(
        host: &Host,
        container: NodeId,
        text: &str,
        options: RevealOptions,
        flags: &FlagStore,
    ) -> Result<Self> {
        Self::mount_inner(host, container, text, options, flags, None)
    }

    /// Mount and call `on_complete` when the current text finishes revealing
    pub fn mount_with_callback<F>(
        host: &Host,
        container: NodeId,
        text: &str,
        options: RevealOptions,
        flags: &FlagStore,
        on_complete: F,
    ) -> Result<Self>
    where
        F: Fn() + 'static,
    {
        Self::mount_inner(
            host,
            container,
            text,
            options,
            flags,
            Some(Rc::new(on_complete)),
        )
    }

    fn mount_inner(
        host: &Host,
        container: NodeId,
        text: &str,
        options: RevealOptions,
        flags: &FlagStore,
        on_complete: Option<RevealCallback>,
    ) -> Result<Self> {
        options.validate()?;
        let split = SplitText::split_with(host, container, text, options.split);
        let mut reveal = Self {
            container,
            options,
            flags: flags.clone(),
            split,
            timeline: TimelineSlot::new(),
            trigger: None,
            on_complete,
        };
        reveal.start(host);
        Ok(reveal)
    }

    /// Re-split with new text and reveal it from the start
    pub fn set_text(&mut self, host: &Host, text: &str) {
        self.trigger = None;
        self.timeline.clear();
        self.split.set_text(host, text);
        self.start(host);
    }

    fn start(&mut self, host: &Host) {
        let animate = self.flags.animations_enabled();
        let mut builder = TimelineBuilder::new(self.split.animated().iter().cloned())
            .from(self.options.from)
            .to(self.options.to)
            .easing(self.options.easing);
        builder = if animate {
            builder
                .stagger(self.options.stagger)
                .delay_ms(self.options.delay_ms)
                .duration_ms(self.options.duration_ms)
        } else {
            builder.duration_ms(0.0)
        };
        if let Some(callback) = &self.on_complete {
            let callback = Rc::clone(callback);
            builder = builder.on_complete(move || callback());
        }

        let timeline = self.timeline.replace(builder.build(host)).clone();
        match self.options.trigger {
            Some(config) if animate => {
                self.trigger = Some(ScrollTrigger::bind(host, self.container, config, timeline));
            }
            _ => timeline.play(),
        }
        tracing::debug!(
            targets = self.split.animated().len(),
            animate,
            "text reveal started"
        );
    }

    pub fn timeline(&self) -> Option<&Timeline> {
        self.timeline.get()
    }

    pub fn trigger(&self) -> Option<&ScrollTrigger> {
        self.trigger.as_ref()
    }

    pub fn split(&self) -> &SplitText {
        &self.split
    }

    pub fn is_complete(&self) -> bool {
        self.timeline().is_some_and(Timeline::is_completed)
    }

    /// Stop the timeline and remove the trigger's listeners
    pub fn unmount(mut self) {
        self.trigger = None;
        self.timeline.clear();
    }
}

/// A text reveal scrubbed by scroll position
pub struct ScrubReveal {
    reveal: TextReveal,
}

impl ScrubReveal {
    /// Mount with `options`; the trigger is forced into scrub mode, using the
    /// default thresholds when none are given.
    pub fn mount(
        host: &Host,
        container: NodeId,
        text: &str,
        options: RevealOptions,
        flags: &FlagStore,
    ) -> Result<Self> {
        let trigger = options
            .trigger
            .unwrap_or_default()
            .mode(TriggerMode::Scrub);
        let options = RevealOptions {
            trigger: Some(trigger),
            easing: Easing::Linear,
            ..options
        };
        Ok(Self {
            reveal: TextReveal::mount(host, container, text, options, flags)?,
        })
    }

    pub fn progress(&self) -> f32 {
        self.reveal.timeline().map(Timeline::progress).unwrap_or(0.0)
    }

    pub fn set_text(&mut self, host: &Host, text: &str) {
        self.reveal.set_text(host, text);
    }

    pub fn reveal(&self) -> &TextReveal {
        &self.reveal
    }

    pub fn unmount(self) {
        self.reveal.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_animation::TriggerState;
    use folio_core::{MemoryStorage, Rect, Viewport};
    use std::cell::Cell;

    fn setup(width: f32) -> (Host, NodeId, FlagStore) {
        let host = Host::new(Viewport::new(width, 800.0));
        let heading = host.append_element(host.root(), "h2");
        let flags = FlagStore::load(MemoryStorage::new(), width);
        (host, heading, flags)
    }

    #[test]
    fn test_validate_rejects_negative_timing() {
        let err = RevealOptions::default().duration_ms(-1.0).validate();
        assert!(matches!(
            err,
            Err(FolioError::InvalidOption {
                name: "duration",
                ..
            })
        ));
        assert!(RevealOptions::default()
            .from(VisualState {
                opacity: 2.0,
                ..VisualState::REST
            })
            .validate()
            .is_err());
        assert!(RevealOptions::heading().validate().is_ok());
    }

    #[test]
    fn test_completion_waits_for_last_target() {
        let (host, heading, flags) = setup(1280.0);
        let done = Rc::new(Cell::new(None));
        let record = done.clone();
        let clock = host.clone();

        let options = RevealOptions::paragraph()
            .stagger_ms(100.0)
            .duration_ms(300.0);
        let reveal = TextReveal::mount_with_callback(
            &host,
            heading,
            "one two three",
            options,
            &flags,
            move || record.set(Some(clock.now())),
        )
        .unwrap();

        host.run_frames(60, 16.0);
        let done = done.get().unwrap();
        assert!(done >= 2.0 * 100.0 + 300.0);
        assert!(reveal.is_complete());
    }

    #[test]
    fn test_set_text_completes_exactly_once() {
        let (host, heading, flags) = setup(1280.0);
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        let mut reveal = TextReveal::mount_with_callback(
            &host,
            heading,
            "first text",
            RevealOptions::default(),
            &flags,
            move || counter.set(counter.get() + 1),
        )
        .unwrap();

        host.run_frames(5, 16.0);
        reveal.set_text(&host, "second");
        host.run_frames(200, 16.0);

        assert_eq!(count.get(), 1);
        assert_eq!(host.document().text_content(heading), "second");
    }

    #[test]
    fn test_disabled_animations_write_final_state() {
        let (host, heading, flags) = setup(390.0);
        let reveal = TextReveal::mount(
            &host,
            heading,
            "hi",
            RevealOptions::default(),
            &flags,
        )
        .unwrap();

        assert!(reveal.is_complete());
        assert_eq!(host.pending_frames(), 0);
        for node in reveal.split().animated() {
            assert_eq!(node.style().unwrap().opacity, 1.0);
            assert!(node.style().unwrap().transform.is_identity());
        }
    }

    #[test]
    fn test_triggered_reveal_waits_for_scroll() {
        let (host, heading, flags) = setup(1280.0);
        host.document_mut()
            .set_rect(heading, Rect::new(0.0, 2000.0, 800.0, 80.0));
        let reveal = TextReveal::mount(
            &host,
            heading,
            "later",
            RevealOptions::default().trigger(TriggerConfig::default()),
            &flags,
        )
        .unwrap();

        host.run_frames(10, 16.0);
        assert!(!reveal.timeline().unwrap().is_active());

        host.scroll_to(1500.0);
        assert_eq!(reveal.trigger().unwrap().state(), TriggerState::Fired);
        host.run_frames(100, 16.0);
        assert!(reveal.is_complete());
    }

    #[test]
    fn test_unmount_mid_animation_stops_everything() {
        let (host, heading, flags) = setup(1280.0);
        host.document_mut()
            .set_rect(heading, Rect::new(0.0, 100.0, 800.0, 80.0));
        let reveal = TextReveal::mount(
            &host,
            heading,
            "going away",
            RevealOptions::default().trigger(TriggerConfig::default().mode(TriggerMode::Repeat)),
            &flags,
        )
        .unwrap();
        host.run_frames(3, 16.0);
        assert!(host.pending_frames() > 0);

        reveal.unmount();
        let writes = host.document().style_writes();
        let invocations = host.listener_invocations();

        host.scroll_to(900.0);
        host.resize(1024.0, 700.0);
        host.run_frames(100, 16.0);

        assert_eq!(host.document().style_writes(), writes);
        assert_eq!(host.listener_invocations(), invocations);
        assert_eq!(host.listener_count(), 0);
        assert_eq!(host.pending_frames(), 0);
    }

    #[test]
    fn test_scrub_reveal_follows_scroll() {
        let (host, heading, flags) = setup(1280.0);
        host.document_mut()
            .set_rect(heading, Rect::new(0.0, 1000.0, 800.0, 400.0));
        let options = RevealOptions::default().trigger(
            TriggerConfig::parse("top bottom", "bottom top").unwrap(),
        );
        let scrub = ScrubReveal::mount(&host, heading, "scrubbed", options, &flags).unwrap();

        host.scroll_to(800.0);
        assert!((scrub.progress() - 0.5).abs() < 1e-3);
        assert_eq!(host.pending_frames(), 0);

        scrub.unmount();
        assert_eq!(host.listener_count(), 0);
    }

    #[test]
    fn test_scrub_reveal_without_animations_is_complete() {
        let (host, heading, flags) = setup(390.0);
        let completed = Rc::new(Cell::new(0));
        let counter = Rc::clone(&completed);
        let reveal = TextReveal::mount_with_callback(
            &host,
            heading,
            "static",
            RevealOptions::default().trigger(TriggerConfig::default().mode(TriggerMode::Scrub)),
            &flags,
            move || counter.set(counter.get() + 1),
        )
        .unwrap();
        assert!(reveal.is_complete());
        assert_eq!(completed.get(), 1);
        assert_eq!(host.listener_count(), 0);
        reveal.unmount();

        let scrub = ScrubReveal::mount(
            &host,
            heading,
            "static",
            RevealOptions::default().trigger(TriggerConfig::default()),
            &flags,
        )
        .unwrap();
        assert!(scrub.reveal().is_complete());
        assert_eq!(scrub.progress(), 1.0);
        assert_eq!(host.pending_frames(), 0);
        for node in scrub.reveal().split().animated() {
            assert_eq!(node.style().unwrap().opacity, 1.0);
        }
    }
}
