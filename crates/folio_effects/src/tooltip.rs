//! Tooltips gated by the tooltips feature flag

use crate::hover::{HoverIntent, HOVER_INTENT_DELAY_MS};
use folio_core::{FlagStore, FlagSubscription, Host, NodeId, NodeRef, WeakHost};
use std::rc::Rc;

/// Attribute set on a tooltip while it is shown
pub const VISIBLE_ATTR: &str = "data-visible";

fn show(host: &Host, tooltip: &NodeRef, visible: bool) {
    if !tooltip.set_opacity(if visible { 1.0 } else { 0.0 }) {
        return;
    }
    let mut doc = host.document_mut();
    if visible {
        doc.set_attribute(tooltip.id(), VISIBLE_ATTR, "true");
    } else {
        doc.remove_attribute(tooltip.id(), VISIBLE_ATTR);
    }
}

/// Shows `tooltip` after a sustained hover over `anchor`
pub struct Tooltip {
    intent: HoverIntent,
    _subscription: FlagSubscription,
}

impl Tooltip {
    pub fn mount(host: &Host, anchor: NodeId, tooltip: NodeId, flags: &FlagStore) -> Self {
        Self::mount_with_delay(host, anchor, tooltip, flags, HOVER_INTENT_DELAY_MS)
    }

    pub fn mount_with_delay(
        host: &Host,
        anchor: NodeId,
        tooltip: NodeId,
        flags: &FlagStore,
        delay_ms: f64,
    ) -> Self {
        let node = Rc::new(host.node(tooltip));
        show(host, &node, false);

        let gate = flags.clone();
        let target = Rc::clone(&node);
        let intent = HoverIntent::mount(host, anchor, delay_ms, move |host, active| {
            show(host, &target, active && gate.tooltips_enabled());
        });

        // Hide immediately if tooltips get switched off while one is open
        let weak: WeakHost = host.downgrade();
        let subscription = flags.subscribe(move |flags| {
            if !flags.tooltips_enabled {
                if let Some(host) = weak.upgrade() {
                    show(&host, &node, false);
                }
            }
        });

        Self {
            intent,
            _subscription: subscription,
        }
    }

    pub fn is_hovered(&self) -> bool {
        self.intent.is_active()
    }

    pub fn unmount(self) {
        self.intent.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{Flag, MemoryStorage};

    fn setup(tooltips: bool) -> (Host, NodeId, NodeId, FlagStore) {
        let host = Host::default();
        let anchor = host.append_element(host.root(), "button");
        let tip = host.append_element(host.root(), "div");
        let flags = FlagStore::load(MemoryStorage::new(), 1280.0);
        flags.set(Flag::Tooltips, tooltips).unwrap();
        (host, anchor, tip, flags)
    }

    fn visible(host: &Host, tip: NodeId) -> bool {
        host.document().attribute(tip, VISIBLE_ATTR).is_some()
    }

    #[test]
    fn test_shows_after_hover_intent() {
        let (host, anchor, tip, flags) = setup(true);
        let _tooltip = Tooltip::mount(&host, anchor, tip, &flags);

        host.pointer_enter(anchor);
        host.advance(600.0);
        assert!(visible(&host, tip));
        assert_eq!(host.document().style(tip).unwrap().opacity, 1.0);

        host.pointer_leave(anchor);
        assert!(!visible(&host, tip));
    }

    #[test]
    fn test_disabled_flag_never_shows() {
        let (host, anchor, tip, flags) = setup(false);
        let tooltip = Tooltip::mount(&host, anchor, tip, &flags);

        host.pointer_enter(anchor);
        host.advance(1000.0);
        assert!(tooltip.is_hovered());
        assert!(!visible(&host, tip));
    }

    #[test]
    fn test_turning_flag_off_hides_open_tooltip() {
        let (host, anchor, tip, flags) = setup(true);
        let _tooltip = Tooltip::mount(&host, anchor, tip, &flags);
        host.pointer_enter(anchor);
        host.advance(600.0);

        flags.toggle(Flag::Tooltips).unwrap();
        assert!(!visible(&host, tip));
    }
}
