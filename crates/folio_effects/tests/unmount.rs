//! Every effect, unmounted mid-flight, leaves nothing running behind it

use folio_animation::TriggerConfig;
use folio_core::{FlagStore, Host, MemoryStorage, NodeId, Rect, Viewport};
use folio_effects::{
    CursorOptions, CustomCursor, HoverIntent, Magnetic, MagneticOptions, Parallax,
    ParallaxOptions, RevealOptions, ScrubReveal, Spotlight, SpotlightOptions, TextReveal, Tooltip,
};
use std::cell::Cell;
use std::rc::Rc;

struct Page {
    host: Host,
    button: NodeId,
    card: NodeId,
    image: NodeId,
    heading: NodeId,
    body: NodeId,
    tip: NodeId,
}

fn page() -> Page {
    let host = Host::new(Viewport::new(1280.0, 800.0));
    let root = host.root();
    let button = host.append_element(root, "button");
    let card = host.append_element(root, "div");
    let image = host.append_element(root, "img");
    let heading = host.append_element(root, "h1");
    let body = host.append_element(root, "p");
    let tip = host.append_element(root, "div");
    {
        let mut doc = host.document_mut();
        doc.set_rect(button, Rect::new(100.0, 100.0, 100.0, 40.0));
        doc.set_rect(card, Rect::new(300.0, 100.0, 400.0, 300.0));
        doc.set_rect(image, Rect::new(0.0, 600.0, 600.0, 400.0));
        doc.set_rect(heading, Rect::new(0.0, 200.0, 800.0, 80.0));
        doc.set_rect(body, Rect::new(0.0, 1400.0, 800.0, 300.0));
    }
    Page {
        host,
        button,
        card,
        image,
        heading,
        body,
        tip,
    }
}

fn interact(page: &Page) {
    let host = &page.host;
    host.pointer_move(150.0, 120.0, Some(page.button));
    host.pointer_enter(page.card);
    host.pointer_move(350.0, 150.0, Some(page.card));
    host.pointer_enter(page.button);
    host.scroll_to(300.0);
    host.run_frames(5, 16.0);
    host.pointer_leave(page.card);
    host.scroll_to(700.0);
    host.run_frames(5, 16.0);
}

#[test]
fn test_unmount_all_effects_mid_animation() {
    let page = page();
    let host = &page.host;
    let flags = FlagStore::load(MemoryStorage::new(), 1280.0);
    let completed = Rc::new(Cell::new(0));

    let magnetic = Magnetic::mount(host, page.button, MagneticOptions::default());
    let spotlight = Spotlight::mount(host, page.card, SpotlightOptions::default());
    let parallax = Parallax::mount(host, page.image, ParallaxOptions::default());
    let cursor = CustomCursor::mount(host, CursorOptions::default());
    let hover = HoverIntent::with_default_delay(host, page.card, |_, _| {});
    let tooltip = Tooltip::mount(host, page.button, page.tip, &flags);
    let counter = Rc::clone(&completed);
    let reveal = TextReveal::mount_with_callback(
        host,
        page.heading,
        "Selected work",
        RevealOptions::heading(),
        &flags,
        move || counter.set(counter.get() + 1),
    )
    .unwrap();
    let scrub = ScrubReveal::mount(
        host,
        page.body,
        "Scrolling reveals this paragraph",
        RevealOptions::paragraph().trigger(TriggerConfig::default()),
        &flags,
    )
    .unwrap();

    interact(&page);
    assert!(host.listener_count() > 0);
    assert!(!reveal.is_complete());

    magnetic.unmount();
    spotlight.unmount();
    parallax.unmount();
    cursor.unmount();
    hover.unmount();
    tooltip.unmount();
    reveal.unmount();
    scrub.unmount();

    let writes = host.document().style_writes();
    let invocations = host.listener_invocations();

    interact(&page);
    host.advance(5000.0);
    host.run_frames(120, 16.0);

    assert_eq!(host.listener_count(), 0);
    assert_eq!(host.listener_invocations(), invocations);
    assert_eq!(host.document().style_writes(), writes);
    assert_eq!(host.pending_frames(), 0);
    assert_eq!(host.pending_timers(), 0);
    assert_eq!(host.cursor_owner(), None);
    assert_eq!(completed.get(), 0);
}

#[test]
fn test_dropping_host_side_nodes_is_harmless() {
    let page = page();
    let host = &page.host;
    let _magnetic = Magnetic::mount(host, page.button, MagneticOptions::default());
    let _parallax = Parallax::mount(host, page.image, ParallaxOptions::default());

    host.document_mut().remove(page.button);
    host.document_mut().remove(page.image);
    let writes = host.document().style_writes();

    interact(&page);
    host.run_frames(30, 16.0);
    assert_eq!(host.document().style_writes(), writes);
}
