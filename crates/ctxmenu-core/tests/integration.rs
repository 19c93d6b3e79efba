//! Integration tests for ctxmenu-core.
//!
//! These tests verify the public API works correctly end-to-end.

use ctxmenu_core::{
    Document, Dom, DomEvent, EventDispatcher, EventKind, ListenerTarget, ManualScheduler, Phase,
    PointerInfo, Scheduler, Size,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

// =============================================================================
// Dispatcher + Document
// =============================================================================

#[test]
fn test_listeners_on_selected_targets_only() {
    let doc = Rc::new(Document::new());
    let body = doc.body();
    let list = doc.create_child(body, "ul", &[]).expect("append");
    let a = doc.create_child(list, "li", &["task"]).expect("append");
    let b = doc.create_child(list, "li", &["task"]).expect("append");
    let other = doc.create_child(list, "li", &["note"]).expect("append");

    let dispatcher = EventDispatcher::new(Rc::clone(&doc));
    let hits = Rc::new(RefCell::new(Vec::new()));
    for node in doc.query_selector_all(".task").expect("query") {
        let hits = Rc::clone(&hits);
        dispatcher.subscribe(
            ListenerTarget::Element(node),
            EventKind::ContextMenu,
            Phase::Bubble,
            move |event, ctx| {
                ctx.prevent_default();
                hits.borrow_mut().push(*event.target().expect("targeted"));
            },
        );
    }

    for target in [a, other, b] {
        dispatcher.dispatch(&DomEvent::ContextMenu {
            target,
            pointer: PointerInfo::at_page(10.0, 10.0),
        });
    }

    assert_eq!(*hits.borrow(), vec![a, b]);
}

#[test]
fn test_nested_click_bubbles_to_listener() {
    let doc = Rc::new(Document::new());
    let card = doc.create_child(doc.body(), "div", &["card"]).expect("append");
    let title = doc.create_child(card, "h2", &[]).expect("append");
    doc.append_text(&title, "Quarterly report").expect("text");

    let dispatcher = EventDispatcher::new(Rc::clone(&doc));
    let clicked = Rc::new(Cell::new(false));
    let c = Rc::clone(&clicked);
    dispatcher.subscribe(
        ListenerTarget::Element(card),
        EventKind::Click,
        Phase::Bubble,
        move |_, _| c.set(true),
    );

    let outcome = dispatcher.dispatch(&DomEvent::Click {
        target: title,
        pointer: PointerInfo::default(),
    });
    assert!(clicked.get());
    assert_eq!(outcome.handlers_run, 1);
    assert_eq!(doc.text_content(card), "Quarterly report");
}

// =============================================================================
// Scheduler + Dispatcher
// =============================================================================

#[test]
fn test_touch_hold_pattern() {
    let doc = Rc::new(Document::new());
    let target = doc.create_child(doc.body(), "div", &[]).expect("append");
    let dispatcher = EventDispatcher::new(Rc::clone(&doc));
    let scheduler = Rc::new(ManualScheduler::new());
    let pending = Rc::new(Cell::new(None));
    let held = Rc::new(Cell::new(0));

    {
        let scheduler = Rc::clone(&scheduler);
        let pending = Rc::clone(&pending);
        let held = Rc::clone(&held);
        dispatcher.subscribe(
            ListenerTarget::Element(target),
            EventKind::TouchStart,
            Phase::Bubble,
            move |_, _| {
                let held = Rc::clone(&held);
                let id = scheduler.schedule(500, Box::new(move || held.set(held.get() + 1)));
                pending.set(Some(id));
            },
        );
    }
    {
        let scheduler = Rc::clone(&scheduler);
        let pending = Rc::clone(&pending);
        dispatcher.subscribe(
            ListenerTarget::Element(target),
            EventKind::TouchEnd,
            Phase::Bubble,
            move |_, _| {
                if let Some(id) = pending.take() {
                    scheduler.cancel(id);
                }
            },
        );
    }

    // Short tap
    dispatcher.dispatch(&DomEvent::TouchStart {
        target,
        pointer: PointerInfo::touch(5.0, 5.0),
    });
    scheduler.advance(300);
    dispatcher.dispatch(&DomEvent::TouchEnd { target });
    scheduler.advance(1000);
    assert_eq!(held.get(), 0);

    // Long hold
    dispatcher.dispatch(&DomEvent::TouchStart {
        target,
        pointer: PointerInfo::touch(5.0, 5.0),
    });
    scheduler.advance(500);
    assert_eq!(held.get(), 1);
}

#[test]
fn test_resize_event_carries_viewport() {
    let doc = Rc::new(Document::new());
    let dispatcher = EventDispatcher::new(Rc::clone(&doc));
    let seen = Rc::new(Cell::new(Size::ZERO));
    let s = Rc::clone(&seen);
    dispatcher.subscribe(
        ListenerTarget::Window,
        EventKind::Resize,
        Phase::Bubble,
        move |event, _| {
            if let DomEvent::Resize { viewport } = event {
                s.set(*viewport);
            }
        },
    );

    dispatcher.dispatch(&DomEvent::Resize {
        viewport: Size::new(375.0, 667.0),
    });
    assert_eq!(seen.get(), Size::new(375.0, 667.0));
}
