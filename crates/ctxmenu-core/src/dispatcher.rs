//! Shell-owned event dispatcher.
//!
//! The application shell owns one [`EventDispatcher`] and feeds it every
//! input event. Widgets subscribe listeners to a window, the document or
//! a specific element and get a [`SubscriptionId`] back, which they drop
//! with [`EventDispatcher::unsubscribe`] on teardown.
//!
//! Propagation follows the DOM model: a capture pass from the window down
//! to the target, then a bubble pass back up. A listener may stop
//! propagation (remaining listeners on the current level still run) and
//! may prevent the default action, which the shell reports back to the
//! host in the [`DispatchOutcome`].

use crate::dom::Dom;
use crate::event::{DomEvent, EventKind};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Handle of a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// What a listener is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerTarget<N> {
    /// The window (top of every propagation path)
    Window,
    /// The document
    Document,
    /// A specific element
    Element(N),
}

/// Propagation phase a listener runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Window to target
    Capture,
    /// Target to window
    #[default]
    Bubble,
}

/// Mutable per-dispatch state handed to listeners.
#[derive(Debug, Clone, Default)]
pub struct EventContext {
    default_prevented: bool,
    propagation_stopped: bool,
    phase: Phase,
}

impl EventContext {
    /// Suppress the host's default action (native menu, click emulation).
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Stop propagation after the current level.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Whether a listener prevented the default action.
    #[must_use]
    pub const fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Whether a listener stopped propagation.
    #[must_use]
    pub const fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// Phase currently being dispatched.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }
}

/// Result of dispatching one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchOutcome {
    /// A listener called [`EventContext::prevent_default`]
    pub default_prevented: bool,
    /// A listener called [`EventContext::stop_propagation`]
    pub propagation_stopped: bool,
    /// Number of listeners invoked
    pub handlers_run: usize,
}

type Handler<N> = Rc<RefCell<dyn FnMut(&DomEvent<N>, &mut EventContext)>>;

struct Listener<N> {
    id: SubscriptionId,
    target: ListenerTarget<N>,
    kind: EventKind,
    phase: Phase,
    handler: Handler<N>,
}

/// Routes events to subscribed listeners.
pub struct EventDispatcher<D: Dom> {
    dom: Rc<D>,
    listeners: RefCell<Vec<Listener<D::Node>>>,
    next_id: Cell<u64>,
}

impl<D: Dom> EventDispatcher<D> {
    /// Create a dispatcher for a document.
    pub fn new(dom: Rc<D>) -> Self {
        Self {
            dom,
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        }
    }

    /// The document events are routed through.
    pub const fn dom(&self) -> &Rc<D> {
        &self.dom
    }

    /// Register a listener.
    pub fn subscribe<F>(
        &self,
        target: ListenerTarget<D::Node>,
        kind: EventKind,
        phase: Phase,
        handler: F,
    ) -> SubscriptionId
    where
        F: FnMut(&DomEvent<D::Node>, &mut EventContext) + 'static,
    {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push(Listener {
            id,
            target,
            kind,
            phase,
            handler: Rc::new(RefCell::new(handler)),
        });
        log::trace!("subscribed {id} to {kind}");
        id
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        // The listener drops after the borrow ends: its closure may own
        // handles that call back into the dispatcher.
        let removed = {
            let mut listeners = self.listeners.borrow_mut();
            listeners
                .iter()
                .position(|l| l.id == id)
                .map(|idx| listeners.remove(idx))
        };
        removed.is_some()
    }

    /// Whether a listener is still registered.
    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.listeners.borrow().iter().any(|l| l.id == id)
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Number of registered listeners for one event kind.
    pub fn listener_count_for(&self, kind: EventKind) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|l| l.kind == kind)
            .count()
    }

    /// Dispatch an event through capture and bubble passes.
    pub fn dispatch(&self, event: &DomEvent<D::Node>) -> DispatchOutcome {
        let mut ctx = EventContext::default();
        let mut outcome = DispatchOutcome::default();

        let levels: Vec<ListenerTarget<D::Node>> = match event.target() {
            Some(target) => {
                let mut levels = vec![ListenerTarget::Window, ListenerTarget::Document];
                let path = self.dom.ancestors(target);
                levels.extend(path.into_iter().rev().map(ListenerTarget::Element));
                levels
            }
            None => vec![ListenerTarget::Window],
        };

        ctx.phase = Phase::Capture;
        for level in &levels {
            outcome.handlers_run += self.run_level(level, event, &mut ctx);
            if ctx.propagation_stopped {
                break;
            }
        }

        if !ctx.propagation_stopped {
            ctx.phase = Phase::Bubble;
            for level in levels.iter().rev() {
                outcome.handlers_run += self.run_level(level, event, &mut ctx);
                if ctx.propagation_stopped {
                    break;
                }
            }
        }

        outcome.default_prevented = ctx.default_prevented;
        outcome.propagation_stopped = ctx.propagation_stopped;
        outcome
    }

    fn run_level(
        &self,
        level: &ListenerTarget<D::Node>,
        event: &DomEvent<D::Node>,
        ctx: &mut EventContext,
    ) -> usize {
        let kind = event.kind();
        // Snapshot so listeners may subscribe or unsubscribe while running.
        let batch: Vec<(SubscriptionId, Handler<D::Node>)> = self
            .listeners
            .borrow()
            .iter()
            .filter(|l| l.kind == kind && l.phase == ctx.phase && &l.target == level)
            .map(|l| (l.id, Rc::clone(&l.handler)))
            .collect();

        let mut ran = 0;
        for (id, cell) in batch {
            if !self.is_subscribed(id) {
                continue;
            }
            let Ok(mut handler) = cell.try_borrow_mut() else {
                log::warn!("{id} re-entered while handling {kind}, skipped");
                continue;
            };
            (&mut *handler)(event, ctx);
            ran += 1;
        }
        ran
    }
}

impl<D: Dom> fmt::Debug for EventDispatcher<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listeners", &self.listener_count())
            .field("next_id", &self.next_id.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, NodeId};
    use crate::event::PointerInfo;
    use crate::geometry::Size;

    fn setup() -> (Rc<Document>, EventDispatcher<Document>, NodeId, NodeId) {
        let doc = Rc::new(Document::new());
        let outer = doc.create_child(doc.body(), "div", &["outer"]).unwrap();
        let inner = doc.create_child(outer, "span", &["inner"]).unwrap();
        let dispatcher = EventDispatcher::new(Rc::clone(&doc));
        (doc, dispatcher, outer, inner)
    }

    fn click(target: NodeId) -> DomEvent<NodeId> {
        DomEvent::Click {
            target,
            pointer: PointerInfo::at_page(1.0, 1.0),
        }
    }

    fn recorder(
        log: &Rc<RefCell<Vec<&'static str>>>,
        name: &'static str,
    ) -> impl FnMut(&DomEvent<NodeId>, &mut EventContext) + 'static {
        let log = Rc::clone(log);
        move |_, _| log.borrow_mut().push(name)
    }

    // =========================================================================
    // Subscription Tests
    // =========================================================================

    #[test]
    fn test_subscribe_unsubscribe() {
        let (_doc, dispatcher, outer, _) = setup();
        let id = dispatcher.subscribe(
            ListenerTarget::Element(outer),
            EventKind::Click,
            Phase::Bubble,
            |_, _| {},
        );
        assert!(dispatcher.is_subscribed(id));
        assert_eq!(dispatcher.listener_count(), 1);
        assert_eq!(dispatcher.listener_count_for(EventKind::Click), 1);
        assert_eq!(dispatcher.listener_count_for(EventKind::Resize), 0);

        assert!(dispatcher.unsubscribe(id));
        assert!(!dispatcher.unsubscribe(id));
        assert!(!dispatcher.is_subscribed(id));
        assert_eq!(dispatcher.listener_count(), 0);
    }

    #[test]
    fn test_subscription_ids_unique() {
        let (_doc, dispatcher, _, _) = setup();
        let a = dispatcher.subscribe(ListenerTarget::Window, EventKind::Resize, Phase::Bubble, |_, _| {});
        let b = dispatcher.subscribe(ListenerTarget::Window, EventKind::Resize, Phase::Bubble, |_, _| {});
        assert_ne!(a, b);
    }

    // =========================================================================
    // Propagation Tests
    // =========================================================================

    #[test]
    fn test_capture_then_bubble_order() {
        let (_doc, dispatcher, outer, inner) = setup();
        let log = Rc::new(RefCell::new(Vec::new()));

        dispatcher.subscribe(ListenerTarget::Document, EventKind::Click, Phase::Bubble, recorder(&log, "doc-bubble"));
        dispatcher.subscribe(ListenerTarget::Element(inner), EventKind::Click, Phase::Bubble, recorder(&log, "inner"));
        dispatcher.subscribe(ListenerTarget::Element(outer), EventKind::Click, Phase::Bubble, recorder(&log, "outer"));
        dispatcher.subscribe(ListenerTarget::Document, EventKind::Click, Phase::Capture, recorder(&log, "doc-capture"));

        let outcome = dispatcher.dispatch(&click(inner));
        assert_eq!(*log.borrow(), vec!["doc-capture", "inner", "outer", "doc-bubble"]);
        assert_eq!(outcome.handlers_run, 4);
        assert!(!outcome.default_prevented);
    }

    #[test]
    fn test_stop_propagation_in_capture() {
        let (_doc, dispatcher, _, inner) = setup();
        let log = Rc::new(RefCell::new(Vec::new()));

        dispatcher.subscribe(ListenerTarget::Document, EventKind::Click, Phase::Capture, |_, ctx| {
            ctx.stop_propagation();
        });
        dispatcher.subscribe(ListenerTarget::Element(inner), EventKind::Click, Phase::Bubble, recorder(&log, "inner"));

        let outcome = dispatcher.dispatch(&click(inner));
        assert!(log.borrow().is_empty());
        assert!(outcome.propagation_stopped);
        assert_eq!(outcome.handlers_run, 1);
    }

    #[test]
    fn test_stop_propagation_runs_same_level() {
        let (_doc, dispatcher, outer, inner) = setup();
        let log = Rc::new(RefCell::new(Vec::new()));

        dispatcher.subscribe(ListenerTarget::Element(inner), EventKind::Click, Phase::Bubble, |_, ctx| {
            ctx.stop_propagation();
        });
        dispatcher.subscribe(ListenerTarget::Element(inner), EventKind::Click, Phase::Bubble, recorder(&log, "inner-2"));
        dispatcher.subscribe(ListenerTarget::Element(outer), EventKind::Click, Phase::Bubble, recorder(&log, "outer"));

        dispatcher.dispatch(&click(inner));
        assert_eq!(*log.borrow(), vec!["inner-2"]);
    }

    #[test]
    fn test_prevent_default_reported() {
        let (_doc, dispatcher, outer, inner) = setup();
        dispatcher.subscribe(ListenerTarget::Element(outer), EventKind::ContextMenu, Phase::Bubble, |_, ctx| {
            assert_eq!(ctx.phase(), Phase::Bubble);
            ctx.prevent_default();
        });

        let outcome = dispatcher.dispatch(&DomEvent::ContextMenu {
            target: inner,
            pointer: PointerInfo::default(),
        });
        assert!(outcome.default_prevented);
    }

    #[test]
    fn test_kind_filter() {
        let (_doc, dispatcher, _, inner) = setup();
        let log = Rc::new(RefCell::new(Vec::new()));
        dispatcher.subscribe(ListenerTarget::Element(inner), EventKind::TouchStart, Phase::Bubble, recorder(&log, "touch"));

        let outcome = dispatcher.dispatch(&click(inner));
        assert!(log.borrow().is_empty());
        assert_eq!(outcome.handlers_run, 0);
    }

    #[test]
    fn test_sibling_not_on_path() {
        let (doc, dispatcher, outer, _) = setup();
        let sibling = doc.create_child(doc.body(), "div", &[]).unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        dispatcher.subscribe(ListenerTarget::Element(outer), EventKind::Click, Phase::Bubble, recorder(&log, "outer"));

        dispatcher.dispatch(&click(sibling));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_resize_reaches_window_only() {
        let (_doc, dispatcher, _, _) = setup();
        let log = Rc::new(RefCell::new(Vec::new()));
        dispatcher.subscribe(ListenerTarget::Window, EventKind::Resize, Phase::Bubble, recorder(&log, "window"));
        dispatcher.subscribe(ListenerTarget::Document, EventKind::Resize, Phase::Bubble, recorder(&log, "document"));

        dispatcher.dispatch(&DomEvent::Resize {
            viewport: Size::new(640.0, 480.0),
        });
        assert_eq!(*log.borrow(), vec!["window"]);
    }

    // =========================================================================
    // Re-entrancy Tests
    // =========================================================================

    #[test]
    fn test_unsubscribe_during_dispatch_skips_listener() {
        let (_doc, dispatcher, _, inner) = setup();
        let dispatcher = Rc::new(dispatcher);
        let log = Rc::new(RefCell::new(Vec::new()));

        let victim = Rc::new(Cell::new(None));
        let d = Rc::clone(&dispatcher);
        let v = Rc::clone(&victim);
        dispatcher.subscribe(ListenerTarget::Element(inner), EventKind::Click, Phase::Bubble, move |_, _| {
            if let Some(id) = v.get() {
                d.unsubscribe(id);
            }
        });
        let id = dispatcher.subscribe(ListenerTarget::Element(inner), EventKind::Click, Phase::Bubble, recorder(&log, "victim"));
        victim.set(Some(id));

        dispatcher.dispatch(&click(inner));
        assert!(log.borrow().is_empty());
        assert_eq!(dispatcher.listener_count(), 1);
    }

    #[test]
    fn test_subscribe_during_dispatch_not_run_this_round() {
        let (_doc, dispatcher, _, inner) = setup();
        let dispatcher = Rc::new(dispatcher);
        let count = Rc::new(Cell::new(0));

        let d = Rc::clone(&dispatcher);
        let c = Rc::clone(&count);
        dispatcher.subscribe(ListenerTarget::Element(inner), EventKind::Click, Phase::Bubble, move |_, _| {
            let c = Rc::clone(&c);
            d.subscribe(ListenerTarget::Element(inner), EventKind::Click, Phase::Bubble, move |_, _| {
                c.set(c.get() + 1);
            });
        });

        dispatcher.dispatch(&click(inner));
        assert_eq!(count.get(), 0);
        dispatcher.dispatch(&click(inner));
        assert_eq!(count.get(), 1);
    }
}
