//! Native listener bridge.
//!
//! [`BrowserShell`] owns the page's [`EventDispatcher`] and forwards
//! native events into it. Document listeners run in the capture phase
//! and are registered non-passive so `preventDefault` on `touchstart`
//! takes effect. Dropping the shell removes its native listeners.

use super::dom::{host_error, BrowserDom};
use super::events::to_dom_event;
use super::platform::{is_ios_user_agent, IOS_TAP_STYLES};
use super::scheduler::WindowScheduler;
use ctxmenu_core::{Dom, DomResult, EventDispatcher, EventKind};
use std::fmt;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Event, EventTarget};

const DOCUMENT_EVENTS: [EventKind; 4] = [
    EventKind::ContextMenu,
    EventKind::TouchStart,
    EventKind::TouchEnd,
    EventKind::Click,
];

struct NativeListener {
    target: EventTarget,
    kind: EventKind,
    capture: bool,
    closure: Closure<dyn FnMut(Event)>,
}

/// Connects a live page to an [`EventDispatcher`].
pub struct BrowserShell {
    dom: Rc<BrowserDom>,
    dispatcher: Rc<EventDispatcher<BrowserDom>>,
    scheduler: Rc<WindowScheduler>,
    listeners: Vec<NativeListener>,
}

impl BrowserShell {
    /// Bind to the current page and start forwarding events.
    ///
    /// # Errors
    ///
    /// Returns an error outside a browsing context or if a native
    /// listener cannot be registered.
    pub fn attach() -> DomResult<Self> {
        let dom = Rc::new(BrowserDom::new()?);
        apply_ios_tap_workaround(&dom);

        let mut shell = Self {
            dispatcher: Rc::new(EventDispatcher::new(Rc::clone(&dom))),
            scheduler: Rc::new(WindowScheduler::new(dom.window().clone())),
            dom,
            listeners: Vec::new(),
        };

        let document: EventTarget = shell.dom.document().clone().into();
        for kind in DOCUMENT_EVENTS {
            shell.listen(&document, kind, true)?;
        }
        let window: EventTarget = shell.dom.window().clone().into();
        shell.listen(&window, EventKind::Resize, false)?;

        log::debug!("browser shell attached with {} native listeners", shell.listeners.len());
        Ok(shell)
    }

    fn listen(&mut self, target: &EventTarget, kind: EventKind, capture: bool) -> DomResult<()> {
        let dom = Rc::clone(&self.dom);
        let dispatcher = Rc::clone(&self.dispatcher);
        let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(dom_event) = to_dom_event(&dom, &event, kind) else {
                return;
            };
            let outcome = dispatcher.dispatch(&dom_event);
            if outcome.default_prevented {
                event.prevent_default();
            }
            if outcome.propagation_stopped {
                event.stop_propagation();
            }
        });

        let options = AddEventListenerOptions::new();
        options.set_capture(capture);
        options.set_passive(false);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                kind.as_str(),
                closure.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(|e| host_error(&e))?;

        self.listeners.push(NativeListener {
            target: target.clone(),
            kind,
            capture,
            closure,
        });
        Ok(())
    }

    /// The page document.
    pub const fn dom(&self) -> &Rc<BrowserDom> {
        &self.dom
    }

    /// The dispatcher native events are forwarded to.
    pub const fn dispatcher(&self) -> &Rc<EventDispatcher<BrowserDom>> {
        &self.dispatcher
    }

    /// Timer service for widgets on this page.
    pub const fn scheduler(&self) -> &Rc<WindowScheduler> {
        &self.scheduler
    }
}

impl Drop for BrowserShell {
    fn drop(&mut self) {
        for listener in self.listeners.drain(..) {
            let removed = listener.target.remove_event_listener_with_callback_and_bool(
                listener.kind.as_str(),
                listener.closure.as_ref().unchecked_ref(),
                listener.capture,
            );
            if let Err(err) = removed {
                log::warn!("failed to remove {} listener: {err:?}", listener.kind);
            }
        }
    }
}

impl fmt::Debug for BrowserShell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrowserShell")
            .field("dispatcher", &self.dispatcher)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

/// On iOS, document click listeners only see taps on elements that look
/// clickable, so make the whole body look clickable.
fn apply_ios_tap_workaround(dom: &BrowserDom) {
    let user_agent = dom.window().navigator().user_agent().unwrap_or_default();
    if !is_ios_user_agent(&user_agent) {
        return;
    }
    let body = dom.body();
    for (property, value) in IOS_TAP_STYLES {
        if let Err(err) = dom.set_style(&body, property, value) {
            log::warn!("iOS tap workaround: {err}");
        }
    }
}
