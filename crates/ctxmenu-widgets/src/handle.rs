//! Installing a context menu into an event dispatcher.
//!
//! [`ContextMenuHandle::install`] renders the menu and subscribes:
//!
//! - `contextmenu`, `touchstart`, `touchend` on every target element
//! - `click` on the document, capture phase, to classify clicks
//! - `click` on every leaf item, to report selections
//! - `resize` on the window
//!
//! Dropping the handle removes every subscription and cancels a pending
//! long-press timer.

use crate::config::WidgetConfig;
use crate::context_menu::{ClickTarget, ContextMenu, MenuState, RunId};
use crate::error::WidgetResult;
use crate::item::MenuItemSpec;
use ctxmenu_core::{
    Dom, DomEvent, EventDispatcher, EventKind, ListenerTarget, Phase, Point, PointerInfo,
    Scheduler, SubscriptionId, TimerId,
};
use serde::Serialize;
use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Emitted when a leaf item is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItemSelected<N> {
    /// The chosen item
    pub item: MenuItemSpec,
    /// Index path of the item from the top level
    pub path: Vec<usize>,
    /// Element the menu was opened on
    pub context_target: Option<N>,
}

type SelectCallback<N> = Box<dyn FnMut(&MenuItemSelected<N>)>;

struct Shared<D: Dom> {
    menu: RefCell<ContextMenu<D>>,
    on_select: RefCell<Option<SelectCallback<D::Node>>>,
    pending_press: Cell<Option<TimerId>>,
    touch_delay: u32,
}

impl<D: Dom> Shared<D> {
    fn show_at(&self, target: D::Node, pointer: &PointerInfo) {
        if let Err(err) = self.menu.borrow_mut().show_at(target, pointer) {
            log::warn!("failed to open context menu: {err}");
        }
    }

    fn close(&self) {
        if let Err(err) = self.menu.borrow_mut().close() {
            log::warn!("failed to close context menu: {err}");
        }
    }

    fn cancel_press<S: Scheduler + ?Sized>(&self, scheduler: &S) {
        if let Some(id) = self.pending_press.take() {
            scheduler.cancel(id);
        }
    }

    fn select(&self, item: &MenuItemSpec, path: &[usize]) {
        self.close();
        let selected = MenuItemSelected {
            item: item.clone(),
            path: path.to_vec(),
            context_target: self.menu.borrow().last_context_target().cloned(),
        };
        log::debug!("selected {:?} ({:?})", selected.item.label, selected.path);

        // Taken out while running so the callback may replace itself.
        let callback = self.on_select.borrow_mut().take();
        if let Some(mut callback) = callback {
            callback(&selected);
            let mut slot = self.on_select.borrow_mut();
            if slot.is_none() {
                *slot = Some(callback);
            }
        }
    }
}

/// Options for [`ContextMenuHandle::install_with`].
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// Selector for target elements; empty falls back to
    /// `config.target_classes`
    pub target_selector: String,
    /// Fixed run id instead of a random one
    pub run_id: Option<RunId>,
}

impl InstallOptions {
    /// Options targeting `selector`.
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            target_selector: selector.into(),
            run_id: None,
        }
    }

    /// Use a fixed run id.
    #[must_use]
    pub const fn run_id(mut self, run_id: RunId) -> Self {
        self.run_id = Some(run_id);
        self
    }
}

/// An installed context menu.
pub struct ContextMenuHandle<D: Dom + 'static, S: Scheduler + 'static> {
    shared: Rc<Shared<D>>,
    dispatcher: Rc<EventDispatcher<D>>,
    scheduler: Rc<S>,
    targets: Vec<D::Node>,
    subscriptions: Vec<SubscriptionId>,
}

impl<D: Dom + 'static, S: Scheduler + 'static> ContextMenuHandle<D, S> {
    /// Render `config.menu` and attach it to every element matching
    /// `target_selector`.
    ///
    /// Matching zero elements is not an error: the menu is rendered and
    /// nothing ever opens it.
    ///
    /// # Errors
    ///
    /// Returns an error if the DOM rejects a node operation while
    /// rendering.
    pub fn install(
        dispatcher: &Rc<EventDispatcher<D>>,
        scheduler: Rc<S>,
        target_selector: &str,
        config: &WidgetConfig,
    ) -> WidgetResult<Self> {
        Self::install_with(
            dispatcher,
            scheduler,
            config,
            &InstallOptions::new(target_selector),
        )
    }

    /// Like [`install`](Self::install) with explicit options.
    ///
    /// # Errors
    ///
    /// Returns an error if the DOM rejects a node operation while
    /// rendering.
    pub fn install_with(
        dispatcher: &Rc<EventDispatcher<D>>,
        scheduler: Rc<S>,
        config: &WidgetConfig,
        options: &InstallOptions,
    ) -> WidgetResult<Self> {
        for warning in config.validate() {
            log::warn!("context menu config: {warning}");
        }

        let dom = Rc::clone(dispatcher.dom());
        let run_id = options.run_id.unwrap_or_else(RunId::random);
        let menu = ContextMenu::build(Rc::clone(&dom), config, run_id)?;
        let shared = Rc::new(Shared {
            menu: RefCell::new(menu),
            on_select: RefCell::new(None),
            pending_press: Cell::new(None),
            touch_delay: config.touch_delay,
        });

        let selector = if options.target_selector.trim().is_empty() {
            config.target_classes.as_str()
        } else {
            options.target_selector.as_str()
        };
        let targets = resolve_targets(&*dom, selector);

        let mut handle = Self {
            shared,
            dispatcher: Rc::clone(dispatcher),
            scheduler,
            targets,
            subscriptions: Vec::new(),
        };
        handle.subscribe_targets();
        handle.subscribe_leaves();
        handle.subscribe_document();
        log::debug!(
            "installed {} on {} targets with {} listeners",
            handle.menu_id(),
            handle.targets.len(),
            handle.subscriptions.len()
        );
        Ok(handle)
    }

    fn subscribe_targets(&mut self) {
        for target in self.targets.clone() {
            let weak = Rc::downgrade(&self.shared);
            let id = self.dispatcher.subscribe(
                ListenerTarget::Element(target.clone()),
                EventKind::ContextMenu,
                Phase::Bubble,
                move |event, ctx| {
                    ctx.prevent_default();
                    if let (Some(shared), DomEvent::ContextMenu { target, pointer }) =
                        (weak.upgrade(), event)
                    {
                        shared.show_at(target.clone(), pointer);
                    }
                },
            );
            self.subscriptions.push(id);

            let weak = Rc::downgrade(&self.shared);
            let scheduler = Rc::clone(&self.scheduler);
            let id = self.dispatcher.subscribe(
                ListenerTarget::Element(target.clone()),
                EventKind::TouchStart,
                Phase::Bubble,
                move |event, ctx| {
                    ctx.prevent_default();
                    let (Some(shared), DomEvent::TouchStart { target, pointer }) =
                        (weak.upgrade(), event)
                    else {
                        return;
                    };
                    shared.close();
                    shared.cancel_press(&*scheduler);
                    let weak = Weak::clone(&weak);
                    let target = target.clone();
                    let pointer = pointer.clone();
                    let timer = scheduler.schedule(
                        shared.touch_delay,
                        Box::new(move || {
                            if let Some(shared) = weak.upgrade() {
                                shared.pending_press.set(None);
                                shared.show_at(target, &pointer);
                            }
                        }),
                    );
                    shared.pending_press.set(Some(timer));
                },
            );
            self.subscriptions.push(id);

            let weak = Rc::downgrade(&self.shared);
            let scheduler = Rc::clone(&self.scheduler);
            let id = self.dispatcher.subscribe(
                ListenerTarget::Element(target),
                EventKind::TouchEnd,
                Phase::Bubble,
                move |_, _| {
                    if let Some(shared) = weak.upgrade() {
                        shared.cancel_press(&*scheduler);
                    }
                },
            );
            self.subscriptions.push(id);
        }
    }

    fn subscribe_leaves(&mut self) {
        let leaves: Vec<_> = self.shared.menu.borrow().leaves().to_vec();
        for leaf in leaves {
            let weak = Rc::downgrade(&self.shared);
            let item = Rc::clone(&leaf.item);
            let path = leaf.path;
            let id = self.dispatcher.subscribe(
                ListenerTarget::Element(leaf.node),
                EventKind::Click,
                Phase::Bubble,
                move |_, ctx| {
                    ctx.stop_propagation();
                    if let Some(shared) = weak.upgrade() {
                        shared.select(&item, &path);
                    }
                },
            );
            self.subscriptions.push(id);
        }
    }

    fn subscribe_document(&mut self) {
        let weak = Rc::downgrade(&self.shared);
        let id = self.dispatcher.subscribe(
            ListenerTarget::Document,
            EventKind::Click,
            Phase::Capture,
            move |event, ctx| {
                let (Some(shared), Some(target)) = (weak.upgrade(), event.target()) else {
                    return;
                };
                let class = shared.menu.borrow().classify_click(target);
                match class {
                    ClickTarget::SubmenuHeader(_) => {
                        ctx.prevent_default();
                        ctx.stop_propagation();
                    }
                    ClickTarget::Leaf(_) => {
                        ctx.prevent_default();
                        shared.close();
                    }
                    ClickTarget::Outside => shared.close(),
                }
            },
        );
        self.subscriptions.push(id);

        let weak = Rc::downgrade(&self.shared);
        let id = self.dispatcher.subscribe(
            ListenerTarget::Window,
            EventKind::Resize,
            Phase::Bubble,
            move |_, _| {
                if let Some(shared) = weak.upgrade() {
                    shared.close();
                }
            },
        );
        self.subscriptions.push(id);
    }

    /// Set the selection callback, replacing any previous one.
    pub fn set_on_select<F>(&self, callback: F)
    where
        F: FnMut(&MenuItemSelected<D::Node>) + 'static,
    {
        *self.shared.on_select.borrow_mut() = Some(Box::new(callback));
    }

    /// Remove the selection callback.
    pub fn clear_on_select(&self) {
        self.shared.on_select.borrow_mut().take();
    }

    /// Whether a selection callback is set.
    pub fn has_on_select(&self) -> bool {
        self.shared.on_select.borrow().is_some()
    }

    /// Borrow the menu state machine.
    pub fn menu(&self) -> Ref<'_, ContextMenu<D>> {
        self.shared.menu.borrow()
    }

    /// DOM id of the rendered menu.
    pub fn menu_id(&self) -> String {
        self.menu().menu_id().to_string()
    }

    /// Root element of the rendered menu.
    pub fn root(&self) -> D::Node {
        self.menu().root().clone()
    }

    /// Current state.
    pub fn state(&self) -> MenuState {
        self.menu().state()
    }

    /// Whether the menu is visible.
    pub fn is_open(&self) -> bool {
        self.menu().is_open()
    }

    /// Top-left corner from the last positioning.
    pub fn position(&self) -> Option<Point> {
        self.menu().position()
    }

    /// Element the menu was last opened on.
    pub fn last_context_target(&self) -> Option<D::Node> {
        self.menu().last_context_target().cloned()
    }

    /// Elements the menu is attached to.
    pub fn targets(&self) -> &[D::Node] {
        &self.targets
    }

    /// Listener ids owned by this handle.
    pub fn subscriptions(&self) -> &[SubscriptionId] {
        &self.subscriptions
    }

    /// Whether a long-press timer is armed.
    pub fn has_pending_press(&self) -> bool {
        self.shared.pending_press.get().is_some()
    }

    /// Open the menu at `pointer` as if `target` had been right-clicked.
    pub fn open_at(&self, target: D::Node, pointer: &PointerInfo) {
        self.shared.show_at(target, pointer);
    }

    /// Hide the menu.
    pub fn close(&self) {
        self.shared.close();
    }

    /// Remove every listener and hide the menu. The rendered subtree
    /// stays in the document.
    pub fn dispose(self) {
        drop(self);
    }

    fn teardown(&mut self) {
        for id in self.subscriptions.drain(..) {
            self.dispatcher.unsubscribe(id);
        }
        self.shared.cancel_press(&*self.scheduler);
        self.shared.close();
    }
}

impl<D: Dom + 'static, S: Scheduler + 'static> Drop for ContextMenuHandle<D, S> {
    fn drop(&mut self) {
        self.teardown();
        log::debug!("disposed {}", self.shared.menu.borrow().menu_id());
    }
}

impl<D: Dom + 'static, S: Scheduler + 'static> fmt::Debug for ContextMenuHandle<D, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextMenuHandle")
            .field("menu", &*self.shared.menu.borrow())
            .field("targets", &self.targets.len())
            .field("subscriptions", &self.subscriptions.len())
            .finish_non_exhaustive()
    }
}

fn resolve_targets<D: Dom>(dom: &D, selector: &str) -> Vec<D::Node> {
    if selector.trim().is_empty() {
        log::warn!("context menu has no target selector");
        return Vec::new();
    }
    match dom.query_selector_all(selector) {
        Ok(targets) => {
            if targets.is_empty() {
                log::warn!("context menu selector {selector:?} matched no elements");
            }
            targets
        }
        Err(err) => {
            log::warn!("context menu selector ignored: {err}");
            Vec::new()
        }
    }
}
