//! Test harness for context menus.

use ctxmenu_core::{
    DispatchOutcome, Document, Dom, DomEvent, EventDispatcher, ManualScheduler, NodeId, Point,
    PointerInfo, Size,
};
use ctxmenu_widgets::render::TEXT_CLASS;
use ctxmenu_widgets::{ContextMenuHandle, MenuItemSelected, WidgetConfig};
use std::cell::RefCell;
use std::rc::Rc;

type Handle = ContextMenuHandle<Document, ManualScheduler>;

/// Test harness for interacting with installed context menus.
pub struct Harness {
    doc: Rc<Document>,
    dispatcher: Rc<EventDispatcher<Document>>,
    scheduler: Rc<ManualScheduler>,
    menus: Vec<Handle>,
    selections: Rc<RefCell<Vec<MenuItemSelected<NodeId>>>>,
    last_outcome: Option<DispatchOutcome>,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    /// Create a harness over an empty 1280x720 document.
    pub fn new() -> Self {
        let doc = Rc::new(Document::new());
        Self {
            dispatcher: Rc::new(EventDispatcher::new(Rc::clone(&doc))),
            doc,
            scheduler: Rc::new(ManualScheduler::new()),
            menus: Vec::new(),
            selections: Rc::new(RefCell::new(Vec::new())),
            last_outcome: None,
        }
    }

    /// Set the viewport size without raising a resize event.
    pub fn viewport(self, width: f32, height: f32) -> Self {
        self.doc.set_viewport(Size::new(width, height));
        self
    }

    // === Page Setup ===

    /// Append an element to the body.
    pub fn add(&mut self, tag: &str, classes: &[&str]) -> NodeId {
        let body = self.doc.body();
        self.add_to(body, tag, classes)
    }

    /// Append an element to `parent`.
    pub fn add_to(&mut self, parent: NodeId, tag: &str, classes: &[&str]) -> NodeId {
        self.doc
            .create_child(parent, tag, classes)
            .expect("harness parent exists")
    }

    /// Install a context menu on `selector`, recording its selections.
    pub fn install(&mut self, selector: &str, config: &WidgetConfig) -> &mut Self {
        let handle = ContextMenuHandle::install(
            &self.dispatcher,
            Rc::clone(&self.scheduler),
            selector,
            config,
        )
        .expect("context menu installs");
        let selections = Rc::clone(&self.selections);
        handle.set_on_select(move |selected| selections.borrow_mut().push(selected.clone()));
        self.menus.push(handle);
        self
    }

    /// Dispose the `index`th installed menu.
    pub fn dispose(&mut self, index: usize) -> &mut Self {
        if index < self.menus.len() {
            self.menus.remove(index).dispose();
        }
        self
    }

    // === Event Simulation ===

    /// Right-click the first element matching `selector` at page
    /// coordinates.
    pub fn right_click(&mut self, selector: &str, x: f32, y: f32) -> &mut Self {
        self.right_click_with(selector, PointerInfo::at_page(x, y))
    }

    /// Right-click reporting only client coordinates.
    pub fn right_click_client(&mut self, selector: &str, x: f32, y: f32) -> &mut Self {
        self.right_click_with(selector, PointerInfo::at_client(x, y))
    }

    fn right_click_with(&mut self, selector: &str, pointer: PointerInfo) -> &mut Self {
        if let Some(target) = self.query(selector) {
            self.dispatch(&DomEvent::ContextMenu { target, pointer });
        }
        self
    }

    /// Put a finger down on the first element matching `selector`.
    pub fn touch_start(&mut self, selector: &str, x: f32, y: f32) -> &mut Self {
        if let Some(target) = self.query(selector) {
            self.dispatch(&DomEvent::TouchStart {
                target,
                pointer: PointerInfo::touch(x, y),
            });
        }
        self
    }

    /// Lift the finger from the first element matching `selector`.
    pub fn touch_end(&mut self, selector: &str) -> &mut Self {
        if let Some(target) = self.query(selector) {
            self.dispatch(&DomEvent::TouchEnd { target });
        }
        self
    }

    /// Touch, hold for `ms`, release.
    pub fn touch_hold(&mut self, selector: &str, x: f32, y: f32, ms: u32) -> &mut Self {
        self.touch_start(selector, x, y);
        self.tick(ms);
        self.touch_end(selector)
    }

    /// Click the first element matching `selector`.
    pub fn click(&mut self, selector: &str) -> &mut Self {
        if let Some(target) = self.query(selector) {
            self.click_node(target);
        }
        self
    }

    /// Click the label of the first menu item whose text is `label`.
    pub fn click_text(&mut self, label: &str) -> &mut Self {
        if let Some(target) = self.find_label(label) {
            self.click_node(target);
        }
        self
    }

    /// Click a specific node.
    pub fn click_node(&mut self, target: NodeId) -> &mut Self {
        self.dispatch(&DomEvent::Click {
            target,
            pointer: PointerInfo::default(),
        });
        self
    }

    /// Resize the viewport and raise a resize event.
    pub fn resize(&mut self, width: f32, height: f32) -> &mut Self {
        let viewport = Size::new(width, height);
        self.doc.set_viewport(viewport);
        self.dispatch(&DomEvent::Resize { viewport });
        self
    }

    /// Scroll the document.
    pub fn scroll_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.doc.set_scroll(Point::new(x, y));
        self
    }

    /// Advance the virtual clock.
    pub fn tick(&mut self, ms: u32) -> &mut Self {
        self.scheduler.advance(ms);
        self
    }

    fn dispatch(&mut self, event: &DomEvent<NodeId>) {
        log::trace!("harness dispatching {}", event.kind());
        self.last_outcome = Some(self.dispatcher.dispatch(event));
    }

    // === Queries ===

    /// The document under test.
    pub fn document(&self) -> &Rc<Document> {
        &self.doc
    }

    /// The dispatcher events go through.
    pub fn dispatcher(&self) -> &Rc<EventDispatcher<Document>> {
        &self.dispatcher
    }

    /// The virtual clock.
    pub fn scheduler(&self) -> &Rc<ManualScheduler> {
        &self.scheduler
    }

    /// The `index`th installed menu.
    pub fn menu(&self, index: usize) -> Option<&Handle> {
        self.menus.get(index)
    }

    /// First element matching `selector`. Invalid selectors match nothing.
    pub fn query(&self, selector: &str) -> Option<NodeId> {
        self.query_all(selector).into_iter().next()
    }

    /// All elements matching `selector`, in document order.
    pub fn query_all(&self, selector: &str) -> Vec<NodeId> {
        self.doc.query_selector_all(selector).unwrap_or_default()
    }

    /// Whether an element matches `selector`.
    pub fn exists(&self, selector: &str) -> bool {
        self.query(selector).is_some()
    }

    /// Text content of the first element matching `selector`.
    pub fn text(&self, selector: &str) -> String {
        self.query(selector)
            .map(|node| self.doc.text_content(node))
            .unwrap_or_default()
    }

    /// Whether any installed menu is open.
    pub fn is_open(&self) -> bool {
        self.menus.iter().any(Handle::is_open)
    }

    /// Labels of every selection so far, oldest first.
    pub fn selected_labels(&self) -> Vec<String> {
        self.selections
            .borrow()
            .iter()
            .map(|s| s.item.label.clone())
            .collect()
    }

    /// Every selection so far.
    pub fn selections(&self) -> Vec<MenuItemSelected<NodeId>> {
        self.selections.borrow().clone()
    }

    /// Outcome of the last dispatched event.
    pub const fn last_outcome(&self) -> Option<DispatchOutcome> {
        self.last_outcome
    }

    fn find_label(&self, label: &str) -> Option<NodeId> {
        self.query_all(&format!(".{TEXT_CLASS}"))
            .into_iter()
            .find(|node| self.doc.text_content(*node) == label)
    }

    // === Assertions ===

    /// Assert that some menu is open.
    ///
    /// # Panics
    ///
    /// Panics if every menu is closed.
    pub fn assert_open(&self) -> &Self {
        assert!(self.is_open(), "Expected a context menu to be open");
        self
    }

    /// Assert that every menu is closed.
    ///
    /// # Panics
    ///
    /// Panics if a menu is open.
    pub fn assert_closed(&self) -> &Self {
        assert!(!self.is_open(), "Expected every context menu to be closed");
        self
    }

    /// Assert the labels selected so far.
    ///
    /// # Panics
    ///
    /// Panics if the selections differ.
    pub fn assert_selected(&self, expected: &[&str]) -> &Self {
        let actual = self.selected_labels();
        assert_eq!(
            actual, expected,
            "Expected selections {expected:?} but got {actual:?}"
        );
        self
    }

    /// Assert the count of elements matching `selector`.
    ///
    /// # Panics
    ///
    /// Panics if the count does not match.
    pub fn assert_count(&self, selector: &str, expected: usize) -> &Self {
        let actual = self.query_all(selector).len();
        assert_eq!(
            actual, expected,
            "Expected {expected} elements matching '{selector}' but found {actual}"
        );
        self
    }

    /// Assert that the last event had its default action prevented.
    ///
    /// # Panics
    ///
    /// Panics if no event was dispatched or nothing prevented it.
    pub fn assert_default_prevented(&self) -> &Self {
        assert!(
            self.last_outcome.is_some_and(|o| o.default_prevented),
            "Expected the last event's default action to be prevented"
        );
        self
    }

    /// Assert that every open menu lies inside the viewport.
    ///
    /// # Panics
    ///
    /// Panics if an open menu crosses a viewport edge.
    pub fn assert_within_viewport(&self) -> &Self {
        let viewport = self.doc.viewport_size();
        for menu in self.menus.iter().filter(|m| m.is_open()) {
            let pos = menu.position().unwrap_or(Point::ORIGIN);
            let size = self.doc.offset_size(&menu.root());
            assert!(
                pos.x >= 0.0 && pos.x + size.width <= viewport.width,
                "Menu {} spans x {}..{} outside width {}",
                menu.menu_id(),
                pos.x,
                pos.x + size.width,
                viewport.width
            );
            assert!(
                pos.y >= 0.0 && pos.y + size.height <= viewport.height,
                "Menu {} spans y {}..{} outside height {}",
                menu.menu_id(),
                pos.y,
                pos.y + size.height,
                viewport.height
            );
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctxmenu_widgets::MenuItemSpec;

    fn config() -> WidgetConfig {
        WidgetConfig::new()
            .item(MenuItemSpec::leaf("Copy"))
            .item(MenuItemSpec::submenu(
                "More",
                vec![MenuItemSpec::leaf("Rename")],
            ))
    }

    fn harness() -> Harness {
        let mut h = Harness::new();
        h.add("div", &["file"]);
        h.install(".file", &config());
        h
    }

    #[test]
    fn test_right_click_then_select() {
        let mut h = harness();
        h.right_click(".file", 50.0, 50.0);
        h.assert_open().assert_default_prevented();
        h.click_text("Copy");
        h.assert_closed().assert_selected(&["Copy"]);
    }

    #[test]
    fn test_missing_selector_is_noop() {
        let mut h = harness();
        h.right_click(".nope", 1.0, 1.0).click("[");
        h.assert_closed();
        assert!(h.last_outcome().is_none());
    }

    #[test]
    fn test_counts_rendered_items() {
        let h = harness();
        h.assert_count(".menu-item", 3)
            .assert_count(".menu-item.submenu", 1)
            .assert_count("menu.menu", 2);
        assert_eq!(h.text(".submenu > .menu .menu-text"), "Rename");
    }

    #[test]
    fn test_touch_hold() {
        let mut h = harness();
        h.touch_hold(".file", 10.0, 10.0, 499);
        h.assert_closed();
        h.touch_hold(".file", 10.0, 10.0, 500);
        h.assert_open().assert_within_viewport();
    }

    #[test]
    fn test_dispose_detaches() {
        let mut h = harness();
        h.dispose(0);
        assert_eq!(h.dispatcher().listener_count(), 0);
        h.right_click(".file", 1.0, 1.0);
        h.assert_closed();
        assert!(h.menu(0).is_none());
    }
}
