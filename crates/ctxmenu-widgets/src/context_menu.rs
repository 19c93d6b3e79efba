//! Context menu state machine.
//!
//! [`ContextMenu`] owns one rendered menu subtree and moves it between
//! [`MenuState::Closed`] and [`MenuState::Open`]. It knows nothing about
//! listeners; [`ContextMenuHandle`](crate::ContextMenuHandle) wires it to
//! an event dispatcher.

use crate::config::WidgetConfig;
use crate::error::WidgetResult;
use crate::item::MenuItemSpec;
use crate::placement::{place_menu, px};
use crate::render::{render_menu, RenderedLeaf, MENU_ITEM_CLASS, SHOW_CLASS, SUBMENU_CLASS};
use ctxmenu_core::{Dom, DomResult, Point, PointerInfo};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Visibility of a menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MenuState {
    /// Hidden
    #[default]
    Closed,
    /// Visible and positioned
    Open,
}

/// Random per-instance discriminator used in the menu's DOM id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(u32);

impl RunId {
    /// Largest generated value.
    pub const MAX: u32 = 1_000_000_001;

    /// Fixed run id.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Draw a run id in `0..=MAX`.
    #[must_use]
    pub fn random() -> Self {
        Self(rand::thread_rng().gen_range(0..=Self::MAX))
    }

    /// The numeric value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a document click landed relative to menu items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickTarget<N> {
    /// Inside a submenu header item
    SubmenuHeader(N),
    /// Inside a leaf item
    Leaf(N),
    /// Not inside any menu item
    Outside,
}

/// A rendered context menu and its open/closed state.
pub struct ContextMenu<D: Dom> {
    dom: Rc<D>,
    root: D::Node,
    menu_id: String,
    run_id: RunId,
    state: MenuState,
    edge_margin: f32,
    leaves: Vec<RenderedLeaf<D::Node>>,
    submenus: Vec<D::Node>,
    last_context_target: Option<D::Node>,
    position: Option<Point>,
}

impl<D: Dom> ContextMenu<D> {
    /// Render the menu described by `config` into `dom`, closed.
    ///
    /// # Errors
    ///
    /// Returns an error if the DOM rejects a node operation.
    pub fn build(dom: Rc<D>, config: &WidgetConfig, run_id: RunId) -> WidgetResult<Self> {
        let menu_id = format!("{}_{run_id}", config.menu_id_prefix());
        let rendered = render_menu(&*dom, &menu_id, &config.menu)?;
        log::debug!(
            "rendered {menu_id} with {} leaves, {} submenus",
            rendered.leaves.len(),
            rendered.submenus.len()
        );
        Ok(Self {
            dom,
            root: rendered.root,
            menu_id,
            run_id,
            state: MenuState::Closed,
            edge_margin: config.edge_margin.max(0.0),
            leaves: rendered.leaves,
            submenus: rendered.submenus,
            last_context_target: None,
            position: None,
        })
    }

    /// The root `menu` element.
    pub const fn root(&self) -> &D::Node {
        &self.root
    }

    /// DOM id of the root.
    pub fn menu_id(&self) -> &str {
        &self.menu_id
    }

    /// Instance discriminator.
    pub const fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Current state.
    pub const fn state(&self) -> MenuState {
        self.state
    }

    /// Whether the menu is visible.
    pub fn is_open(&self) -> bool {
        self.state == MenuState::Open
    }

    /// Element the menu was last opened on.
    pub const fn last_context_target(&self) -> Option<&D::Node> {
        self.last_context_target.as_ref()
    }

    /// Top-left corner from the last positioning.
    pub const fn position(&self) -> Option<Point> {
        self.position
    }

    /// Selectable items in document order.
    pub fn leaves(&self) -> &[RenderedLeaf<D::Node>] {
        &self.leaves
    }

    /// Submenu header elements in document order.
    pub fn submenus(&self) -> &[D::Node] {
        &self.submenus
    }

    /// Leaf rendered as `node`.
    pub fn leaf_for(&self, node: &D::Node) -> Option<&RenderedLeaf<D::Node>> {
        self.leaves.iter().find(|leaf| &leaf.node == node)
    }

    /// Item spec rendered as `node`.
    pub fn item_for(&self, node: &D::Node) -> Option<&MenuItemSpec> {
        self.leaf_for(node).map(|leaf| &*leaf.item)
    }

    /// Show the menu. Returns whether the state changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the DOM rejects the class change.
    pub fn open(&mut self) -> DomResult<bool> {
        if self.is_open() {
            return Ok(false);
        }
        self.dom.add_class(&self.root, SHOW_CLASS)?;
        self.state = MenuState::Open;
        log::debug!("{} opened", self.menu_id);
        Ok(true)
    }

    /// Hide the menu. Returns whether the state changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the DOM rejects the class change.
    pub fn close(&mut self) -> DomResult<bool> {
        if !self.is_open() {
            return Ok(false);
        }
        self.dom.remove_class(&self.root, SHOW_CLASS)?;
        self.state = MenuState::Closed;
        log::debug!("{} closed", self.menu_id);
        Ok(true)
    }

    /// Record `target`, open the menu and position it at `pointer`.
    /// Opening an open menu only moves it.
    ///
    /// # Errors
    ///
    /// Returns an error if the DOM rejects a class or style change.
    pub fn show_at(&mut self, target: D::Node, pointer: &PointerInfo) -> DomResult<Point> {
        self.last_context_target = Some(target);
        self.open()?;
        self.position_menu(pointer)
    }

    /// Move the menu next to `pointer`, keeping it inside the viewport.
    ///
    /// # Errors
    ///
    /// Returns an error if the DOM rejects the style change.
    pub fn position_menu(&mut self, pointer: &PointerInfo) -> DomResult<Point> {
        let at = pointer.resolve(self.dom.scroll_offset());
        let footprint = self.dom.offset_size(&self.root).grow(self.edge_margin);
        let pos = place_menu(at, footprint, self.dom.viewport_size());
        self.dom.set_style(&self.root, "left", &px(pos.x))?;
        self.dom.set_style(&self.root, "top", &px(pos.y))?;
        self.position = Some(pos);
        log::debug!("{} positioned at ({}, {})", self.menu_id, pos.x, pos.y);
        Ok(pos)
    }

    /// Classify a click by the nearest enclosing menu item.
    ///
    /// Classification is by class, so a click on another instance's
    /// items also counts as a menu-item click here.
    pub fn classify_click(&self, target: &D::Node) -> ClickTarget<D::Node> {
        match self.dom.closest_with_class(target, MENU_ITEM_CLASS) {
            Some(item) if self.dom.has_class(&item, SUBMENU_CLASS) => {
                ClickTarget::SubmenuHeader(item)
            }
            Some(item) => ClickTarget::Leaf(item),
            None => ClickTarget::Outside,
        }
    }
}

impl<D: Dom> fmt::Debug for ContextMenu<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextMenu")
            .field("menu_id", &self.menu_id)
            .field("state", &self.state)
            .field("leaves", &self.leaves.len())
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}
