//! Menu tree rendering.
//!
//! Builds the menu subtree depth-first through the [`Dom`] seam:
//!
//! ```text
//! menu.menu#{prefix}_{runId}
//!   li.menu-item                 leaf
//!     button.menu-btn[type=button]
//!       i.{iconClass}            optional
//!       span.menu-text
//!   li.menu-item.submenu         header
//!     button.menu-btn …
//!     menu.menu                  nested items
//! ```

use crate::item::MenuItemSpec;
use ctxmenu_core::{Dom, DomResult};
use std::rc::Rc;

/// Class on every menu list, root and nested.
pub const MENU_CLASS: &str = "menu";
/// Class on every item.
pub const MENU_ITEM_CLASS: &str = "menu-item";
/// Extra class on items that open nested items.
pub const SUBMENU_CLASS: &str = "submenu";
/// Class on the item button.
pub const BUTTON_CLASS: &str = "menu-btn";
/// Class on the label span.
pub const TEXT_CLASS: &str = "menu-text";
/// Class on the root while the menu is visible.
pub const SHOW_CLASS: &str = "show-menu";

/// A selectable item in the rendered tree.
#[derive(Debug, Clone)]
pub struct RenderedLeaf<N> {
    /// The `li.menu-item` element
    pub node: N,
    /// Index path from the top level
    pub path: Vec<usize>,
    /// The item the element was built from
    pub item: Rc<MenuItemSpec>,
}

/// Result of [`render_menu`].
#[derive(Debug, Clone)]
pub struct RenderedMenu<N> {
    /// The root `menu` element, attached to the body
    pub root: N,
    /// Leaves in document order
    pub leaves: Vec<RenderedLeaf<N>>,
    /// Submenu header elements in document order
    pub submenus: Vec<N>,
}

/// Render `items` under a new root list and attach it to the body.
///
/// The root carries `id` but not [`SHOW_CLASS`], so it starts hidden.
///
/// # Errors
///
/// Returns an error if the DOM rejects any node operation.
pub fn render_menu<D: Dom>(
    dom: &D,
    id: &str,
    items: &[MenuItemSpec],
) -> DomResult<RenderedMenu<D::Node>> {
    let root = dom.create_element("menu")?;
    dom.add_class(&root, MENU_CLASS)?;
    dom.set_attribute(&root, "id", id)?;
    dom.append_child(&dom.body(), &root)?;

    let mut builder = TreeBuilder {
        dom,
        path: Vec::new(),
        leaves: Vec::new(),
        submenus: Vec::new(),
    };
    builder.fill_list(&root, items)?;

    Ok(RenderedMenu {
        root,
        leaves: builder.leaves,
        submenus: builder.submenus,
    })
}

struct TreeBuilder<'a, D: Dom> {
    dom: &'a D,
    path: Vec<usize>,
    leaves: Vec<RenderedLeaf<D::Node>>,
    submenus: Vec<D::Node>,
}

impl<D: Dom> TreeBuilder<'_, D> {
    fn fill_list(&mut self, list: &D::Node, items: &[MenuItemSpec]) -> DomResult<()> {
        for (i, item) in items.iter().enumerate() {
            self.path.push(i);
            let result = self.add_item(list, item);
            self.path.pop();
            result?;
        }
        Ok(())
    }

    fn add_item(&mut self, list: &D::Node, item: &MenuItemSpec) -> DomResult<()> {
        let dom = self.dom;
        let li = dom.create_element("li")?;
        dom.add_class(&li, MENU_ITEM_CLASS)?;
        if item.has_submenu() {
            dom.add_class(&li, SUBMENU_CLASS)?;
        }
        dom.append_child(list, &li)?;

        let button = dom.create_element("button")?;
        dom.set_attribute(&button, "type", "button")?;
        dom.add_class(&button, BUTTON_CLASS)?;
        dom.append_child(&li, &button)?;

        if let Some(icon_class) = item.icon_class() {
            let icon = dom.create_element("i")?;
            dom.set_attribute(&icon, "class", icon_class)?;
            dom.append_child(&button, &icon)?;
        }

        let text = dom.create_element("span")?;
        dom.add_class(&text, TEXT_CLASS)?;
        dom.append_text(&text, &item.label)?;
        dom.append_child(&button, &text)?;

        if item.has_submenu() {
            self.submenus.push(li.clone());
            let nested = dom.create_element("menu")?;
            dom.add_class(&nested, MENU_CLASS)?;
            dom.append_child(&li, &nested)?;
            self.fill_list(&nested, item.children())?;
        } else {
            self.leaves.push(RenderedLeaf {
                node: li,
                path: self.path.clone(),
                item: Rc::new(item.clone()),
            });
        }
        Ok(())
    }
}
