//! Context menu widget.
//!
//! Renders a menu tree into a [`Dom`](ctxmenu_core::Dom), opens it on
//! right-click or long-press over target elements, keeps it inside the
//! viewport and reports leaf selections.
//!
//! ```
//! use ctxmenu_core::{Document, Dom, DomEvent, EventDispatcher, ManualScheduler, PointerInfo};
//! use ctxmenu_widgets::{ContextMenuHandle, MenuItemSpec, WidgetConfig};
//! use std::rc::Rc;
//!
//! let doc = Rc::new(Document::new());
//! let row = doc.create_child(doc.body(), "div", &["row"]).unwrap();
//! let dispatcher = Rc::new(EventDispatcher::new(Rc::clone(&doc)));
//! let scheduler = Rc::new(ManualScheduler::new());
//!
//! let config = WidgetConfig::new()
//!     .item(MenuItemSpec::leaf("Copy"))
//!     .item(MenuItemSpec::submenu("More", vec![MenuItemSpec::leaf("Rename")]));
//! let menu = ContextMenuHandle::install(&dispatcher, scheduler, ".row", &config).unwrap();
//! menu.set_on_select(|selected| println!("chose {}", selected.item.label));
//!
//! dispatcher.dispatch(&DomEvent::ContextMenu {
//!     target: row,
//!     pointer: PointerInfo::at_page(40.0, 30.0),
//! });
//! assert!(menu.is_open());
//! ```

mod config;
mod context_menu;
mod error;
mod handle;
mod item;
pub mod placement;
pub mod render;

pub use config::{
    ConfigWarning, WidgetConfig, DEFAULT_EDGE_MARGIN, DEFAULT_MENU_ID_PREFIX,
    DEFAULT_TOUCH_DELAY_MS,
};
pub use context_menu::{ClickTarget, ContextMenu, MenuState, RunId};
pub use error::{ConfigError, WidgetError, WidgetResult};
pub use handle::{ContextMenuHandle, InstallOptions, MenuItemSelected};
pub use item::{count_items, count_leaves, item_at, MenuItemSpec};
pub use placement::place_menu;
pub use render::{render_menu, RenderedLeaf, RenderedMenu};

#[cfg(test)]
mod tests {
    use super::*;
    use ctxmenu_core::{Document, Dom};
    use proptest::prelude::*;

    fn arb_item() -> impl Strategy<Value = MenuItemSpec> {
        let leaf = "[A-Za-z]{1,8}".prop_map(MenuItemSpec::leaf);
        leaf.prop_recursive(4, 32, 4, |inner| {
            ("[A-Za-z]{1,8}", proptest::collection::vec(inner, 0..4))
                .prop_map(|(label, items)| MenuItemSpec::submenu(label, items))
        })
    }

    // ==========================================================================
    // TREE PROPERTIES
    // ==========================================================================

    proptest! {
        #[test]
        fn prop_submenu_tag_matches_children(items in proptest::collection::vec(arb_item(), 0..5)) {
            let doc = Document::new();
            let rendered = render_menu(&doc, "menu_1", &items).expect("render");
            prop_assert_eq!(rendered.leaves.len(), count_leaves(&items));

            for leaf in &rendered.leaves {
                prop_assert!(!doc.has_class(&leaf.node, render::SUBMENU_CLASS));
                prop_assert_eq!(item_at(&items, &leaf.path), Some(&*leaf.item));
                prop_assert!(leaf.item.is_leaf());
            }
            for header in &rendered.submenus {
                prop_assert!(doc.has_class(header, render::SUBMENU_CLASS));
            }
            let items_rendered = doc.query_selector_all(".menu-item").expect("query").len();
            prop_assert_eq!(items_rendered, count_items(&items));
        }

        #[test]
        fn prop_config_json_roundtrip(items in proptest::collection::vec(arb_item(), 0..4), delay in 0u32..2000) {
            let config = WidgetConfig::new().items(items).touch_delay(delay);
            let json = config.to_json().expect("serialize");
            prop_assert_eq!(WidgetConfig::from_json(&json).expect("parse"), config);
        }
    }
}
