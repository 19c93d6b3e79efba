//! ctxmenu: custom context menus for web pages.
//!
//! A menu opens on right-click, or on a long press on touch screens,
//! over any element matching a selector. Items may nest into submenus;
//! choosing a leaf closes the menu and calls back with the item.
//!
//! # Browser Usage (WASM)
//!
//! ```javascript
//! import init, { ContextMenuWidget } from './ctxmenu.js';
//!
//! await init();
//! const menu = new ContextMenuWidget('.file-row', JSON.stringify({
//!     ctxElemId: 'files',
//!     menu: [
//!         { label: 'Copy', iconClass: 'fa fa-copy' },
//!         { label: 'More', menu: [{ label: 'Rename' }] },
//!     ],
//! }));
//! menu.onClick(function (item, path) { console.log(this, item.label, path); });
//! ```
//!
//! # Native Usage
//!
//! The same widget runs against the headless [`Document`], which is how
//! it is tested:
//!
//! ```
//! use ctxmenu::{ContextMenuHandle, Document, EventDispatcher, ManualScheduler, WidgetConfig};
//! use std::rc::Rc;
//!
//! let doc = Rc::new(Document::new());
//! let dispatcher = Rc::new(EventDispatcher::new(Rc::clone(&doc)));
//! let config = WidgetConfig::from_yaml("menu:\n  - label: Copy\n").unwrap();
//! let menu = ContextMenuHandle::install(&dispatcher, Rc::new(ManualScheduler::new()), ".row", &config)
//!     .unwrap();
//! assert!(!menu.is_open());
//! ```

#![allow(clippy::doc_markdown, clippy::cast_lossless)]

pub use ctxmenu_core::*;
pub use ctxmenu_widgets as widgets;
pub use ctxmenu_widgets::{
    ClickTarget, ConfigError, ConfigWarning, ContextMenu, ContextMenuHandle, InstallOptions,
    MenuItemSelected, MenuItemSpec, MenuState, RunId, WidgetConfig, WidgetError, WidgetResult,
};

pub mod browser;

#[cfg(target_arch = "wasm32")]
pub use browser::{BrowserDom, BrowserShell, ContextMenuWidget, WindowScheduler};
pub use browser::is_ios_user_agent;
