//! Testing harness for ctxmenu widgets.
//!
//! Drives a headless [`Document`](ctxmenu_core::Document) through its
//! event dispatcher and a virtual clock, addressing elements by CSS
//! selector:
//!
//! ```
//! use ctxmenu_test::Harness;
//! use ctxmenu_widgets::{MenuItemSpec, WidgetConfig};
//!
//! let mut harness = Harness::new();
//! harness.add("div", &["file"]);
//! harness.install(".file", &WidgetConfig::new().item(MenuItemSpec::leaf("Copy")));
//!
//! harness.right_click(".file", 10.0, 10.0);
//! harness.assert_open();
//! harness.click_text("Copy");
//! harness.assert_closed().assert_selected(&["Copy"]);
//! ```

mod harness;

pub use harness::Harness;
