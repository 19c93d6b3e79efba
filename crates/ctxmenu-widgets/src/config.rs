//! Widget configuration.
//!
//! Mirrors the options object a page hands the widget:
//!
//! ```json
//! {
//!   "ctxElemId": "files",
//!   "targetClasses": ".file-row",
//!   "touchDelay": 500,
//!   "menu": [
//!     { "label": "Copy", "iconClass": "fa fa-copy" },
//!     { "label": "More", "menu": [{ "label": "Rename" }] }
//!   ]
//! }
//! ```
//!
//! Every field is optional. Unknown keys are ignored.

use crate::error::ConfigError;
use crate::item::MenuItemSpec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Long-press threshold in milliseconds.
pub const DEFAULT_TOUCH_DELAY_MS: u32 = 500;

/// Pixels added to the measured menu size before edge checks.
pub const DEFAULT_EDGE_MARGIN: f32 = 4.0;

/// Id prefix used when `ctxElemId` is blank.
pub const DEFAULT_MENU_ID_PREFIX: &str = "menu";

/// Options for one context menu instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetConfig {
    /// Prefix of the rendered menu's DOM id
    pub ctx_elem_id: String,
    /// Selector for target elements, used when no selector is given at
    /// install time
    pub target_classes: String,
    /// Top-level items
    pub menu: Vec<MenuItemSpec>,
    /// Long-press threshold in milliseconds
    pub touch_delay: u32,
    /// Margin added to the measured menu size
    pub edge_margin: f32,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            ctx_elem_id: String::new(),
            target_classes: String::new(),
            menu: Vec::new(),
            touch_delay: DEFAULT_TOUCH_DELAY_MS,
            edge_margin: DEFAULT_EDGE_MARGIN,
        }
    }
}

impl WidgetConfig {
    /// Create a config with defaults and no items.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not valid JSON or a field has the
    /// wrong type.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not valid YAML or a field has the
    /// wrong type.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Serialize to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Set the id prefix.
    #[must_use]
    pub fn ctx_elem_id(mut self, id: impl Into<String>) -> Self {
        self.ctx_elem_id = id.into();
        self
    }

    /// Set the fallback target selector.
    #[must_use]
    pub fn target_classes(mut self, selector: impl Into<String>) -> Self {
        self.target_classes = selector.into();
        self
    }

    /// Append a top-level item.
    #[must_use]
    pub fn item(mut self, item: MenuItemSpec) -> Self {
        self.menu.push(item);
        self
    }

    /// Replace all items.
    #[must_use]
    pub fn items(mut self, items: Vec<MenuItemSpec>) -> Self {
        self.menu = items;
        self
    }

    /// Set the long-press threshold.
    #[must_use]
    pub const fn touch_delay(mut self, ms: u32) -> Self {
        self.touch_delay = ms;
        self
    }

    /// Set the edge margin.
    #[must_use]
    pub const fn edge_margin(mut self, px: f32) -> Self {
        self.edge_margin = px;
        self
    }

    /// Id prefix for the rendered menu.
    #[must_use]
    pub fn menu_id_prefix(&self) -> &str {
        let id = self.ctx_elem_id.trim();
        if id.is_empty() {
            DEFAULT_MENU_ID_PREFIX
        } else {
            id
        }
    }

    /// Collect problems that would make the widget degrade silently.
    #[must_use]
    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        if self.menu.is_empty() {
            warnings.push(ConfigWarning::NoItems);
        }
        if !self.edge_margin.is_finite() || self.edge_margin < 0.0 {
            warnings.push(ConfigWarning::InvalidEdgeMargin(self.edge_margin));
        }
        let mut path = Vec::new();
        collect_item_warnings(&self.menu, &mut path, &mut warnings);
        warnings
    }
}

fn collect_item_warnings(
    items: &[MenuItemSpec],
    path: &mut Vec<usize>,
    out: &mut Vec<ConfigWarning>,
) {
    for (i, item) in items.iter().enumerate() {
        path.push(i);
        if item.label.trim().is_empty() {
            out.push(ConfigWarning::BlankLabel(path.clone()));
        }
        match &item.menu {
            Some(children) if children.is_empty() => {
                out.push(ConfigWarning::EmptySubmenu(path.clone()));
            }
            Some(children) => collect_item_warnings(children, path, out),
            None => {}
        }
        path.pop();
    }
}

/// A non-fatal configuration problem.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigWarning {
    /// The menu has no items
    NoItems,
    /// An item has an empty label
    BlankLabel(Vec<usize>),
    /// An item has an empty `menu` list and renders as a leaf
    EmptySubmenu(Vec<usize>),
    /// The edge margin is negative or not finite
    InvalidEdgeMargin(f32),
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoItems => write!(f, "menu has no items"),
            Self::BlankLabel(path) => write!(f, "item {path:?} has a blank label"),
            Self::EmptySubmenu(path) => {
                write!(f, "item {path:?} has an empty submenu and is treated as a leaf")
            }
            Self::InvalidEdgeMargin(m) => write!(f, "edge margin {m} is not a non-negative number"),
        }
    }
}
