//! Menu item tree.
//!
//! A [`MenuItemSpec`] is either a leaf (selectable, fires the callback)
//! or a submenu header whose `menu` holds nested items. The JSON/YAML
//! shape uses camelCase keys: `label`, `iconClass`, `menu`.

use serde::{Deserialize, Serialize};

/// One entry in a context menu.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemSpec {
    /// Visible text
    #[serde(default)]
    pub label: String,
    /// CSS class list applied to an icon element before the label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_class: Option<String>,
    /// Nested items; a non-empty list makes this a submenu header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu: Option<Vec<MenuItemSpec>>,
}

impl MenuItemSpec {
    /// Create a leaf item.
    #[must_use]
    pub fn leaf(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            icon_class: None,
            menu: None,
        }
    }

    /// Create a submenu header.
    #[must_use]
    pub fn submenu(label: impl Into<String>, items: Vec<Self>) -> Self {
        Self {
            label: label.into(),
            icon_class: None,
            menu: Some(items),
        }
    }

    /// Set the icon class list.
    #[must_use]
    pub fn icon(mut self, class: impl Into<String>) -> Self {
        self.icon_class = Some(class.into());
        self
    }

    /// Whether this item opens nested items. An empty `menu` list counts
    /// as a leaf.
    #[must_use]
    pub fn has_submenu(&self) -> bool {
        self.menu.as_ref().is_some_and(|items| !items.is_empty())
    }

    /// Whether selecting this item fires the callback.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        !self.has_submenu()
    }

    /// Nested items, empty for leaves.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        self.menu.as_deref().unwrap_or(&[])
    }

    /// Icon class, ignoring blank values.
    #[must_use]
    pub fn icon_class(&self) -> Option<&str> {
        self.icon_class
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// Nesting depth: 1 for a leaf.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.children().iter().map(Self::depth).max().unwrap_or(0)
    }
}

/// Count every item in a tree, headers included.
#[must_use]
pub fn count_items(items: &[MenuItemSpec]) -> usize {
    items.iter().map(|i| 1 + count_items(i.children())).sum()
}

/// Count selectable leaves in a tree.
#[must_use]
pub fn count_leaves(items: &[MenuItemSpec]) -> usize {
    items
        .iter()
        .map(|i| {
            if i.has_submenu() {
                count_leaves(i.children())
            } else {
                1
            }
        })
        .sum()
}

/// Look up an item by its index path from the top level.
#[must_use]
pub fn item_at<'a>(items: &'a [MenuItemSpec], path: &[usize]) -> Option<&'a MenuItemSpec> {
    let (first, rest) = path.split_first()?;
    let item = items.get(*first)?;
    if rest.is_empty() {
        Some(item)
    } else {
        item_at(item.children(), rest)
    }
}
