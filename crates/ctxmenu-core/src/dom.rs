//! The DOM seam widgets render into.
//!
//! Widgets never touch a browser API directly. They build and query
//! elements through [`Dom`], which is implemented by the headless
//! [`Document`](crate::Document) for native use and tests, and by
//! `web_sys` in the browser.

use crate::error::DomResult;
use crate::geometry::{Point, Size};
use std::fmt::Debug;

/// Element tree operations used by widgets.
///
/// Methods take `&self`: the browser DOM is a shared, internally mutable
/// object and the headless document mirrors that.
pub trait Dom {
    /// Element handle.
    type Node: Clone + PartialEq + Debug + 'static;

    /// The `<body>` element.
    fn body(&self) -> Self::Node;

    /// Create a detached element.
    fn create_element(&self, tag: &str) -> DomResult<Self::Node>;

    /// Append a text node to `parent`.
    fn append_text(&self, parent: &Self::Node, text: &str) -> DomResult<()>;

    /// Append `child` as the last child of `parent`, moving it if attached.
    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> DomResult<()>;

    /// Set an attribute.
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str) -> DomResult<()>;

    /// Read an attribute.
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Add a class to the element's class list.
    fn add_class(&self, node: &Self::Node, class: &str) -> DomResult<()>;

    /// Remove a class from the element's class list.
    fn remove_class(&self, node: &Self::Node, class: &str) -> DomResult<()>;

    /// Whether the element's class list contains `class`.
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    /// Parent element, `None` for detached elements and the root.
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Set an inline style property.
    fn set_style(&self, node: &Self::Node, property: &str, value: &str) -> DomResult<()>;

    /// All elements matching a CSS selector, in document order.
    fn query_selector_all(&self, selector: &str) -> DomResult<Vec<Self::Node>>;

    /// Rendered size of an element (`offsetWidth`/`offsetHeight`).
    fn offset_size(&self, node: &Self::Node) -> Size;

    /// Viewport size (`innerWidth`/`innerHeight`).
    fn viewport_size(&self) -> Size;

    /// Document scroll offset.
    fn scroll_offset(&self) -> Point;

    /// Nearest inclusive ancestor carrying `class`.
    fn closest_with_class(&self, node: &Self::Node, class: &str) -> Option<Self::Node> {
        let mut current = Some(node.clone());
        while let Some(n) = current {
            if self.has_class(&n, class) {
                return Some(n);
            }
            current = self.parent(&n);
        }
        None
    }

    /// `node` followed by each of its ancestors up to the root.
    fn ancestors(&self, node: &Self::Node) -> Vec<Self::Node> {
        let mut path = vec![node.clone()];
        let mut current = self.parent(node);
        while let Some(n) = current {
            current = self.parent(&n);
            path.push(n);
        }
        path
    }

    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool {
        let mut current = Some(node.clone());
        while let Some(n) = current {
            if &n == ancestor {
                return true;
            }
            current = self.parent(&n);
        }
        false
    }
}
