//! Headless in-memory document.
//!
//! An arena of nodes addressed by [`NodeId`], with just enough of the DOM
//! to build menus, evaluate selectors and approximate rendered sizes.

use crate::dom::Dom;
use crate::error::{DomError, DomResult};
use crate::geometry::{Point, Size};
use crate::selector::{ElementTree, Selector};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;

/// Width given to block elements without an explicit layout size.
pub const DEFAULT_BLOCK_WIDTH: f32 = 200.0;
/// Height of one list row without an explicit layout size.
pub const DEFAULT_ROW_HEIGHT: f32 = 32.0;
/// Vertical padding of list containers without an explicit layout size.
pub const DEFAULT_LIST_PADDING: f32 = 8.0;

/// Handle of a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Arena index of this node.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
enum NodeKind {
    Element {
        tag: String,
        attributes: BTreeMap<String, String>,
        classes: Vec<String>,
        style: BTreeMap<String, String>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
    layout_size: Option<Size>,
}

#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
    body: NodeId,
}

impl Tree {
    fn new() -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            body: NodeId(0),
        };
        let root = tree.push(NodeKind::element("html"));
        let body = tree.push(NodeKind::element("body"));
        tree.nodes[body.0].parent = Some(root);
        tree.nodes[root.0].children.push(body);
        tree.root = root;
        tree.body = body;
        tree
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            kind,
            layout_size: None,
        });
        id
    }

    fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.nodes
            .get(id.0)
            .ok_or_else(|| DomError::UnknownNode(id.to_string()))
    }

    fn node_mut(&mut self, id: NodeId) -> DomResult<&mut Node> {
        self.nodes
            .get_mut(id.0)
            .ok_or_else(|| DomError::UnknownNode(id.to_string()))
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id.0).and_then(|n| n.parent);
        }
        false
    }

    /// Document-order traversal from the root.
    fn walk(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(node) = self.nodes.get(id.0) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        order
    }

    fn text_content(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.nodes.get(id.0) else {
            return;
        };
        match node.kind {
            NodeKind::Text(ref text) => out.push_str(text),
            NodeKind::Element { .. } => {
                for child in &node.children {
                    self.text_content(*child, out);
                }
            }
        }
    }

    fn estimate_size(&self, id: NodeId) -> Size {
        let Some(node) = self.nodes.get(id.0) else {
            return Size::ZERO;
        };
        if let Some(size) = node.layout_size {
            return size;
        }
        match node.kind {
            NodeKind::Element { ref tag, .. } if tag == "menu" || tag == "ul" => {
                let rows: f32 = node
                    .children
                    .iter()
                    .map(|child| self.estimate_size(*child).height)
                    .sum();
                Size::new(DEFAULT_BLOCK_WIDTH, rows + DEFAULT_LIST_PADDING * 2.0)
            }
            NodeKind::Element { ref tag, .. } if tag == "li" => {
                Size::new(DEFAULT_BLOCK_WIDTH, DEFAULT_ROW_HEIGHT)
            }
            _ => Size::ZERO,
        }
    }
}

impl NodeKind {
    fn element(tag: &str) -> Self {
        Self::Element {
            tag: tag.to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            classes: Vec::new(),
            style: BTreeMap::new(),
        }
    }
}

impl ElementTree for Tree {
    type Node = NodeId;

    fn tag_name(&self, node: &NodeId) -> Option<String> {
        match self.nodes.get(node.0)?.kind {
            NodeKind::Element { ref tag, .. } => Some(tag.clone()),
            NodeKind::Text(_) => None,
        }
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        match self.nodes.get(node.0)?.kind {
            NodeKind::Element {
                ref attributes,
                ref classes,
                ..
            } => {
                if name == "class" {
                    (!classes.is_empty()).then(|| classes.join(" "))
                } else {
                    attributes.get(name).cloned()
                }
            }
            NodeKind::Text(_) => None,
        }
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        matches!(
            self.nodes.get(node.0).map(|n| &n.kind),
            Some(NodeKind::Element { classes, .. }) if classes.iter().any(|c| c == class)
        )
    }

    fn parent_element(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes.get(node.0)?.parent
    }
}

/// Headless document with a settable viewport.
#[derive(Debug)]
pub struct Document {
    tree: RefCell<Tree>,
    viewport: Cell<Size>,
    scroll: Cell<Point>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty `<html><body></body></html>` document with a
    /// 1280x720 viewport.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: RefCell::new(Tree::new()),
            viewport: Cell::new(Size::new(1280.0, 720.0)),
            scroll: Cell::new(Point::ORIGIN),
        }
    }

    /// Set the viewport size.
    #[must_use]
    pub fn with_viewport(self, width: f32, height: f32) -> Self {
        self.viewport.set(Size::new(width, height));
        self
    }

    /// Change the viewport size.
    pub fn set_viewport(&self, size: Size) {
        self.viewport.set(size);
    }

    /// Change the document scroll offset.
    pub fn set_scroll(&self, offset: Point) {
        self.scroll.set(offset);
    }

    /// Pin the rendered size of an element, overriding the estimate.
    pub fn set_layout_size(&self, node: NodeId, size: Size) -> DomResult<()> {
        self.tree.borrow_mut().node_mut(node)?.layout_size = Some(size);
        Ok(())
    }

    /// Create an element with classes and append it to `parent`.
    pub fn create_child(&self, parent: NodeId, tag: &str, classes: &[&str]) -> DomResult<NodeId> {
        let node = self.create_element(tag)?;
        for class in classes {
            self.add_class(&node, class)?;
        }
        self.append_child(&parent, &node)?;
        Ok(node)
    }

    /// Lower-case tag name, `None` for text nodes.
    #[must_use]
    pub fn tag_name(&self, node: NodeId) -> Option<String> {
        self.tree.borrow().tag_name(&node)
    }

    /// Child elements and text nodes, in order.
    #[must_use]
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.tree
            .borrow()
            .nodes
            .get(node.0)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// Child elements carrying `class`, in order.
    #[must_use]
    pub fn children_with_class(&self, node: NodeId, class: &str) -> Vec<NodeId> {
        let tree = self.tree.borrow();
        self.children(node)
            .into_iter()
            .filter(|child| tree.has_class(child, class))
            .collect()
    }

    /// Concatenated text of the node and its descendants.
    #[must_use]
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.tree.borrow().text_content(node, &mut out);
        out
    }

    /// The element's classes, in insertion order.
    #[must_use]
    pub fn classes(&self, node: NodeId) -> Vec<String> {
        match self.tree.borrow().nodes.get(node.0).map(|n| &n.kind) {
            Some(NodeKind::Element { classes, .. }) => classes.clone(),
            _ => Vec::new(),
        }
    }

    /// Inline style property.
    #[must_use]
    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        match self.tree.borrow().nodes.get(node.0).map(|n| &n.kind) {
            Some(NodeKind::Element { style, .. }) => style.get(property).cloned(),
            _ => None,
        }
    }

    /// Element with the given id attribute.
    #[must_use]
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let tree = self.tree.borrow();
        tree.walk()
            .into_iter()
            .find(|node| tree.attribute(node, "id").as_deref() == Some(id))
    }

    /// Number of nodes ever created, attached or not.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.tree.borrow().nodes.len()
    }

    fn with_element_mut<R>(
        &self,
        node: NodeId,
        f: impl FnOnce(&mut Vec<String>, &mut BTreeMap<String, String>, &mut BTreeMap<String, String>) -> R,
    ) -> DomResult<R> {
        let mut tree = self.tree.borrow_mut();
        match tree.node_mut(node)?.kind {
            NodeKind::Element {
                ref mut classes,
                ref mut attributes,
                ref mut style,
                ..
            } => Ok(f(classes, attributes, style)),
            NodeKind::Text(_) => Err(DomError::Host(format!("{node} is a text node"))),
        }
    }
}

impl Dom for Document {
    type Node = NodeId;

    fn body(&self) -> NodeId {
        self.tree.borrow().body
    }

    fn create_element(&self, tag: &str) -> DomResult<NodeId> {
        if tag.is_empty() {
            return Err(DomError::Host("empty tag name".to_string()));
        }
        Ok(self.tree.borrow_mut().push(NodeKind::element(tag)))
    }

    fn append_text(&self, parent: &NodeId, text: &str) -> DomResult<()> {
        let mut tree = tree_checked(&self.tree, *parent)?;
        let id = tree.push(NodeKind::Text(text.to_string()));
        tree.nodes[id.0].parent = Some(*parent);
        tree.nodes[parent.0].children.push(id);
        Ok(())
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> DomResult<()> {
        let mut tree = tree_checked(&self.tree, *parent)?;
        tree.node(*child)?;
        if tree.is_inclusive_ancestor(*child, *parent) {
            return Err(DomError::Host(format!(
                "cannot append {child} inside itself"
            )));
        }
        if let Some(old) = tree.nodes[child.0].parent.take() {
            tree.nodes[old.0].children.retain(|c| c != child);
        }
        tree.nodes[child.0].parent = Some(*parent);
        tree.nodes[parent.0].children.push(*child);
        Ok(())
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) -> DomResult<()> {
        self.with_element_mut(*node, |classes, attributes, _| {
            if name == "class" {
                *classes = value.split_whitespace().map(str::to_string).collect();
            } else {
                attributes.insert(name.to_string(), value.to_string());
            }
        })
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.tree.borrow().attribute(node, name)
    }

    fn add_class(&self, node: &NodeId, class: &str) -> DomResult<()> {
        self.with_element_mut(*node, |classes, _, _| {
            if !classes.iter().any(|c| c == class) {
                classes.push(class.to_string());
            }
        })
    }

    fn remove_class(&self, node: &NodeId, class: &str) -> DomResult<()> {
        self.with_element_mut(*node, |classes, _, _| classes.retain(|c| c != class))
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.tree.borrow().has_class(node, class)
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.tree.borrow().parent_element(node)
    }

    fn set_style(&self, node: &NodeId, property: &str, value: &str) -> DomResult<()> {
        self.with_element_mut(*node, |_, _, style| {
            style.insert(property.to_string(), value.to_string());
        })
    }

    fn query_selector_all(&self, selector: &str) -> DomResult<Vec<NodeId>> {
        let parsed = Selector::parse(selector).map_err(|source| DomError::InvalidSelector {
            selector: selector.to_string(),
            source,
        })?;
        let tree = self.tree.borrow();
        Ok(tree
            .walk()
            .into_iter()
            .filter(|node| parsed.matches(&*tree, node))
            .collect())
    }

    fn offset_size(&self, node: &NodeId) -> Size {
        self.tree.borrow().estimate_size(*node)
    }

    fn viewport_size(&self) -> Size {
        self.viewport.get()
    }

    fn scroll_offset(&self) -> Point {
        self.scroll.get()
    }
}

/// Borrow the tree mutably after checking `node` exists.
fn tree_checked(tree: &RefCell<Tree>, node: NodeId) -> DomResult<std::cell::RefMut<'_, Tree>> {
    let tree = tree.borrow_mut();
    tree.node(node)?;
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Construction Tests
    // =========================================================================

    #[test]
    fn test_new_document_has_body() {
        let doc = Document::new();
        let body = doc.body();
        assert_eq!(doc.tag_name(body).as_deref(), Some("body"));
        assert_eq!(doc.tag_name(doc.parent(&body).unwrap()).as_deref(), Some("html"));
        assert_eq!(doc.viewport_size(), Size::new(1280.0, 720.0));
    }

    #[test]
    fn test_create_element_detached() {
        let doc = Document::new();
        let li = doc.create_element("LI").unwrap();
        assert_eq!(doc.tag_name(li).as_deref(), Some("li"));
        assert!(doc.parent(&li).is_none());
    }

    #[test]
    fn test_create_element_empty_tag() {
        let doc = Document::new();
        assert!(matches!(doc.create_element(""), Err(DomError::Host(_))));
    }

    #[test]
    fn test_append_moves_node() {
        let doc = Document::new();
        let body = doc.body();
        let a = doc.create_child(body, "div", &[]).unwrap();
        let b = doc.create_child(body, "div", &[]).unwrap();
        let item = doc.create_child(a, "span", &[]).unwrap();

        doc.append_child(&b, &item).unwrap();
        assert_eq!(doc.parent(&item), Some(b));
        assert!(doc.children(a).is_empty());
        assert_eq!(doc.children(b), vec![item]);
    }

    #[test]
    fn test_append_into_self_rejected() {
        let doc = Document::new();
        let body = doc.body();
        let outer = doc.create_child(body, "div", &[]).unwrap();
        let inner = doc.create_child(outer, "div", &[]).unwrap();
        assert!(doc.append_child(&inner, &outer).is_err());
        assert!(doc.append_child(&outer, &outer).is_err());
    }

    #[test]
    fn test_unknown_node() {
        let doc = Document::new();
        let stray = NodeId(doc.node_count() + 100);
        assert_eq!(
            doc.add_class(&stray, "x"),
            Err(DomError::UnknownNode(stray.to_string()))
        );
    }

    // =========================================================================
    // Attribute & Class Tests
    // =========================================================================

    #[test]
    fn test_classes_deduplicated() {
        let doc = Document::new();
        let el = doc.create_element("li").unwrap();
        doc.add_class(&el, "menu-item").unwrap();
        doc.add_class(&el, "menu-item").unwrap();
        doc.add_class(&el, "submenu").unwrap();
        assert_eq!(doc.classes(el), vec!["menu-item", "submenu"]);
        assert_eq!(doc.attribute(&el, "class").as_deref(), Some("menu-item submenu"));

        doc.remove_class(&el, "submenu").unwrap();
        assert!(!doc.has_class(&el, "submenu"));
        assert!(doc.has_class(&el, "menu-item"));
    }

    #[test]
    fn test_class_attribute_replaces_list() {
        let doc = Document::new();
        let el = doc.create_element("i").unwrap();
        doc.add_class(&el, "old").unwrap();
        doc.set_attribute(&el, "class", "fa  fa-copy").unwrap();
        assert_eq!(doc.classes(el), vec!["fa", "fa-copy"]);
    }

    #[test]
    fn test_attributes_and_style() {
        let doc = Document::new();
        let el = doc.create_element("menu").unwrap();
        doc.set_attribute(&el, "id", "menu_1").unwrap();
        doc.set_style(&el, "left", "10px").unwrap();
        assert_eq!(doc.attribute(&el, "id").as_deref(), Some("menu_1"));
        assert_eq!(doc.style(el, "left").as_deref(), Some("10px"));
        assert!(doc.attribute(&el, "missing").is_none());
    }

    #[test]
    fn test_text_node_rejects_attributes() {
        let doc = Document::new();
        let span = doc.create_child(doc.body(), "span", &[]).unwrap();
        doc.append_text(&span, "Copy").unwrap();
        let text = doc.children(span)[0];
        assert!(doc.tag_name(text).is_none());
        assert!(doc.set_attribute(&text, "id", "x").is_err());
        assert_eq!(doc.text_content(span), "Copy");
    }

    // =========================================================================
    // Query Tests
    // =========================================================================

    #[test]
    fn test_query_selector_all_document_order() {
        let doc = Document::new();
        let body = doc.body();
        let list = doc.create_child(body, "ul", &["tasks"]).unwrap();
        let first = doc.create_child(list, "li", &["task"]).unwrap();
        let second = doc.create_child(list, "li", &["task"]).unwrap();
        let _other = doc.create_child(body, "li", &["other"]).unwrap();

        assert_eq!(doc.query_selector_all(".task").unwrap(), vec![first, second]);
        assert_eq!(doc.query_selector_all(".tasks > li").unwrap(), vec![first, second]);
        assert!(doc.query_selector_all(".none").unwrap().is_empty());
    }

    #[test]
    fn test_query_detached_not_found() {
        let doc = Document::new();
        let el = doc.create_element("li").unwrap();
        doc.add_class(&el, "task").unwrap();
        assert!(doc.query_selector_all(".task").unwrap().is_empty());
    }

    #[test]
    fn test_query_invalid_selector() {
        let doc = Document::new();
        assert!(matches!(
            doc.query_selector_all(""),
            Err(DomError::InvalidSelector { .. })
        ));
    }

    #[test]
    fn test_element_by_id() {
        let doc = Document::new();
        let el = doc.create_child(doc.body(), "div", &[]).unwrap();
        doc.set_attribute(&el, "id", "target").unwrap();
        assert_eq!(doc.element_by_id("target"), Some(el));
        assert_eq!(doc.element_by_id("nope"), None);
    }

    // =========================================================================
    // Tree Helper Tests
    // =========================================================================

    #[test]
    fn test_closest_and_contains() {
        let doc = Document::new();
        let li = doc.create_child(doc.body(), "li", &["menu-item"]).unwrap();
        let button = doc.create_child(li, "button", &[]).unwrap();
        let span = doc.create_child(button, "span", &[]).unwrap();

        assert_eq!(doc.closest_with_class(&span, "menu-item"), Some(li));
        assert_eq!(doc.closest_with_class(&li, "menu-item"), Some(li));
        assert_eq!(doc.closest_with_class(&span, "nope"), None);
        assert!(doc.contains(&li, &span));
        assert!(!doc.contains(&span, &li));
    }

    #[test]
    fn test_ancestors_path() {
        let doc = Document::new();
        let body = doc.body();
        let div = doc.create_child(body, "div", &[]).unwrap();
        let path = doc.ancestors(&div);
        assert_eq!(path[0], div);
        assert_eq!(path[1], body);
        assert_eq!(path.len(), 3);
    }

    // =========================================================================
    // Layout Tests
    // =========================================================================

    #[test]
    fn test_offset_size_estimates_lists() {
        let doc = Document::new();
        let menu = doc.create_child(doc.body(), "menu", &["menu"]).unwrap();
        doc.create_child(menu, "li", &[]).unwrap();
        doc.create_child(menu, "li", &[]).unwrap();
        assert_eq!(
            doc.offset_size(&menu),
            Size::new(DEFAULT_BLOCK_WIDTH, 2.0 * DEFAULT_ROW_HEIGHT + 2.0 * DEFAULT_LIST_PADDING)
        );
        assert_eq!(doc.offset_size(&doc.body()), Size::ZERO);
    }

    #[test]
    fn test_offset_size_pinned() {
        let doc = Document::new();
        let menu = doc.create_child(doc.body(), "menu", &[]).unwrap();
        doc.set_layout_size(menu, Size::new(150.0, 90.0)).unwrap();
        assert_eq!(doc.offset_size(&menu), Size::new(150.0, 90.0));
    }

    #[test]
    fn test_viewport_and_scroll() {
        let doc = Document::new().with_viewport(800.0, 600.0);
        assert_eq!(doc.viewport_size(), Size::new(800.0, 600.0));
        doc.set_scroll(Point::new(0.0, 120.0));
        assert_eq!(doc.scroll_offset(), Point::new(0.0, 120.0));
        doc.set_viewport(Size::new(320.0, 480.0));
        assert_eq!(doc.viewport_size(), Size::new(320.0, 480.0));
    }
}
