//! [`Dom`] over the live browser document.

use ctxmenu_core::{Dom, DomError, DomResult, Point, Selector, Size};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, Window};

/// The page's document, addressed through `web_sys`.
#[derive(Debug, Clone)]
pub struct BrowserDom {
    window: Window,
    document: Document,
    body: Element,
}

impl BrowserDom {
    /// Bind to the current window's document.
    ///
    /// # Errors
    ///
    /// Returns an error outside a browsing context or before `<body>`
    /// exists.
    pub fn new() -> DomResult<Self> {
        let window = web_sys::window().ok_or_else(|| DomError::Host("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| DomError::Host("no document".into()))?;
        let body = document
            .body()
            .ok_or_else(|| DomError::Host("document has no body".into()))?
            .into();
        Ok(Self {
            window,
            document,
            body,
        })
    }

    /// The window.
    pub const fn window(&self) -> &Window {
        &self.window
    }

    /// The document.
    pub const fn document(&self) -> &Document {
        &self.document
    }

    fn html(node: &Element) -> DomResult<&HtmlElement> {
        node.dyn_ref::<HtmlElement>()
            .ok_or_else(|| DomError::Host(format!("<{}> is not an HTML element", node.tag_name())))
    }
}

pub(crate) fn host_error(err: &JsValue) -> DomError {
    DomError::Host(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

impl Dom for BrowserDom {
    type Node = Element;

    fn body(&self) -> Element {
        self.body.clone()
    }

    fn create_element(&self, tag: &str) -> DomResult<Element> {
        self.document
            .create_element(tag)
            .map_err(|e| host_error(&e))
    }

    fn append_text(&self, parent: &Element, text: &str) -> DomResult<()> {
        let node = self.document.create_text_node(text);
        parent
            .append_child(&node)
            .map(drop)
            .map_err(|e| host_error(&e))
    }

    fn append_child(&self, parent: &Element, child: &Element) -> DomResult<()> {
        parent
            .append_child(child)
            .map(drop)
            .map_err(|e| host_error(&e))
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) -> DomResult<()> {
        node.set_attribute(name, value).map_err(|e| host_error(&e))
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn add_class(&self, node: &Element, class: &str) -> DomResult<()> {
        node.class_list().add_1(class).map_err(|e| host_error(&e))
    }

    fn remove_class(&self, node: &Element, class: &str) -> DomResult<()> {
        node.class_list()
            .remove_1(class)
            .map_err(|e| host_error(&e))
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) -> DomResult<()> {
        Self::html(node)?
            .style()
            .set_property(property, value)
            .map_err(|e| host_error(&e))
    }

    fn query_selector_all(&self, selector: &str) -> DomResult<Vec<Element>> {
        let list = self.document.query_selector_all(selector).map_err(|e| {
            match Selector::parse(selector) {
                Err(source) => DomError::InvalidSelector {
                    selector: selector.to_string(),
                    source,
                },
                Ok(_) => host_error(&e),
            }
        })?;
        Ok((0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect())
    }

    fn offset_size(&self, node: &Element) -> Size {
        node.dyn_ref::<HtmlElement>().map_or(Size::ZERO, |el| {
            Size::new(el.offset_width() as f32, el.offset_height() as f32)
        })
    }

    fn viewport_size(&self) -> Size {
        let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
        Size::new(dim(self.window.inner_width()), dim(self.window.inner_height()))
    }

    fn scroll_offset(&self) -> Point {
        Point::new(
            self.window.scroll_x().unwrap_or(0.0) as f32,
            self.window.scroll_y().unwrap_or(0.0) as f32,
        )
    }
}
