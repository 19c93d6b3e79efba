//! Browser event conversion - native events to [`DomEvent`]s.

use super::dom::BrowserDom;
use ctxmenu_core::{Dom, DomEvent, EventKind, Point, PointerInfo};
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, MouseEvent, Node, TouchEvent};

/// Convert a native event to a [`DomEvent`] of `kind`.
///
/// Returns `None` when a targeted event has no element target.
pub fn to_dom_event(dom: &BrowserDom, event: &Event, kind: EventKind) -> Option<DomEvent<Element>> {
    match kind {
        EventKind::ContextMenu => Some(DomEvent::ContextMenu {
            target: target_element(event)?,
            pointer: mouse_pointer(event),
        }),
        EventKind::Click => Some(DomEvent::Click {
            target: target_element(event)?,
            pointer: mouse_pointer(event),
        }),
        EventKind::TouchStart => Some(DomEvent::TouchStart {
            target: target_element(event)?,
            pointer: touch_pointer(event),
        }),
        EventKind::TouchEnd => Some(DomEvent::TouchEnd {
            target: target_element(event)?,
        }),
        EventKind::Resize => Some(DomEvent::Resize {
            viewport: dom.viewport_size(),
        }),
    }
}

/// The element an event was raised on. Text node targets resolve to
/// their parent element.
pub fn target_element(event: &Event) -> Option<Element> {
    let target = event.target()?;
    match target.dyn_into::<Element>() {
        Ok(element) => Some(element),
        Err(other) => other.dyn_into::<Node>().ok()?.parent_element(),
    }
}

/// Page and client coordinates of a mouse event.
pub fn mouse_pointer(event: &Event) -> PointerInfo {
    event
        .dyn_ref::<MouseEvent>()
        .map(|e| PointerInfo {
            page: Point::new(e.page_x() as f32, e.page_y() as f32),
            client: Point::new(e.client_x() as f32, e.client_y() as f32),
            touches: Vec::new(),
        })
        .unwrap_or_default()
}

/// Page coordinates of every active touch.
pub fn touch_pointer(event: &Event) -> PointerInfo {
    let Some(touch_event) = event.dyn_ref::<TouchEvent>() else {
        return mouse_pointer(event);
    };
    let list = touch_event.touches();
    let touches = (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|t| Point::new(t.page_x() as f32, t.page_y() as f32))
        .collect();
    PointerInfo {
        touches,
        ..PointerInfo::default()
    }
}
