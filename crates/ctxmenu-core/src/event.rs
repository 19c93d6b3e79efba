//! DOM input events routed to widgets.
//!
//! Events are generic over the node handle of the [`Dom`](crate::Dom)
//! they were raised in, so the same widget code sees `NodeId`s in the
//! headless document and `web_sys::Element`s in the browser.

use crate::geometry::{Point, Size};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pointer coordinates carried by an input event.
///
/// Mirrors what a browser event exposes: page coordinates, client
/// coordinates and, for touch events, the page position of each touch.
/// A zero coordinate pair means "not reported".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerInfo {
    /// Page-relative position (`pageX`/`pageY`)
    pub page: Point,
    /// Viewport-relative position (`clientX`/`clientY`)
    pub client: Point,
    /// Page positions of active touches, first touch first
    pub touches: Vec<Point>,
}

impl PointerInfo {
    /// Pointer info for a mouse event reporting page coordinates.
    #[must_use]
    pub fn at_page(x: f32, y: f32) -> Self {
        Self {
            page: Point::new(x, y),
            ..Self::default()
        }
    }

    /// Pointer info for an event that only reports client coordinates.
    #[must_use]
    pub fn at_client(x: f32, y: f32) -> Self {
        Self {
            client: Point::new(x, y),
            ..Self::default()
        }
    }

    /// Pointer info for a touch event.
    #[must_use]
    pub fn touch(x: f32, y: f32) -> Self {
        Self {
            touches: vec![Point::new(x, y)],
            ..Self::default()
        }
    }

    /// Resolve the page-relative position of this pointer.
    ///
    /// Page coordinates win; otherwise client coordinates are shifted by
    /// the document scroll offset; otherwise the first touch is used.
    #[must_use]
    pub fn resolve(&self, scroll: Point) -> Point {
        if !self.page.is_origin() {
            self.page
        } else if !self.client.is_origin() {
            self.client + scroll
        } else {
            self.touches.first().copied().unwrap_or(Point::ORIGIN)
        }
    }
}

/// Kind of a [`DomEvent`], used to key listener subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Secondary-button / context menu request
    ContextMenu,
    /// Touch started
    TouchStart,
    /// Touch ended
    TouchEnd,
    /// Primary click
    Click,
    /// Window resized
    Resize,
}

impl EventKind {
    /// The DOM event type name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ContextMenu => "contextmenu",
            Self::TouchStart => "touchstart",
            Self::TouchEnd => "touchend",
            Self::Click => "click",
            Self::Resize => "resize",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input event types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DomEvent<N> {
    /// Context menu requested on an element
    ContextMenu {
        /// Element the event was raised on
        target: N,
        /// Pointer position
        pointer: PointerInfo,
    },
    /// Touch started on an element
    TouchStart {
        /// Element the event was raised on
        target: N,
        /// Touch positions
        pointer: PointerInfo,
    },
    /// Touch ended on an element
    TouchEnd {
        /// Element the event was raised on
        target: N,
    },
    /// Click on an element
    Click {
        /// Element the event was raised on
        target: N,
        /// Pointer position
        pointer: PointerInfo,
    },
    /// Window resized
    Resize {
        /// New viewport size
        viewport: Size,
    },
}

impl<N> DomEvent<N> {
    /// The kind of this event.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::ContextMenu { .. } => EventKind::ContextMenu,
            Self::TouchStart { .. } => EventKind::TouchStart,
            Self::TouchEnd { .. } => EventKind::TouchEnd,
            Self::Click { .. } => EventKind::Click,
            Self::Resize { .. } => EventKind::Resize,
        }
    }

    /// The element the event targets, if it targets one.
    #[must_use]
    pub const fn target(&self) -> Option<&N> {
        match self {
            Self::ContextMenu { target, .. }
            | Self::TouchStart { target, .. }
            | Self::TouchEnd { target }
            | Self::Click { target, .. } => Some(target),
            Self::Resize { .. } => None,
        }
    }

    /// Pointer data, for events that carry it.
    #[must_use]
    pub const fn pointer(&self) -> Option<&PointerInfo> {
        match self {
            Self::ContextMenu { pointer, .. }
            | Self::TouchStart { pointer, .. }
            | Self::Click { pointer, .. } => Some(pointer),
            Self::TouchEnd { .. } | Self::Resize { .. } => None,
        }
    }
}
