//! Core types for the ctxmenu widget.
//!
//! This crate provides the foundation the context menu is built on:
//! - Geometric primitives: [`Point`], [`Size`], [`Rect`]
//! - Input events: [`DomEvent`], [`PointerInfo`]
//! - The [`Dom`] seam and the headless [`Document`]
//! - CSS selectors: [`Selector`]
//! - Event routing: [`EventDispatcher`]
//! - Timers: [`Scheduler`], [`ManualScheduler`]

mod dispatcher;
mod document;
mod dom;
mod error;
mod event;
mod geometry;
mod scheduler;
pub mod selector;

pub use dispatcher::{
    DispatchOutcome, EventContext, EventDispatcher, ListenerTarget, Phase, SubscriptionId,
};
pub use document::{
    Document, NodeId, DEFAULT_BLOCK_WIDTH, DEFAULT_LIST_PADDING, DEFAULT_ROW_HEIGHT,
};
pub use dom::Dom;
pub use error::{DomError, DomResult, SelectorError};
pub use event::{DomEvent, EventKind, PointerInfo};
pub use geometry::{Point, Rect, Size};
pub use scheduler::{ManualScheduler, Scheduler, TimerId};
pub use selector::Selector;
