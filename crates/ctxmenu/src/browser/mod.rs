//! Browser runtime for ctxmenu.
//!
//! Bridges the widget to a live page: a [`Dom`](ctxmenu_core::Dom) over
//! `web_sys`, a `setTimeout` scheduler, and a shell that forwards native
//! events into an [`EventDispatcher`](ctxmenu_core::EventDispatcher).

// WASM-only modules
#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(target_arch = "wasm32")]
pub mod events;
#[cfg(target_arch = "wasm32")]
pub mod logger;
#[cfg(target_arch = "wasm32")]
pub mod scheduler;
#[cfg(target_arch = "wasm32")]
pub mod shell;
#[cfg(target_arch = "wasm32")]
pub mod widget;

// Cross-platform modules
pub mod platform;

#[cfg(target_arch = "wasm32")]
pub use dom::BrowserDom;
#[cfg(target_arch = "wasm32")]
pub use logger::{init_logging, ConsoleLogger};
pub use platform::is_ios_user_agent;
#[cfg(target_arch = "wasm32")]
pub use scheduler::WindowScheduler;
#[cfg(target_arch = "wasm32")]
pub use shell::BrowserShell;
#[cfg(target_arch = "wasm32")]
pub use widget::ContextMenuWidget;
