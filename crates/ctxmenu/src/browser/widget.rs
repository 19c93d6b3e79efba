//! WASM export: a context menu bound to a selector.

use super::dom::BrowserDom;
use super::logger::{init_logging, parse_level};
use super::scheduler::WindowScheduler;
use super::shell::BrowserShell;
use ctxmenu_widgets::{ContextMenuHandle, MenuItemSpec, WidgetConfig};
use log::LevelFilter;
use std::fmt::Display;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

fn js_error(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn item_to_js(item: &MenuItemSpec) -> Option<JsValue> {
    let json = match serde_json::to_string(item) {
        Ok(json) => json,
        Err(err) => {
            log::warn!("failed to serialize menu item {:?}: {err}", item.label);
            return None;
        }
    };
    match js_sys::JSON::parse(&json) {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("failed to convert menu item {:?}: {err:?}", item.label);
            None
        }
    }
}

fn path_to_js(path: &[usize]) -> js_sys::Array {
    path.iter().map(|&index| JsValue::from(index)).collect()
}

/// A context menu attached to the elements matching a selector.
#[wasm_bindgen]
pub struct ContextMenuWidget {
    // Dropped before the shell so the dispatcher subscriptions go first.
    handle: Option<ContextMenuHandle<BrowserDom, WindowScheduler>>,
    shell: Option<BrowserShell>,
}

#[wasm_bindgen]
impl ContextMenuWidget {
    /// Build the menu from a JSON options object and attach it to every
    /// element matching `target_selector` (or `targetClasses` when the
    /// selector is empty).
    #[wasm_bindgen(constructor)]
    pub fn new(target_selector: &str, opts_json: &str) -> Result<ContextMenuWidget, JsValue> {
        console_error_panic_hook::set_once();

        let config = WidgetConfig::from_json(opts_json).map_err(js_error)?;
        let shell = BrowserShell::attach().map_err(js_error)?;
        let handle = ContextMenuHandle::install(
            shell.dispatcher(),
            Rc::clone(shell.scheduler()),
            target_selector,
            &config,
        )
        .map_err(js_error)?;

        Ok(Self {
            handle: Some(handle),
            shell: Some(shell),
        })
    }

    /// Set the selection callback. It is called as `callback(item, path)`
    /// with the element the menu was opened on as `this`. `path` holds
    /// the item's indices from the top level, so leaves sharing a label
    /// stay distinguishable.
    #[wasm_bindgen(js_name = onClick)]
    pub fn on_click(&self, callback: js_sys::Function) {
        let Some(handle) = &self.handle else {
            return;
        };
        handle.set_on_select(move |selected| {
            let Some(item) = item_to_js(&selected.item) else {
                return;
            };
            let path = path_to_js(&selected.path);
            let this = selected
                .context_target
                .as_ref()
                .map_or(JsValue::NULL, |el| el.clone().into());
            if let Err(err) = callback.call2(&this, &item, &path) {
                log::warn!("context menu callback threw: {err:?}");
            }
        });
    }

    /// Whether the menu is showing.
    #[wasm_bindgen(js_name = isOpen)]
    pub fn is_open(&self) -> bool {
        self.handle.as_ref().is_some_and(ContextMenuHandle::is_open)
    }

    /// Hide the menu.
    pub fn close(&self) {
        if let Some(handle) = &self.handle {
            handle.close();
        }
    }

    /// DOM id of the rendered menu.
    #[wasm_bindgen(getter, js_name = menuId)]
    pub fn menu_id(&self) -> Option<String> {
        self.handle.as_ref().map(ContextMenuHandle::menu_id)
    }

    /// Detach every listener. The rendered menu stays in the page,
    /// hidden.
    pub fn destroy(&mut self) {
        self.handle.take();
        self.shell.take();
    }
}

/// Initialize panic hook and console logging.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    init_logging(LevelFilter::Warn);
}

/// Change the console log level (`error`, `warn`, `info`, `debug`, `trace`).
#[wasm_bindgen(js_name = setLogLevel)]
pub fn set_log_level(level: &str) {
    init_logging(parse_level(level));
}
