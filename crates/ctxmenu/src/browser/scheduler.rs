//! [`Scheduler`] over `window.setTimeout`.

use ctxmenu_core::{Scheduler, TimerId};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

struct Pending {
    handle: i32,
    callback: Closure<dyn FnMut()>,
}

/// One-shot timers backed by the window's timeout queue.
pub struct WindowScheduler {
    window: Window,
    pending: Rc<RefCell<HashMap<TimerId, Pending>>>,
    // Callbacks that already ran. A closure cannot be dropped while it
    // runs, so these are released on the next schedule.
    spent: Rc<RefCell<Vec<Closure<dyn FnMut()>>>>,
    next_id: Cell<u64>,
}

impl WindowScheduler {
    /// Schedule on `window`.
    pub fn new(window: Window) -> Self {
        Self {
            window,
            pending: Rc::new(RefCell::new(HashMap::new())),
            spent: Rc::new(RefCell::new(Vec::new())),
            next_id: Cell::new(1),
        }
    }

    /// Number of timers that have not fired or been cancelled.
    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }
}

impl Scheduler for WindowScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TimerId {
        self.spent.borrow_mut().clear();

        let id = TimerId::from_raw(self.next_id.get());
        self.next_id.set(id.raw() + 1);

        let pending = Rc::clone(&self.pending);
        let spent = Rc::clone(&self.spent);
        let callback: Closure<dyn FnMut()> = Closure::once(move || {
            let entry = pending.borrow_mut().remove(&id);
            if let Some(entry) = entry {
                spent.borrow_mut().push(entry.callback);
                task();
            }
        });

        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        match self.window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            delay,
        ) {
            Ok(handle) => {
                self.pending
                    .borrow_mut()
                    .insert(id, Pending { handle, callback });
            }
            Err(err) => log::warn!("setTimeout failed for {id}: {err:?}"),
        }
        id
    }

    fn cancel(&self, id: TimerId) -> bool {
        let entry = self.pending.borrow_mut().remove(&id);
        match entry {
            Some(entry) => {
                self.window.clear_timeout_with_handle(entry.handle);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for WindowScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowScheduler")
            .field("pending", &self.pending_count())
            .finish_non_exhaustive()
    }
}
