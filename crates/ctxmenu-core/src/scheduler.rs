//! One-shot timers.
//!
//! Widgets that need to wait (long-press detection) schedule a task
//! through [`Scheduler`]. The browser implementation sits on
//! `setTimeout`; [`ManualScheduler`] runs on a virtual clock that tests
//! and native hosts advance explicitly.

use std::cell::{Cell, RefCell};
use std::fmt;

/// Handle of a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Wrap a raw id. Scheduler implementations use this to mint handles.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

/// A one-shot timer service.
pub trait Scheduler {
    /// Run `task` once after `delay_ms` milliseconds.
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TimerId;

    /// Cancel a task that has not run yet. Returns whether it was pending.
    fn cancel(&self, id: TimerId) -> bool;
}

struct PendingTask {
    id: TimerId,
    due_ms: u64,
    task: Box<dyn FnOnce()>,
}

/// Scheduler driven by an explicit virtual clock.
pub struct ManualScheduler {
    now_ms: Cell<u64>,
    pending: RefCell<Vec<PendingTask>>,
    next_id: Cell<u64>,
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualScheduler {
    /// Create a scheduler at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now_ms: Cell::new(0),
            pending: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        }
    }

    /// Current virtual time.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }

    /// Number of tasks waiting to run.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Whether a task is still waiting to run.
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.borrow().iter().any(|t| t.id == id)
    }

    /// Move the clock forward, running every task that falls due, in due
    /// order. Tasks scheduled by running tasks fire in the same call if
    /// they fall due within the window. Returns the number of tasks run.
    pub fn advance(&self, delta_ms: u32) -> usize {
        let target = self.now_ms.get() + u64::from(delta_ms);
        let mut fired = 0;

        while let Some(next) = self.pop_due(target) {
            self.now_ms.set(next.due_ms.max(self.now_ms.get()));
            (next.task)();
            fired += 1;
        }

        self.now_ms.set(target);
        fired
    }

    /// Remove the earliest task due at or before `target`, without
    /// holding the borrow while it runs.
    fn pop_due(&self, target: u64) -> Option<PendingTask> {
        let mut pending = self.pending.borrow_mut();
        let idx = pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= target)
            .min_by_key(|(_, t)| (t.due_ms, t.id))
            .map(|(i, _)| i)?;
        Some(pending.remove(idx))
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TimerId {
        let id = TimerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.pending.borrow_mut().push(PendingTask {
            id,
            due_ms: self.now_ms.get() + u64::from(delay_ms),
            task,
        });
        id
    }

    fn cancel(&self, id: TimerId) -> bool {
        let removed = {
            let mut pending = self.pending.borrow_mut();
            pending
                .iter()
                .position(|t| t.id == id)
                .map(|idx| pending.remove(idx))
        };
        removed.is_some()
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("now_ms", &self.now_ms.get())
            .field("pending", &self.pending_count())
            .finish_non_exhaustive()
    }
}
