//! Tick scheduler
//!
//! The recurring-timer primitive behind every animated value on the site.
//! Timers are registered through a [`SchedulerHandle`] and fire when the
//! owner advances the scheduler clock:
//!
//! - `start_interval` - fixed-interval callback that runs until it returns
//!   [`TickControl::Stop`] or is cancelled
//! - `start_timeout` - one-shot delayed action
//!
//! The clock only moves when [`TickScheduler::advance`] is called, which
//! keeps the model single-threaded and makes timelines fully deterministic.
//! A host event loop advances it by real elapsed time; tests advance it by
//! exact amounts.

use slotmap::{new_key_type, SlotMap};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

new_key_type! {
    /// Handle to a registered timer
    pub struct TimerId;
}

/// Returned by interval callbacks to keep or stop the timer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Stop,
}

/// Callback type for interval timers
pub type TickCallback = Box<dyn FnMut() -> TickControl>;

struct Timer {
    interval_ms: u64,
    repeat: bool,
    due_ms: u64,
    /// Registration order, breaks ties between timers due at the same instant
    seq: u64,
    /// Taken out while the callback runs
    callback: Option<TickCallback>,
}

struct SchedulerInner {
    timers: SlotMap<TimerId, Timer>,
    now_ms: u64,
    next_seq: u64,
}

impl SchedulerInner {
    fn insert(&mut self, interval_ms: u64, repeat: bool, callback: TickCallback) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.insert(Timer {
            interval_ms,
            repeat,
            due_ms: self.now_ms + interval_ms,
            seq,
            callback: Some(callback),
        })
    }
}

/// Owner of all timers and of the simulated clock
///
/// Components receive a [`SchedulerHandle`], which does not keep the
/// scheduler alive. Dropping the scheduler drops every pending timer.
pub struct TickScheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                timers: SlotMap::with_key(),
                now_ms: 0,
                next_seq: 0,
            })),
        }
    }

    /// Get a handle to this scheduler for passing to components
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Current clock time in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.inner.borrow().now_ms
    }

    /// Number of registered timers (including ones mid-callback)
    pub fn timer_count(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    pub fn has_active_timers(&self) -> bool {
        !self.inner.borrow().timers.is_empty()
    }

    /// Advance the clock by `dt_ms`, firing every timer that falls due
    ///
    /// Timers fire in due-time order, one callback at a time. Callbacks may
    /// start or cancel timers (including their own); no borrow is held while
    /// a callback runs. Returns the number of callbacks run.
    pub fn advance(&self, dt_ms: u64) -> usize {
        let target = self.inner.borrow().now_ms.saturating_add(dt_ms);
        let mut ran = 0;

        loop {
            let next = {
                let inner = self.inner.borrow();
                inner
                    .timers
                    .iter()
                    .filter(|(_, t)| t.due_ms <= target && t.callback.is_some())
                    .min_by_key(|(_, t)| (t.due_ms, t.seq))
                    .map(|(id, _)| id)
            };
            let Some(id) = next else {
                break;
            };

            let callback = {
                let mut inner = self.inner.borrow_mut();
                let Some(timer) = inner.timers.get_mut(id) else {
                    break;
                };
                let due = timer.due_ms;
                let callback = timer.callback.take();
                inner.now_ms = due;
                callback
            };
            let Some(mut callback) = callback else {
                break;
            };

            let control = callback();
            ran += 1;

            let finished = {
                let mut inner = self.inner.borrow_mut();
                let reschedule = inner
                    .timers
                    .get(id)
                    .map(|t| t.repeat && control == TickControl::Continue);
                match reschedule {
                    Some(true) => {
                        if let Some(timer) = inner.timers.get_mut(id) {
                            timer.due_ms += timer.interval_ms;
                            timer.callback = Some(callback);
                        }
                        None
                    }
                    Some(false) => inner.timers.remove(id),
                    // Cancelled from inside its own callback
                    None => None,
                }
            };
            drop(finished);
        }

        let mut inner = self.inner.borrow_mut();
        inner.now_ms = inner.now_ms.max(target);
        ran
    }

    /// Advance in `step_ms` increments until no timers remain or `max_ms` has
    /// elapsed. Returns the elapsed time.
    pub fn run_until_idle(&self, step_ms: u64, max_ms: u64) -> u64 {
        let step = step_ms.max(1);
        let start = self.now_ms();
        while self.has_active_timers() && self.now_ms() - start < max_ms {
            self.advance(step);
        }
        self.now_ms() - start
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// A weak handle to the tick scheduler
///
/// This is passed to components that need timers.
/// It won't prevent the scheduler from being dropped.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<RefCell<SchedulerInner>>,
}

impl SchedulerHandle {
    /// Register a fixed-interval timer
    ///
    /// The first call happens `interval_ms` after registration. A zero
    /// interval is treated as 1 ms. Returns `None` if the scheduler is gone.
    pub fn start_interval<F>(&self, interval_ms: u32, callback: F) -> Option<TimerId>
    where
        F: FnMut() -> TickControl + 'static,
    {
        let interval = u64::from(interval_ms.max(1));
        self.inner
            .upgrade()
            .map(|inner| inner.borrow_mut().insert(interval, true, Box::new(callback)))
    }

    /// Register a one-shot delayed action
    pub fn start_timeout<F>(&self, delay_ms: u32, action: F) -> Option<TimerId>
    where
        F: FnOnce() + 'static,
    {
        let mut action = Some(action);
        let callback: TickCallback = Box::new(move || {
            if let Some(action) = action.take() {
                action();
            }
            TickControl::Stop
        });
        self.inner
            .upgrade()
            .map(|inner| inner.borrow_mut().insert(u64::from(delay_ms), false, callback))
    }

    /// Cancel a timer. Idempotent; returns true if the timer was registered.
    pub fn cancel(&self, id: TimerId) -> bool {
        let Some(inner) = self.inner.upgrade() else {
            return false;
        };
        let removed = inner.borrow_mut().timers.remove(id);
        removed.is_some()
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.borrow().timers.contains_key(id))
            .unwrap_or(false)
    }

    pub fn now_ms(&self) -> Option<u64> {
        self.inner.upgrade().map(|inner| inner.borrow().now_ms)
    }

    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}
