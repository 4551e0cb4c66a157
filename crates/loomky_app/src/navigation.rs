//! Delayed actions and navigation
//!
//! Buttons on the site show a spinner for a short simulated latency before
//! navigating or completing. [`DelayedAction`] models that as a cancellable
//! one-shot timer: cancelling it (or dropping it) guarantees the completion
//! never runs, so navigating away never leaves a dangling callback behind.

use crate::error::Result;
use crate::route::Route;
use loomky_animation::{AnimationError, SchedulerHandle, TimerId};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// A cancellable one-shot action on the tick scheduler
pub struct DelayedAction {
    handle: SchedulerHandle,
    timer: Option<TimerId>,
    done: Rc<Cell<bool>>,
}

impl DelayedAction {
    pub fn schedule<F>(handle: SchedulerHandle, delay_ms: u32, action: F) -> Result<Self>
    where
        F: FnOnce() + 'static,
    {
        let done = Rc::new(Cell::new(false));
        let done_flag = Rc::clone(&done);
        let timer = handle
            .start_timeout(delay_ms, move || {
                done_flag.set(true);
                action();
            })
            .ok_or(AnimationError::SchedulerGone)?;
        Ok(Self {
            handle,
            timer: Some(timer),
            done,
        })
    }

    /// Cancel if still pending. Returns true if the action was prevented.
    pub fn cancel(&mut self) -> bool {
        match self.timer.take() {
            Some(id) => self.handle.cancel(id),
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.timer.is_some_and(|id| self.handle.is_active(id))
    }

    pub fn is_done(&self) -> bool {
        self.done.get()
    }
}

impl Drop for DelayedAction {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[derive(Default)]
struct NavState {
    current: Route,
    pending: Option<Route>,
    /// Route changed since the last `take_route_change`
    changed: bool,
}

impl NavState {
    fn arrive(&mut self, route: Route) {
        self.pending = None;
        if self.current != route {
            tracing::debug!(from = %self.current, to = %route, "navigated");
            self.current = route;
            self.changed = true;
        }
    }
}

/// Current route plus at most one pending delayed navigation
pub struct Navigator {
    scheduler: SchedulerHandle,
    state: Rc<RefCell<NavState>>,
    pending: Option<DelayedAction>,
}

impl Navigator {
    pub fn new(scheduler: SchedulerHandle, start: Route) -> Self {
        Self {
            scheduler,
            state: Rc::new(RefCell::new(NavState {
                current: start,
                ..NavState::default()
            })),
            pending: None,
        }
    }

    pub fn current(&self) -> Route {
        self.state.borrow().current
    }

    /// Route a delayed navigation is heading to
    pub fn pending_route(&self) -> Option<Route> {
        self.state.borrow().pending
    }

    /// True while a delayed navigation is in flight (spinner shown)
    pub fn is_loading(&self) -> bool {
        self.pending_route().is_some()
    }

    /// Navigate immediately, cancelling anything pending
    pub fn navigate(&mut self, route: Route) {
        self.cancel_pending();
        self.state.borrow_mut().arrive(route);
    }

    /// Navigate once `delay_ms` has elapsed
    ///
    /// Replaces any navigation already pending.
    pub fn navigate_after(&mut self, route: Route, delay_ms: u32) -> Result<()> {
        self.cancel_pending();

        let state = Rc::downgrade(&self.state);
        let action = DelayedAction::schedule(self.scheduler.clone(), delay_ms, move || {
            if let Some(state) = state.upgrade() {
                state.borrow_mut().arrive(route);
            }
        })?;

        self.state.borrow_mut().pending = Some(route);
        self.pending = Some(action);
        tracing::debug!(to = %route, delay_ms, "navigation scheduled");
        Ok(())
    }

    /// Drop the pending navigation, if any. Returns true if one was cancelled.
    pub fn cancel_pending(&mut self) -> bool {
        let cancelled = self
            .pending
            .take()
            .map(|mut action| action.cancel())
            .unwrap_or(false);
        let route = self.state.borrow_mut().pending.take();
        if cancelled {
            tracing::debug!(to = ?route, "pending navigation cancelled");
        }
        cancelled
    }

    /// Report (once) that the route has changed since the last call
    pub fn take_route_change(&mut self) -> Option<Route> {
        let mut state = self.state.borrow_mut();
        if std::mem::take(&mut state.changed) {
            Some(state.current)
        } else {
            None
        }
    }
}

impl Drop for Navigator {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
