//! Reveal controllers
//!
//! A [`RevealController`] binds one region to one visibility watch. When the
//! region first enters the viewport the controller flips its
//! [`RevealState`] to `Revealed` and, for numeric regions, starts an
//! [`AnimatedCounter`] in the same callback, so the reveal always precedes
//! the first counter tick.
//!
//! Teardown is synchronous and total: the pending watch is detached, any
//! running tick timer is cancelled, and later callbacks are ignored.

use crate::error::Result;
use loomky_animation::{AnimatedCounter, CounterSpec, CounterState, SchedulerHandle};
use loomky_core::{RegionId, RevealState, Threshold, VisibilityObserver, VisibilitySubscription};
use std::cell::RefCell;
use std::rc::Rc;

/// Options for [`RevealController::create`]
#[derive(Clone, Debug, Default)]
pub struct RevealOptions {
    /// Defaults to [`Threshold::COUNTER`] for counters and
    /// [`Threshold::SECTION`] otherwise
    pub threshold: Option<Threshold>,
    pub counter: Option<CounterSpec>,
}

impl RevealOptions {
    /// Plain section reveal
    pub fn section() -> Self {
        Self::default()
    }

    /// Reveal that also ramps a counter
    pub fn counter(spec: CounterSpec) -> Self {
        Self {
            threshold: None,
            counter: Some(spec),
        }
    }

    pub fn threshold(mut self, threshold: Threshold) -> Self {
        self.threshold = Some(threshold);
        self
    }

    fn resolved_threshold(&self) -> Threshold {
        self.threshold.unwrap_or(if self.counter.is_some() {
            Threshold::COUNTER
        } else {
            Threshold::SECTION
        })
    }
}

struct RevealShared {
    state: RevealState,
    counter: Option<AnimatedCounter>,
    torn_down: bool,
}

impl RevealShared {
    fn on_entered(&mut self, region: RegionId) {
        if self.torn_down || !self.state.reveal() {
            return;
        }
        tracing::debug!(?region, counter = self.counter.is_some(), "region revealed");
        if let Some(counter) = self.counter.as_mut() {
            if let Err(err) = counter.start() {
                tracing::warn!(?region, %err, "counter could not start");
            }
        }
    }
}

/// Drives one region from `Hidden` to `Revealed`
///
/// Dropping the controller tears it down.
pub struct RevealController {
    region: RegionId,
    shared: Rc<RefCell<RevealShared>>,
    subscription: Option<VisibilitySubscription>,
}

impl RevealController {
    /// Attach a controller to `region`
    ///
    /// Fails if the counter spec is invalid. The counter is built here but
    /// only started when the region enters view.
    pub fn create(
        observer: &VisibilityObserver,
        scheduler: SchedulerHandle,
        region: RegionId,
        options: RevealOptions,
    ) -> Result<Self> {
        let threshold = options.resolved_threshold();
        let counter = options
            .counter
            .map(|spec| AnimatedCounter::new(scheduler, spec))
            .transpose()?;

        let shared = Rc::new(RefCell::new(RevealShared {
            state: RevealState::Hidden,
            counter,
            torn_down: false,
        }));

        let weak = Rc::downgrade(&shared);
        let subscription = observer.attach(region, threshold, move || {
            if let Some(shared) = weak.upgrade() {
                shared.borrow_mut().on_entered(region);
            }
        });

        Ok(Self {
            region,
            shared,
            subscription: Some(subscription),
        })
    }

    /// Detach the watch and stop any counter. Safe to call at any point,
    /// any number of times.
    pub fn teardown(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.detach();
        }

        let mut shared = self.shared.borrow_mut();
        if shared.torn_down {
            return;
        }
        shared.torn_down = true;
        if let Some(counter) = shared.counter.as_mut() {
            counter.cancel();
        }
        tracing::trace!(region = ?self.region, state = ?shared.state, "reveal controller torn down");
    }

    pub fn region(&self) -> RegionId {
        self.region
    }

    pub fn state(&self) -> RevealState {
        self.shared.borrow().state
    }

    pub fn is_revealed(&self) -> bool {
        self.state().is_revealed()
    }

    pub fn is_torn_down(&self) -> bool {
        self.shared.borrow().torn_down
    }

    /// Whether the visibility watch is still waiting
    pub fn is_watching(&self) -> bool {
        self.subscription
            .as_ref()
            .is_some_and(VisibilitySubscription::is_pending)
    }

    /// Class to toggle on the rendered region
    pub fn class_name(&self) -> Option<&'static str> {
        self.state().class_name()
    }

    pub fn has_counter(&self) -> bool {
        self.shared.borrow().counter.is_some()
    }

    pub fn counter_state(&self) -> Option<CounterState> {
        self.shared.borrow().counter.as_ref().map(AnimatedCounter::state)
    }

    pub fn counter_ticks(&self) -> Option<u32> {
        self.shared.borrow().counter.as_ref().map(AnimatedCounter::ticks)
    }

    /// Formatted counter text, e.g. `+15h`
    pub fn display(&self) -> Option<String> {
        self.shared.borrow().counter.as_ref().map(AnimatedCounter::display)
    }
}

impl Drop for RevealController {
    fn drop(&mut self) {
        self.teardown();
    }
}
