//! Animated counters
//!
//! Ramps a displayed integer from 0 to a target over a fixed duration, one
//! tick every [`TICK_INTERVAL_MS`]. Each tick adds a constant step to a
//! floating-point accumulator and displays its floor; once the accumulator
//! reaches the target the display snaps to the target and the timer stops.
//!
//! Completion is decided on tick boundaries, so the ramp can finish up to one
//! tick before or after the nominal duration.
//!
//! ```rust
//! use loomky_animation::{AnimatedCounter, CounterSpec, TickScheduler};
//!
//! let scheduler = TickScheduler::new();
//! let spec = CounterSpec::new(40).prefix("+").suffix("%");
//! let mut counter = AnimatedCounter::new(scheduler.handle(), spec).unwrap();
//! assert_eq!(counter.display(), "+0%");
//!
//! counter.start().unwrap();
//! scheduler.advance(2100);
//! assert_eq!(counter.display(), "+40%");
//! assert!(!counter.is_running());
//! ```

use crate::error::{AnimationError, Result};
use crate::scheduler::{SchedulerHandle, TickControl, TimerId};
use std::cell::RefCell;
use std::rc::Rc;

/// Counter tick interval (~60 Hz)
pub const TICK_INTERVAL_MS: u32 = 16;

/// Ramp duration used when none is configured
pub const DEFAULT_DURATION_MS: u32 = 2000;

/// Immutable counter configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CounterSpec {
    target: u32,
    prefix: String,
    suffix: String,
    duration_ms: u32,
}

impl CounterSpec {
    pub fn new(target: u32) -> Self {
        Self {
            target,
            prefix: String::new(),
            suffix: String::new(),
            duration_ms: DEFAULT_DURATION_MS,
        }
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn duration_ms(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn prefix_str(&self) -> &str {
        &self.prefix
    }

    pub fn suffix_str(&self) -> &str {
        &self.suffix
    }

    pub fn duration(&self) -> u32 {
        self.duration_ms
    }

    pub fn validate(&self) -> Result<()> {
        if self.duration_ms == 0 {
            return Err(AnimationError::ZeroDuration);
        }
        Ok(())
    }

    /// Amount added to the accumulator on every tick
    pub fn step_size(&self) -> f64 {
        let ticks = f64::from(self.duration_ms) / f64::from(TICK_INTERVAL_MS);
        f64::from(self.target) / ticks
    }

    /// `prefix + value + suffix`
    pub fn format(&self, value: u32) -> String {
        format!("{}{}{}", self.prefix, value, self.suffix)
    }
}

/// Observable counter state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CounterState {
    /// Displayed value; never decreases and never exceeds the target
    pub current: u32,
    /// True while the tick timer is registered
    pub running: bool,
}

#[derive(Default)]
struct CounterCore {
    state: CounterState,
    accumulator: f64,
    ticks: u32,
}

impl CounterCore {
    fn tick(&mut self, step: f64, target: u32) -> TickControl {
        if !self.state.running {
            return TickControl::Stop;
        }
        self.ticks += 1;
        self.accumulator += step;
        if self.accumulator >= f64::from(target) {
            self.state.current = target;
            self.state.running = false;
            tracing::trace!(value = target, ticks = self.ticks, "counter reached target");
            TickControl::Stop
        } else {
            // accumulator < target here, so the cast cannot overflow
            self.state.current = self.accumulator.floor() as u32;
            TickControl::Continue
        }
    }
}

/// A one-shot counter ramp driven by the tick scheduler
///
/// The counter starts at most once. After it completes or is cancelled it
/// never restarts; dropping it cancels any pending tick.
pub struct AnimatedCounter {
    handle: SchedulerHandle,
    spec: CounterSpec,
    core: Rc<RefCell<CounterCore>>,
    timer: Option<TimerId>,
    started: bool,
}

impl AnimatedCounter {
    pub fn new(handle: SchedulerHandle, spec: CounterSpec) -> Result<Self> {
        spec.validate()?;
        Ok(Self {
            handle,
            spec,
            core: Rc::new(RefCell::new(CounterCore::default())),
            timer: None,
            started: false,
        })
    }

    /// Begin the ramp
    ///
    /// Returns `Ok(false)` if the counter was already started or cancelled.
    pub fn start(&mut self) -> Result<bool> {
        if self.started {
            return Ok(false);
        }
        self.started = true;
        self.core.borrow_mut().state.running = true;

        let step = self.spec.step_size();
        let target = self.spec.target;
        let core = Rc::downgrade(&self.core);
        let timer = self.handle.start_interval(TICK_INTERVAL_MS, move || {
            let Some(core) = core.upgrade() else {
                return TickControl::Stop;
            };
            let control = core.borrow_mut().tick(step, target);
            control
        });

        match timer {
            Some(id) => {
                tracing::debug!(to = target, step, "counter started");
                self.timer = Some(id);
                Ok(true)
            }
            None => {
                self.core.borrow_mut().state.running = false;
                Err(AnimationError::SchedulerGone)
            }
        }
    }

    /// Stop ticking immediately. Idempotent.
    ///
    /// A counter cancelled before it starts can never be started.
    pub fn cancel(&mut self) {
        self.started = true;
        if let Some(id) = self.timer.take() {
            if self.handle.cancel(id) {
                tracing::debug!(current = self.current(), "counter cancelled mid-ramp");
            }
        }
        self.core.borrow_mut().state.running = false;
    }

    pub fn spec(&self) -> &CounterSpec {
        &self.spec
    }

    pub fn state(&self) -> CounterState {
        self.core.borrow().state
    }

    pub fn current(&self) -> u32 {
        self.core.borrow().state.current
    }

    pub fn is_running(&self) -> bool {
        self.core.borrow().state.running
    }

    /// True once the ramp has reached its target
    pub fn is_complete(&self) -> bool {
        let core = self.core.borrow();
        core.ticks > 0 && !core.state.running && core.state.current == self.spec.target
    }

    /// Number of ticks processed so far
    pub fn ticks(&self) -> u32 {
        self.core.borrow().ticks
    }

    /// Formatted display string, e.g. `+15h`
    pub fn display(&self) -> String {
        self.spec.format(self.current())
    }
}

impl Drop for AnimatedCounter {
    fn drop(&mut self) {
        self.cancel();
    }
}
