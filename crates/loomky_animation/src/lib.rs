//! Loomky Animation System
//!
//! Timer scheduling and time-stepped counters for scroll-triggered effects.
//!
//! # Features
//!
//! - **Tick Scheduler**: fixed-interval and one-shot timers on a manually
//!   advanced clock, with idempotent cancellation
//! - **Animated Counters**: one-shot `0 -> target` ramps at ~60 Hz with
//!   prefix/suffix formatting

pub mod counter;
pub mod error;
pub mod scheduler;

pub use counter::{
    AnimatedCounter, CounterSpec, CounterState, DEFAULT_DURATION_MS, TICK_INTERVAL_MS,
};
pub use error::{AnimationError, Result};
pub use scheduler::{SchedulerHandle, TickCallback, TickControl, TickScheduler, TimerId};
