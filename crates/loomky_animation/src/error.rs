//! Error types for loomky_animation

use thiserror::Error;

/// Errors raised when configuring or starting animations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnimationError {
    /// A counter ramp needs a non-zero duration to compute its step size
    #[error("counter duration must be greater than zero")]
    ZeroDuration,

    /// The scheduler backing a handle has been dropped
    #[error("tick scheduler is no longer alive")]
    SchedulerGone,
}

/// Result type for loomky_animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;
