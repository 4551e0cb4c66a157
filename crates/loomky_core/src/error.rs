//! Error types for loomky_core

use thiserror::Error;

/// Caller contract violations caught at construction time
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RevealError {
    /// Intersection threshold outside `(0, 1]`
    #[error("intersection threshold must be in (0, 1], got {0}")]
    InvalidThreshold(f32),
}

/// Result type for loomky_core operations
pub type Result<T> = std::result::Result<T, RevealError>;
