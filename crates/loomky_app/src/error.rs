//! Error types for loomky_app

use loomky_animation::AnimationError;
use loomky_core::RevealError;
use thiserror::Error;

/// Errors that can occur while driving the site
#[derive(Error, Debug)]
pub enum LoomkyError {
    /// Invalid reveal configuration (threshold out of range)
    #[error(transparent)]
    Reveal(#[from] RevealError),

    /// Invalid counter configuration or dead scheduler
    #[error(transparent)]
    Animation(#[from] AnimationError),

    /// Failed to parse the site configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Failed to read a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Path does not match any page
    #[error("No page at path {0:?}")]
    UnknownRoute(String),

    /// A required contact form field was left empty
    #[error("Required field is empty: {0}")]
    MissingField(&'static str),
}

impl From<toml::de::Error> for LoomkyError {
    fn from(err: toml::de::Error) -> Self {
        LoomkyError::Config(err.to_string())
    }
}

/// Result type for loomky_app operations
pub type Result<T> = std::result::Result<T, LoomkyError>;
