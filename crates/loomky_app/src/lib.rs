//! Loomky Site Framework
//!
//! UI state for the Loomky marketing site: scroll-triggered reveals, animated
//! stat counters, page routing with simulated latency, and the demo request
//! form.
//!
//! # Example
//!
//! ```rust
//! use loomky_app::prelude::*;
//!
//! let viewport = Viewport::new(Rect::new(0.0, 0.0, 1280.0, 720.0));
//! let scheduler = TickScheduler::new();
//! let observer = VisibilityObserver::new(viewport.handle());
//!
//! let region = viewport.add_region(Some(Rect::new(0.0, 200.0, 300.0, 80.0)));
//! let spec = CounterSpec::new(15).prefix("+").suffix("h");
//! let counter = RevealController::create(
//!     &observer,
//!     scheduler.handle(),
//!     region,
//!     RevealOptions::counter(spec),
//! )
//! .unwrap();
//!
//! viewport.process();
//! scheduler.advance(2100);
//! assert!(counter.is_revealed());
//! assert_eq!(counter.display().as_deref(), Some("+15h"));
//! ```

pub mod config;
pub mod contact;
mod error;
pub mod navigation;
pub mod page;
pub mod reveal;
pub mod route;
pub mod site;


pub use config::{CounterConfig, NavigationConfig, RevealConfig, SiteConfig, StatConfig};
pub use contact::{ContactField, ContactFields, ContactForm, FormStatus};
pub use error::{LoomkyError, Result};
pub use navigation::{DelayedAction, Navigator};
pub use page::PageState;
pub use reveal::{RevealController, RevealOptions};
pub use route::Route;
pub use site::{HeaderState, Site, HEADER_SCROLL_OFFSET};

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::config::SiteConfig;
    pub use crate::error::{LoomkyError, Result};
    pub use crate::reveal::{RevealController, RevealOptions};
    pub use crate::route::Route;
    pub use crate::site::Site;

    pub use loomky_animation::{AnimatedCounter, CounterSpec, CounterState, TickScheduler};
    pub use loomky_core::{Rect, RevealState, Threshold, Viewport, VisibilityObserver};
}
