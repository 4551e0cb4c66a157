//! Loomky Core
//!
//! Foundational primitives for scroll-triggered reveals on the Loomky site:
//!
//! - **Geometry**: page-space rectangles and visible-fraction math
//! - **Thresholds**: validated intersection ratios in `(0, 1]`
//! - **Reveal State**: the one-way `Hidden -> Revealed` transition
//! - **Visibility**: a viewport host plus one-shot visibility observers
//!
//! Everything here is single-threaded: regions, watches and callbacks live on
//! the UI thread and are driven by the host calling [`Viewport::process`].

pub mod error;
pub mod geometry;
pub mod reveal;
pub mod visibility;

pub use error::{Result, RevealError};
pub use geometry::{Point, Rect, Size};
pub use reveal::{RevealState, Threshold};
pub use visibility::{
    ObservedRegion, RegionId, Viewport, ViewportHandle, VisibilityObserver,
    VisibilitySubscription, WatchId,
};
