//! Visibility observation
//!
//! [`Viewport`] is the host-side intersection primitive: the page layer feeds
//! it the viewport rectangle and the bounds of each mounted region, then calls
//! [`Viewport::process`] once per frame (or [`Viewport::report_ratio`] when the
//! host measures intersection ratios itself).
//!
//! [`VisibilityObserver`] attaches one-shot watches to regions. A watch fires
//! its callback on the first frame the region's visible fraction reaches the
//! threshold, and is removed before the callback runs, so every subscription
//! produces at most one notification.
//!
//! # Example
//!
//! ```rust
//! use loomky_core::{Rect, Threshold, Viewport, VisibilityObserver};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let viewport = Viewport::new(Rect::new(0.0, 0.0, 800.0, 600.0));
//! let region = viewport.add_region(Some(Rect::new(0.0, 1000.0, 800.0, 200.0)));
//!
//! let seen = Rc::new(Cell::new(0));
//! let observer = VisibilityObserver::new(viewport.handle());
//! let seen_in_cb = Rc::clone(&seen);
//! let _sub = observer.attach(region, Threshold::SECTION, move || {
//!     seen_in_cb.set(seen_in_cb.get() + 1);
//! });
//!
//! viewport.process();
//! assert_eq!(seen.get(), 0);
//!
//! viewport.scroll_to(700.0);
//! viewport.process();
//! viewport.process();
//! assert_eq!(seen.get(), 1);
//! ```

use crate::geometry::Rect;
use crate::reveal::Threshold;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

new_key_type! {
    /// Handle to a region registered with a viewport
    pub struct RegionId;
    /// Handle to a pending one-shot visibility watch
    pub struct WatchId;
}

/// A region tracked by the viewport
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ObservedRegion {
    /// Page-space bounds; `None` until the region has been laid out
    pub bounds: Option<Rect>,
    /// Set on the first qualifying intersection and never cleared
    pub visible: bool,
}

type EnterCallback = Box<dyn FnOnce()>;

struct Watch {
    region: RegionId,
    threshold: Threshold,
    on_enter: EnterCallback,
}

struct ViewportInner {
    bounds: Rect,
    regions: SlotMap<RegionId, ObservedRegion>,
    watches: SlotMap<WatchId, Watch>,
}

impl ViewportInner {
    fn fraction(&self, region: RegionId) -> Option<f32> {
        self.regions
            .get(region)
            .and_then(|r| r.bounds)
            .and_then(|b| b.visible_fraction(&self.bounds))
    }
}

/// The viewport intersection host
///
/// Owns the region table and every pending watch. Observers hold a
/// [`ViewportHandle`], which does not keep the viewport alive.
pub struct Viewport {
    inner: Rc<RefCell<ViewportInner>>,
}

impl Viewport {
    pub fn new(bounds: Rect) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ViewportInner {
                bounds,
                regions: SlotMap::with_key(),
                watches: SlotMap::with_key(),
            })),
        }
    }

    /// Get a weak handle for observers
    pub fn handle(&self) -> ViewportHandle {
        ViewportHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn set_bounds(&self, bounds: Rect) {
        self.inner.borrow_mut().bounds = bounds;
    }

    /// Move the viewport to a vertical scroll offset
    pub fn scroll_to(&self, y: f32) {
        self.inner.borrow_mut().bounds.origin.y = y;
    }

    pub fn scroll_by(&self, dy: f32) {
        self.inner.borrow_mut().bounds.origin.y += dy;
    }

    // =========================================================================
    // Regions
    // =========================================================================

    /// Register a mounted region. Bounds may be supplied later.
    pub fn add_region(&self, bounds: Option<Rect>) -> RegionId {
        self.inner.borrow_mut().regions.insert(ObservedRegion {
            bounds,
            visible: false,
        })
    }

    pub fn set_region_bounds(&self, region: RegionId, bounds: Rect) {
        if let Some(r) = self.inner.borrow_mut().regions.get_mut(region) {
            r.bounds = Some(bounds);
        }
    }

    /// Tear a region down, dropping its pending watches without firing them
    pub fn remove_region(&self, region: RegionId) -> bool {
        // Callbacks are dropped after the borrow ends in case they own
        // something that reaches back into the viewport.
        let dropped: SmallVec<[Watch; 4]> = {
            let mut inner = self.inner.borrow_mut();
            if inner.regions.remove(region).is_none() {
                return false;
            }
            let ids: SmallVec<[WatchId; 4]> = inner
                .watches
                .iter()
                .filter(|(_, w)| w.region == region)
                .map(|(id, _)| id)
                .collect();
            ids.into_iter()
                .filter_map(|id| inner.watches.remove(id))
                .collect()
        };
        if !dropped.is_empty() {
            tracing::debug!(?region, watches = dropped.len(), "region removed before entering view");
        }
        true
    }

    pub fn region(&self, region: RegionId) -> Option<ObservedRegion> {
        self.inner.borrow().regions.get(region).copied()
    }

    pub fn is_region_visible(&self, region: RegionId) -> bool {
        self.region(region).map(|r| r.visible).unwrap_or(false)
    }

    /// Current visible fraction of a region, if it is measurable
    pub fn visible_fraction(&self, region: RegionId) -> Option<f32> {
        self.inner.borrow().fraction(region)
    }

    pub fn watch_count(&self) -> usize {
        self.inner.borrow().watches.len()
    }

    // =========================================================================
    // Frame processing
    // =========================================================================

    /// Evaluate every pending watch against the current geometry
    ///
    /// Returns the number of watches that fired.
    pub fn process(&self) -> usize {
        self.fire_where(|inner, watch| {
            inner
                .fraction(watch.region)
                .is_some_and(|f| watch.threshold.is_met_by(f))
        })
    }

    /// Deliver a host-measured intersection ratio for one region
    ///
    /// Use this when the host computes ratios itself instead of supplying
    /// bounds. Ratios that do not meet a watch's threshold are ignored.
    pub fn report_ratio(&self, region: RegionId, ratio: f32) -> usize {
        self.fire_where(|_, watch| watch.region == region && watch.threshold.is_met_by(ratio))
    }

    fn fire_where<F>(&self, qualifies: F) -> usize
    where
        F: Fn(&ViewportInner, &Watch) -> bool,
    {
        let due: SmallVec<[WatchId; 8]> = {
            let inner = self.inner.borrow();
            let view: &ViewportInner = &inner;
            view.watches
                .iter()
                .filter(|(_, w)| qualifies(view, *w))
                .map(|(id, _)| id)
                .collect()
        };

        // Each watch is taken out just before its callback runs, so a callback
        // that detaches a later watch (or removes its region) suppresses it.
        let mut count = 0;
        for id in due {
            let watch = {
                let mut inner = self.inner.borrow_mut();
                let Some(watch) = inner.watches.remove(id) else {
                    continue;
                };
                if let Some(region) = inner.regions.get_mut(watch.region) {
                    region.visible = true;
                }
                watch
            };
            let Watch {
                region, on_enter, ..
            } = watch;
            tracing::debug!(watch = ?id, ?region, "region entered viewport");
            count += 1;
            on_enter();
        }
        count
    }
}

/// Weak handle to a [`Viewport`]
#[derive(Clone)]
pub struct ViewportHandle {
    inner: Weak<RefCell<ViewportInner>>,
}

impl ViewportHandle {
    /// Register a one-shot watch. Returns `None` if the viewport is gone.
    pub fn watch(
        &self,
        region: RegionId,
        threshold: Threshold,
        on_enter: impl FnOnce() + 'static,
    ) -> Option<WatchId> {
        self.inner.upgrade().map(|inner| {
            inner.borrow_mut().watches.insert(Watch {
                region,
                threshold,
                on_enter: Box::new(on_enter),
            })
        })
    }

    /// Remove a pending watch. Returns true if it was still pending.
    pub fn unwatch(&self, id: WatchId) -> bool {
        let Some(inner) = self.inner.upgrade() else {
            return false;
        };
        let removed = inner.borrow_mut().watches.remove(id);
        removed.is_some()
    }

    pub fn is_watching(&self, id: WatchId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.borrow().watches.contains_key(id))
            .unwrap_or(false)
    }

    /// Check if the viewport is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

/// Attaches one-shot visibility watches to regions of a viewport
#[derive(Clone)]
pub struct VisibilityObserver {
    viewport: ViewportHandle,
}

impl VisibilityObserver {
    pub fn new(viewport: ViewportHandle) -> Self {
        Self { viewport }
    }

    /// Begin monitoring `region`
    ///
    /// `on_enter` runs at most once, on the first frame the region's visible
    /// fraction reaches `threshold`; monitoring stops before it runs. A region
    /// that is never measurable simply never fires.
    pub fn attach(
        &self,
        region: RegionId,
        threshold: Threshold,
        on_enter: impl FnOnce() + 'static,
    ) -> VisibilitySubscription {
        let fired = Rc::new(Cell::new(false));
        let fired_flag = Rc::clone(&fired);
        let id = self.viewport.watch(region, threshold, move || {
            fired_flag.set(true);
            on_enter();
        });
        if id.is_none() {
            tracing::warn!(?region, "viewport dropped, visibility watch will never fire");
        }
        VisibilitySubscription {
            viewport: self.viewport.clone(),
            id,
            fired,
        }
    }
}

/// A pending (or finished) one-shot visibility watch
///
/// Dropping the subscription detaches it.
pub struct VisibilitySubscription {
    viewport: ViewportHandle,
    id: Option<WatchId>,
    fired: Rc<Cell<bool>>,
}

impl VisibilitySubscription {
    /// Stop monitoring. Idempotent; never fires the notification.
    pub fn detach(&mut self) {
        if let Some(id) = self.id.take() {
            if self.viewport.unwatch(id) {
                tracing::trace!(watch = ?id, "visibility watch detached before entering view");
            }
        }
    }

    /// Whether the watch is still waiting for its region to enter view
    pub fn is_pending(&self) -> bool {
        self.id.is_some_and(|id| self.viewport.is_watching(id))
    }

    /// Whether the notification has been delivered
    pub fn has_fired(&self) -> bool {
        self.fired.get()
    }
}

impl Drop for VisibilitySubscription {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter() -> (Rc<Cell<u32>>, impl FnOnce() + 'static) {
        let hits = Rc::new(Cell::new(0));
        let hits_cb = Rc::clone(&hits);
        (hits, move || hits_cb.set(hits_cb.get() + 1))
    }

    fn page() -> Viewport {
        Viewport::new(Rect::new(0.0, 0.0, 800.0, 600.0))
    }

    #[test]
    fn test_fires_once_on_threshold() {
        let viewport = page();
        let region = viewport.add_region(Some(Rect::new(0.0, 560.0, 800.0, 200.0)));
        let observer = VisibilityObserver::new(viewport.handle());
        let (hits, cb) = counter();
        let sub = observer.attach(region, Threshold::COUNTER, cb);

        // 40px of 200px visible
        assert_eq!(viewport.process(), 0);
        assert!(sub.is_pending());
        assert!(!viewport.is_region_visible(region));

        viewport.scroll_to(100.0);
        assert_eq!(viewport.process(), 1);
        assert_eq!(hits.get(), 1);
        assert!(sub.has_fired());
        assert!(!sub.is_pending());
        assert!(viewport.is_region_visible(region));

        // Leaving and re-entering the viewport does not fire again
        viewport.scroll_to(2000.0);
        viewport.process();
        viewport.scroll_to(100.0);
        assert_eq!(viewport.process(), 0);
        assert_eq!(hits.get(), 1);
        assert!(viewport.is_region_visible(region));
        assert_eq!(viewport.watch_count(), 0);
    }

    #[test]
    fn test_below_threshold_never_fires() {
        let viewport = page();
        let region = viewport.add_region(Some(Rect::new(0.0, 500.0, 800.0, 1000.0)));
        let observer = VisibilityObserver::new(viewport.handle());
        let (hits, cb) = counter();
        let _sub = observer.attach(region, Threshold::new(0.9).unwrap(), cb);

        // The region is taller than the viewport: at most 60% can be visible
        for y in (0..=2000).step_by(50) {
            viewport.scroll_to(y as f32);
            viewport.process();
        }
        assert_eq!(hits.get(), 0);
        assert!(!viewport.is_region_visible(region));
    }

    #[test]
    fn test_detach_before_trigger() {
        let viewport = page();
        let region = viewport.add_region(Some(Rect::new(0.0, 0.0, 800.0, 100.0)));
        let observer = VisibilityObserver::new(viewport.handle());
        let (hits, cb) = counter();
        let mut sub = observer.attach(region, Threshold::SECTION, cb);

        sub.detach();
        sub.detach();
        assert_eq!(viewport.watch_count(), 0);
        assert_eq!(viewport.process(), 0);
        assert_eq!(hits.get(), 0);
        assert!(!sub.has_fired());
    }

    #[test]
    fn test_detach_after_fire_is_noop() {
        let viewport = page();
        let region = viewport.add_region(Some(Rect::new(0.0, 0.0, 800.0, 100.0)));
        let observer = VisibilityObserver::new(viewport.handle());
        let (hits, cb) = counter();
        let mut sub = observer.attach(region, Threshold::SECTION, cb);

        viewport.process();
        sub.detach();
        assert_eq!(hits.get(), 1);
        assert!(sub.has_fired());
    }

    #[test]
    fn test_drop_detaches() {
        let viewport = page();
        let region = viewport.add_region(Some(Rect::new(0.0, 0.0, 800.0, 100.0)));
        let observer = VisibilityObserver::new(viewport.handle());
        let (hits, cb) = counter();
        drop(observer.attach(region, Threshold::SECTION, cb));

        assert_eq!(viewport.watch_count(), 0);
        viewport.process();
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_unmeasured_region_never_fires() {
        let viewport = page();
        let region = viewport.add_region(None);
        let observer = VisibilityObserver::new(viewport.handle());
        let (hits, cb) = counter();
        let sub = observer.attach(region, Threshold::SECTION, cb);

        viewport.process();
        assert_eq!(hits.get(), 0);
        assert!(sub.is_pending());

        // Laid out later, inside the viewport
        viewport.set_region_bounds(region, Rect::new(0.0, 0.0, 100.0, 100.0));
        viewport.process();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_remove_region_drops_watch() {
        let viewport = page();
        let region = viewport.add_region(Some(Rect::new(0.0, 0.0, 800.0, 100.0)));
        let observer = VisibilityObserver::new(viewport.handle());
        let (hits, cb) = counter();
        let mut sub = observer.attach(region, Threshold::SECTION, cb);

        assert!(viewport.remove_region(region));
        assert!(!viewport.remove_region(region));
        assert!(!sub.is_pending());
        viewport.process();
        sub.detach();
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_reported_ratio() {
        let viewport = page();
        let region = viewport.add_region(None);
        let other = viewport.add_region(None);
        let observer = VisibilityObserver::new(viewport.handle());
        let (hits, cb) = counter();
        let (other_hits, other_cb) = counter();
        let _sub = observer.attach(region, Threshold::COUNTER, cb);
        let _other = observer.attach(other, Threshold::COUNTER, other_cb);

        assert_eq!(viewport.report_ratio(region, 0.2), 0);
        assert_eq!(viewport.report_ratio(region, 0.5), 1);
        assert_eq!(viewport.report_ratio(region, 1.0), 0);
        assert_eq!(hits.get(), 1);
        assert_eq!(other_hits.get(), 0);
    }

    #[test]
    fn test_dropped_viewport_never_fires() {
        let viewport = page();
        let region = viewport.add_region(Some(Rect::new(0.0, 0.0, 800.0, 100.0)));
        let observer = VisibilityObserver::new(viewport.handle());
        drop(viewport);

        let (hits, cb) = counter();
        let mut sub = observer.attach(region, Threshold::SECTION, cb);
        assert!(!sub.is_pending());
        sub.detach();
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_callback_may_attach_new_watch() {
        let viewport = page();
        let first = viewport.add_region(Some(Rect::new(0.0, 0.0, 800.0, 100.0)));
        let second = viewport.add_region(Some(Rect::new(0.0, 200.0, 800.0, 100.0)));
        let observer = VisibilityObserver::new(viewport.handle());

        let (hits, cb) = counter();
        let chained: Rc<RefCell<Option<VisibilitySubscription>>> = Rc::new(RefCell::new(None));
        let chained_slot = Rc::clone(&chained);
        let chained_observer = observer.clone();
        let _sub = observer.attach(first, Threshold::SECTION, move || {
            let sub = chained_observer.attach(second, Threshold::SECTION, cb);
            *chained_slot.borrow_mut() = Some(sub);
        });

        assert_eq!(viewport.process(), 1);
        assert_eq!(hits.get(), 0);
        assert_eq!(viewport.process(), 1);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_callback_detaching_later_watch_suppresses_it() {
        let viewport = page();
        let first = viewport.add_region(Some(Rect::new(0.0, 0.0, 800.0, 100.0)));
        let second = viewport.add_region(Some(Rect::new(0.0, 200.0, 800.0, 100.0)));
        let observer = VisibilityObserver::new(viewport.handle());

        let later: Rc<RefCell<Option<VisibilitySubscription>>> = Rc::new(RefCell::new(None));
        let later_in_cb = Rc::clone(&later);
        let _sub = observer.attach(first, Threshold::SECTION, move || {
            if let Some(sub) = later_in_cb.borrow_mut().as_mut() {
                sub.detach();
            }
        });
        let (hits, cb) = counter();
        *later.borrow_mut() = Some(observer.attach(second, Threshold::SECTION, cb));

        // Both regions qualify on the same frame
        assert_eq!(viewport.process(), 1);
        assert_eq!(hits.get(), 0);
        assert!(viewport.is_region_visible(first));
        assert!(!viewport.is_region_visible(second));
        assert!(later.borrow().as_ref().is_some_and(|sub| !sub.has_fired()));
        assert_eq!(viewport.watch_count(), 0);
    }

    #[test]
    fn test_callback_removing_other_region_suppresses_its_watch() {
        let viewport = Rc::new(page());
        let first = viewport.add_region(Some(Rect::new(0.0, 0.0, 800.0, 100.0)));
        let second = viewport.add_region(Some(Rect::new(0.0, 200.0, 800.0, 100.0)));
        let observer = VisibilityObserver::new(viewport.handle());

        let (first_hits, first_cb) = counter();
        let (second_hits, second_cb) = counter();
        let unmount = Rc::downgrade(&viewport);
        let _a = observer.attach(first, Threshold::SECTION, move || {
            first_cb();
            if let Some(viewport) = unmount.upgrade() {
                viewport.remove_region(second);
            }
        });
        let _b = observer.attach(second, Threshold::SECTION, second_cb);

        assert_eq!(viewport.process(), 1);
        assert_eq!(first_hits.get(), 1);
        assert_eq!(second_hits.get(), 0);
        assert!(viewport.region(second).is_none());
    }

    #[test]
    fn test_resize_and_scroll_by() {
        let viewport = page();
        let region = viewport.add_region(Some(Rect::new(0.0, 700.0, 800.0, 100.0)));
        let observer = VisibilityObserver::new(viewport.handle());
        let (hits, cb) = counter();
        let _sub = observer.attach(region, Threshold::COUNTER, cb);

        // 600px tall window: the region starts 100px below the fold
        viewport.scroll_by(50.0);
        assert_eq!(viewport.process(), 0);
        viewport.scroll_by(150.0);
        assert_eq!(viewport.process(), 1);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_set_bounds_resizes_viewport() {
        let viewport = page();
        let region = viewport.add_region(Some(Rect::new(0.0, 700.0, 800.0, 100.0)));
        let observer = VisibilityObserver::new(viewport.handle());
        let (hits, cb) = counter();
        let _sub = observer.attach(region, Threshold::COUNTER, cb);
        assert_eq!(viewport.process(), 0);

        // Growing the window to 760px shows 60% of the region
        viewport.set_bounds(Rect::new(0.0, 0.0, 800.0, 760.0));
        let fraction = viewport.visible_fraction(region).unwrap();
        assert!((fraction - 0.6).abs() < 1e-6);
        assert_eq!(viewport.process(), 1);
        assert_eq!(hits.get(), 1);
    }
}
