//! Page-scoped reveal state
//!
//! Each page owns the reveal controllers for its sections and counters.
//! Navigating away tears the whole set down, so nothing from the previous
//! page keeps ticking.

use crate::error::Result;
use crate::reveal::{RevealController, RevealOptions};
use crate::route::Route;
use loomky_animation::{CounterSpec, SchedulerHandle};
use loomky_core::{RegionId, Threshold, VisibilityObserver};

pub struct PageState {
    route: Route,
    observer: VisibilityObserver,
    scheduler: SchedulerHandle,
    section_threshold: Threshold,
    counter_threshold: Threshold,
    controllers: Vec<RevealController>,
}

impl PageState {
    pub fn new(
        route: Route,
        observer: VisibilityObserver,
        scheduler: SchedulerHandle,
        section_threshold: Threshold,
        counter_threshold: Threshold,
    ) -> Self {
        Self {
            route,
            observer,
            scheduler,
            section_threshold,
            counter_threshold,
            controllers: Vec::new(),
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    /// Register a section that fades in on first view. Returns its index.
    pub fn add_section(&mut self, region: RegionId) -> Result<usize> {
        self.push(
            region,
            RevealOptions::section().threshold(self.section_threshold),
        )
    }

    /// Register an animated counter. Returns its index.
    pub fn add_counter(&mut self, region: RegionId, spec: CounterSpec) -> Result<usize> {
        self.push(
            region,
            RevealOptions::counter(spec).threshold(self.counter_threshold),
        )
    }

    fn push(&mut self, region: RegionId, options: RevealOptions) -> Result<usize> {
        let controller =
            RevealController::create(&self.observer, self.scheduler.clone(), region, options)?;
        self.controllers.push(controller);
        Ok(self.controllers.len() - 1)
    }

    pub fn controller(&self, index: usize) -> Option<&RevealController> {
        self.controllers.get(index)
    }

    pub fn controllers(&self) -> &[RevealController] {
        &self.controllers
    }

    pub fn revealed_count(&self) -> usize {
        self.controllers.iter().filter(|c| c.is_revealed()).count()
    }

    /// Tear down and forget every controller on this page
    pub fn teardown(&mut self) {
        let count = self.controllers.len();
        for controller in &mut self.controllers {
            controller.teardown();
        }
        self.controllers.clear();
        if count > 0 {
            tracing::debug!(route = %self.route, controllers = count, "page torn down");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loomky_animation::TickScheduler;
    use loomky_core::{Rect, Viewport};

    #[test]
    fn test_sections_and_counters() {
        let viewport = Viewport::new(Rect::new(0.0, 0.0, 1280.0, 720.0));
        let scheduler = TickScheduler::new();
        let mut page = PageState::new(
            Route::Home,
            VisibilityObserver::new(viewport.handle()),
            scheduler.handle(),
            Threshold::SECTION,
            Threshold::COUNTER,
        );

        let hero = viewport.add_region(Some(Rect::new(0.0, 0.0, 1280.0, 600.0)));
        let stats = viewport.add_region(Some(Rect::new(0.0, 900.0, 1280.0, 200.0)));
        let a = page.add_section(hero).unwrap();
        let b = page.add_counter(stats, CounterSpec::new(35).prefix("+").suffix("%")).unwrap();
        assert_eq!((a, b), (0, 1));

        viewport.process();
        assert_eq!(page.revealed_count(), 1);
        assert_eq!(page.controller(b).and_then(|c| c.display()).as_deref(), Some("+0%"));

        viewport.scroll_to(500.0);
        viewport.process();
        scheduler.advance(2100);
        assert_eq!(page.revealed_count(), 2);
        assert_eq!(page.controller(b).and_then(|c| c.display()).as_deref(), Some("+35%"));

        page.teardown();
        assert!(page.controllers().is_empty());
        assert_eq!(viewport.watch_count(), 0);
    }

    #[test]
    fn test_teardown_stops_running_counters() {
        let viewport = Viewport::new(Rect::new(0.0, 0.0, 1280.0, 720.0));
        let scheduler = TickScheduler::new();
        let mut page = PageState::new(
            Route::Home,
            VisibilityObserver::new(viewport.handle()),
            scheduler.handle(),
            Threshold::SECTION,
            Threshold::COUNTER,
        );
        for i in 0..3 {
            let region = viewport.add_region(Some(Rect::new(i as f32 * 300.0, 100.0, 250.0, 80.0)));
            page.add_counter(region, CounterSpec::new(1000)).unwrap();
        }
        viewport.process();
        scheduler.advance(100);
        assert_eq!(scheduler.timer_count(), 3);

        page.teardown();
        assert_eq!(scheduler.timer_count(), 0);
    }
}
