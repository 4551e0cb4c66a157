//! Site-level UI state
//!
//! [`Site`] ties together the header, the navigator, the current page's
//! reveal controllers, the pricing buttons and the contact form. All of it is
//! explicit state owned by the site value; a route change resets everything
//! that belongs to the page being left.
//!
//! The host drives it like this each frame:
//!
//! ```ignore
//! scheduler.advance(elapsed_ms);
//! site.sync();          // apply completed navigations
//! viewport.process();   // fire visibility watches
//! ```

use crate::config::SiteConfig;
use crate::contact::ContactForm;
use crate::error::Result;
use crate::navigation::Navigator;
use crate::page::PageState;
use crate::route::Route;
use loomky_animation::SchedulerHandle;
use loomky_core::{RegionId, Threshold, VisibilityObserver};

/// Scroll offset past which the header switches to its compact style
pub const HEADER_SCROLL_OFFSET: f32 = 20.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeaderState {
    menu_open: bool,
    scrolled: bool,
}

impl HeaderState {
    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    pub fn close_menu(&mut self) {
        self.menu_open = false;
    }

    pub fn on_scroll(&mut self, y: f32) {
        self.scrolled = y > HEADER_SCROLL_OFFSET;
    }
}

pub struct Site {
    config: SiteConfig,
    observer: VisibilityObserver,
    scheduler: SchedulerHandle,
    section_threshold: Threshold,
    counter_threshold: Threshold,
    header: HeaderState,
    navigator: Navigator,
    page: PageState,
    contact: ContactForm,
    loading_plan: Option<String>,
}

impl Site {
    pub fn new(
        config: SiteConfig,
        observer: VisibilityObserver,
        scheduler: SchedulerHandle,
    ) -> Result<Self> {
        config.validate()?;
        let section_threshold = config.reveal.section()?;
        let counter_threshold = config.reveal.counter()?;
        let start = Route::default();

        Ok(Self {
            navigator: Navigator::new(scheduler.clone(), start),
            page: PageState::new(
                start,
                observer.clone(),
                scheduler.clone(),
                section_threshold,
                counter_threshold,
            ),
            contact: ContactForm::new(config.navigation.contact_submit_delay_ms),
            config,
            observer,
            scheduler,
            section_threshold,
            counter_threshold,
            header: HeaderState::default(),
            loading_plan: None,
        })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn current_route(&self) -> Route {
        self.navigator.current()
    }

    /// True while a delayed navigation is pending (buttons show a spinner)
    pub fn is_loading(&self) -> bool {
        self.navigator.is_loading()
    }

    pub fn header(&self) -> &HeaderState {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut HeaderState {
        &mut self.header
    }

    pub fn page(&self) -> &PageState {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut PageState {
        &mut self.page
    }

    pub fn contact(&self) -> &ContactForm {
        &self.contact
    }

    pub fn contact_mut(&mut self) -> &mut ContactForm {
        &mut self.contact
    }

    /// Plan whose button is showing a spinner
    ///
    /// Only set while the navigation that plan started is still pending.
    pub fn loading_plan(&self) -> Option<&str> {
        self.navigator
            .pending_route()
            .and(self.loading_plan.as_deref())
    }

    /// Follow a nav link
    pub fn navigate(&mut self, route: Route) {
        self.loading_plan = None;
        self.navigator.navigate(route);
        self.sync();
    }

    /// Header "request a demo" button
    pub fn request_demo(&mut self) -> Result<()> {
        let delay = self.config.navigation.header_demo_delay_ms;
        self.loading_plan = None;
        self.navigator.navigate_after(Route::Contact, delay)
    }

    /// In-page call-to-action button
    pub fn call_to_action(&mut self, route: Route) -> Result<()> {
        let delay = self.config.navigation.cta_delay_ms;
        self.loading_plan = None;
        self.navigator.navigate_after(route, delay)
    }

    /// Pricing plan button: spinner on that plan, then the contact page
    pub fn choose_plan(&mut self, plan: &str) -> Result<()> {
        self.call_to_action(Route::Contact)?;
        self.loading_plan = Some(plan.to_string());
        Ok(())
    }

    pub fn submit_contact(&mut self) -> Result<bool> {
        self.contact.submit(self.scheduler.clone())
    }

    /// Register the home stats banner counters on the given regions
    ///
    /// Stats and regions are paired in order; extra entries on either side
    /// are ignored. Returns the controller indices.
    pub fn mount_stats(&mut self, regions: &[RegionId]) -> Result<Vec<usize>> {
        let specs = self.config.stat_specs();
        specs
            .into_iter()
            .zip(regions)
            .map(|(spec, &region)| self.page.add_counter(region, spec))
            .collect()
    }

    /// Apply a completed navigation, resetting page-scoped state
    ///
    /// Returns the new route if the page changed.
    pub fn sync(&mut self) -> Option<Route> {
        if !self.navigator.is_loading() {
            self.loading_plan = None;
        }
        let route = self.navigator.take_route_change()?;
        self.enter(route);
        Some(route)
    }

    fn enter(&mut self, route: Route) {
        self.header.close_menu();
        self.loading_plan = None;
        self.contact.reset();
        self.page.teardown();
        self.page = PageState::new(
            route,
            self.observer.clone(),
            self.scheduler.clone(),
            self.section_threshold,
            self.counter_threshold,
        );
        tracing::info!(route = %route, "entered page");
    }
}
