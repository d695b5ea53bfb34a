//! UI context handed to the session controller and the gallery store.
//!
//! # Design
//! - Holds the transient UI state every action touches: popups, route, drawer
//!   and the shared `processing` flag.
//! - Passed by `&mut` so controllers never reach for ambient globals.

use crate::busy::{BusyFlag, BusyGuard};
use crate::popup::PopupOrchestrator;
use crate::routes::Route;

/// Transient UI state shared across controllers.
#[derive(Debug, Default)]
pub struct UiShell {
    /// Popup orchestrator.
    pub popups: PopupOrchestrator,
    route: Route,
    nav_drawer_open: bool,
    processing: BusyFlag,
}

impl UiShell {
    /// Create a shell on the gallery route with nothing open.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Route most recently navigated to.
    #[must_use]
    pub const fn route(&self) -> Route {
        self.route
    }

    /// Navigate to `route`.
    pub fn navigate(&mut self, route: Route) {
        if self.route != route {
            tracing::debug!(from = self.route.path(), to = route.path(), "navigate");
        }
        self.route = route;
    }

    /// Whether the mobile navigation drawer is open.
    #[must_use]
    pub const fn nav_drawer_open(&self) -> bool {
        self.nav_drawer_open
    }

    /// Flip the mobile navigation drawer.
    pub fn toggle_nav_drawer(&mut self) {
        self.nav_drawer_open = !self.nav_drawer_open;
    }

    /// Close the drawer if it is open.
    pub fn close_nav_drawer(&mut self) {
        if self.nav_drawer_open {
            self.toggle_nav_drawer();
        }
    }

    /// Handle to the `processing` flag for observers.
    #[must_use]
    pub fn processing(&self) -> BusyFlag {
        self.processing.clone()
    }

    /// Whether a mutating action is in flight.
    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.processing.is_set()
    }

    /// Claim the `processing` flag for one action; `None` while another is in flight.
    #[must_use]
    pub fn begin_processing(&self) -> Option<BusyGuard> {
        self.processing.try_begin()
    }
}
