//! Application context: route dispatch and the single active controller
//!
//! The context is passed explicitly to whatever triggers a refresh (CLI,
//! terminal UI); it replaces a process-wide "current page" global.

use crate::api::{ApiClient, ReqwestTransport, Transport};
use crate::config::Config;
use crate::models::{Clock, SystemClock};
use crate::notify::NotificationReporter;
use crate::page::{Controller, NativePlatform, PageVariant, Platform, ShellDeps};
use anyhow::Result;
use log::{debug, info};
use std::sync::{Arc, Mutex, MutexGuard};

/// Success toast shown after a manual refresh
pub const REFRESH_MESSAGE: &str = "Dashboard refreshed";

/// Variant served when no controller is active yet
pub const DEFAULT_VARIANT: PageVariant = PageVariant::Dashboard;

/// Map a route path to the page variant serving it
pub fn route_variant(route: &str) -> PageVariant {
    let path = route.split(['?', '#']).next().unwrap_or_default();
    let path = path.trim_end_matches('/');
    match path {
        "" | "/index.html" | "/dashboard" | "/dashboard.html" => PageVariant::Dashboard,
        _ => PageVariant::Generic,
    }
}

pub struct AppContext {
    deps: ShellDeps,
    active: Mutex<Option<Arc<Controller>>>,
}

impl AppContext {
    pub fn new(deps: ShellDeps) -> Self {
        Self {
            deps,
            active: Mutex::new(None),
        }
    }

    /// Build the production context from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let notifier = NotificationReporter::new(config.ui.notification_timeouts());
        let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new(&config.api)?);
        let api = ApiClient::new(&config.api.endpoint, transport, notifier.clone())?;
        let platform: Arc<dyn Platform> = Arc::new(NativePlatform::new(&config.offline));
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        Ok(Self::new(ShellDeps {
            api,
            notifier,
            platform,
            clock,
            nav_breakpoint: config.ui.nav_breakpoint,
        }))
    }

    pub fn notifier(&self) -> &NotificationReporter {
        &self.deps.notifier
    }

    pub fn active(&self) -> Option<Arc<Controller>> {
        self.lock_active().clone()
    }

    /// Instantiate the controller for `route`, run its lifecycle and make it active
    pub async fn bootstrap(&self, route: &str) -> Arc<Controller> {
        let variant = route_variant(route);
        info!("Bootstrapping {:?} page for route {}", variant, route);
        self.activate(variant).await
    }

    /// Reload the active page, constructing the default one on first use
    pub async fn refresh(&self) -> Arc<Controller> {
        let controller = match self.active() {
            Some(controller) => {
                debug!("Refreshing active {:?} page", controller.variant());
                controller.load_data().await;
                controller
            }
            None => self.activate(DEFAULT_VARIANT).await,
        };

        controller.shell().update_timestamp();
        self.deps.notifier.success(REFRESH_MESSAGE);
        controller
    }

    async fn activate(&self, variant: PageVariant) -> Arc<Controller> {
        let controller = Arc::new(Controller::build(variant, &self.deps));
        *self.lock_active() = Some(Arc::clone(&controller));
        controller.init().await;
        controller
    }

    fn lock_active(&self) -> MutexGuard<'_, Option<Arc<Controller>>> {
        self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_variant() {
        assert_eq!(route_variant("/"), PageVariant::Dashboard);
        assert_eq!(route_variant(""), PageVariant::Dashboard);
        assert_eq!(route_variant("/index.html"), PageVariant::Dashboard);
        assert_eq!(route_variant("/dashboard/"), PageVariant::Dashboard);
        assert_eq!(route_variant("/?tab=stats"), PageVariant::Dashboard);
        assert_eq!(route_variant("/doctors.html"), PageVariant::Generic);
        assert_eq!(route_variant("/settings"), PageVariant::Generic);
    }
}
