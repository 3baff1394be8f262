//! Page controllers
//!
//! Every page variant wraps a [`PageShell`] that owns the generic wiring
//! (navigation, install prompt, offline assets, timestamp). Variants differ
//! only in [`Controller::load_data`].

pub mod install;
pub mod navigation;
pub mod platform;
pub mod shell;

pub use install::{DeferredPrompt, InstallEvent, InstallOutcome, InstallPrompt, InstallState, Resolution};
pub use navigation::{NAV_BREAKPOINT, NavMenu};
pub use platform::{INSTALL_MARKER, NativeInstallPrompt, NativePlatform, OFFLINE_MANIFEST_PATH, Platform};
pub use shell::{PageShell, ShellDeps};

use crate::dashboard::DashboardController;
use crate::render::Page;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Lifecycle {
    Constructed,
    WiringEventListeners,
    LoadingData,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PageVariant {
    Generic,
    Dashboard,
}

/// A page without data of its own
pub struct GenericPage {
    shell: PageShell,
}

impl GenericPage {
    pub fn new(deps: &ShellDeps) -> Self {
        Self {
            shell: PageShell::new(deps, Page::generic()),
        }
    }
}

/// The closed set of page controllers
pub enum Controller {
    Generic(GenericPage),
    Dashboard(DashboardController),
}

impl Controller {
    pub fn build(variant: PageVariant, deps: &ShellDeps) -> Self {
        match variant {
            PageVariant::Generic => Self::Generic(GenericPage::new(deps)),
            PageVariant::Dashboard => Self::Dashboard(DashboardController::new(deps)),
        }
    }

    pub fn variant(&self) -> PageVariant {
        match self {
            Self::Generic(_) => PageVariant::Generic,
            Self::Dashboard(_) => PageVariant::Dashboard,
        }
    }

    pub fn shell(&self) -> &PageShell {
        match self {
            Self::Generic(page) => &page.shell,
            Self::Dashboard(dashboard) => dashboard.shell(),
        }
    }

    pub fn page(&self) -> &Page {
        self.shell().page()
    }

    /// Run the lifecycle once: wire listeners, load data, stamp the time.
    /// Returns false when it had already run.
    pub async fn init(&self) -> bool {
        let shell = self.shell();
        if !shell.begin_lifecycle() {
            return false;
        }
        shell.wire_event_listeners();

        shell.advance(Lifecycle::LoadingData);
        self.load_data().await;
        shell.update_timestamp();

        shell.advance(Lifecycle::Ready);
        true
    }

    pub async fn load_data(&self) {
        match self {
            Self::Generic(_) => {}
            Self::Dashboard(dashboard) => dashboard.load_data().await,
        }
    }
}
