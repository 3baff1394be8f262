//! Page-independent lifecycle shared by every controller variant

use super::install::{DeferredPrompt, InstallEvent, InstallPrompt, InstallState};
use super::navigation::NavMenu;
use super::platform::{OFFLINE_MANIFEST_PATH, Platform};
use super::Lifecycle;
use crate::api::ApiClient;
use crate::models::Clock;
use crate::notify::NotificationReporter;
use crate::render::{Content, Page, targets};
use log::{debug, info, warn};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc::error::TryRecvError;
use tokio::task::JoinHandle;

/// Collaborators every page shell is built from (cheap clone)
#[derive(Clone)]
pub struct ShellDeps {
    pub api: ApiClient,
    pub notifier: NotificationReporter,
    pub platform: Arc<dyn Platform>,
    pub clock: Arc<dyn Clock>,
    pub nav_breakpoint: u16,
}

pub struct PageShell {
    api: ApiClient,
    notifier: NotificationReporter,
    page: Page,
    platform: Arc<dyn Platform>,
    clock: Arc<dyn Clock>,
    nav: Mutex<NavMenu>,
    install: InstallSlot,
    lifecycle: Mutex<Lifecycle>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Install prompt state and the page showing its affordance (cheap clone)
#[derive(Clone)]
struct InstallSlot {
    prompt: Arc<Mutex<InstallPrompt>>,
    page: Page,
}

impl InstallSlot {
    fn lock(&self) -> MutexGuard<'_, InstallPrompt> {
        lock(&self.prompt)
    }

    fn apply(&self, event: InstallEvent) {
        let mut prompt = self.lock();
        match event {
            InstallEvent::Installable(deferred) => {
                prompt.capture(deferred);
            }
            InstallEvent::Installed => prompt.installed(),
        }
        self.sync(&prompt);
    }

    fn sync(&self, prompt: &InstallPrompt) {
        self.page
            .set_visible(targets::INSTALL_BUTTON, prompt.affordance_visible());
    }
}

impl PageShell {
    pub fn new(deps: &ShellDeps, page: Page) -> Self {
        Self {
            api: deps.api.clone(),
            notifier: deps.notifier.clone(),
            platform: Arc::clone(&deps.platform),
            clock: Arc::clone(&deps.clock),
            nav: Mutex::new(NavMenu::new(deps.nav_breakpoint)),
            install: InstallSlot {
                prompt: Arc::new(Mutex::new(InstallPrompt::new())),
                page: page.clone(),
            },
            lifecycle: Mutex::new(Lifecycle::Constructed),
            page,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn notifier(&self) -> &NotificationReporter {
        &self.notifier
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        *lock(&self.lifecycle)
    }

    /// Leave `Constructed`. Returns false when the lifecycle already ran.
    pub(crate) fn begin_lifecycle(&self) -> bool {
        let mut lifecycle = lock(&self.lifecycle);
        if *lifecycle != Lifecycle::Constructed {
            debug!("Lifecycle already at {:?}, not running again", *lifecycle);
            return false;
        }
        *lifecycle = Lifecycle::WiringEventListeners;
        true
    }

    pub(crate) fn advance(&self, next: Lifecycle) {
        let mut lifecycle = lock(&self.lifecycle);
        debug!("Lifecycle {:?} -> {:?}", *lifecycle, next);
        *lifecycle = next;
    }

    /// Wire navigation, install prompt and offline assets
    pub(crate) fn wire_event_listeners(&self) {
        self.setup_navigation();
        self.wire_install_prompt();
        self.register_offline_assets();
    }

    pub fn setup_navigation(&self) {
        if !(self.page.has(targets::NAV_TOGGLE) && self.page.has(targets::NAV_MENU)) {
            debug!("No navigation on this page");
            return;
        }
        let mut nav = lock(&self.nav);
        nav.wire();
        self.page.set_visible(targets::NAV_MENU, nav.is_open());
    }

    pub fn toggle_navigation(&self) -> bool {
        let mut nav = lock(&self.nav);
        let open = nav.toggle();
        self.page.set_visible(targets::NAV_MENU, open);
        open
    }

    pub fn outside_interaction(&self, viewport_width: u16) {
        let mut nav = lock(&self.nav);
        if nav.outside_interaction(viewport_width) {
            self.page.set_visible(targets::NAV_MENU, false);
        }
    }

    pub fn navigation_open(&self) -> bool {
        lock(&self.nav).is_open()
    }

    /// Request offline asset registration without waiting for it.
    /// The outcome is only logged.
    pub fn register_offline_assets(&self) -> Option<JoinHandle<bool>> {
        if !self.platform.supports_offline_assets() {
            debug!("Offline assets not supported on this platform");
            return None;
        }

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!("No async runtime; skipping offline asset registration");
                return None;
            }
        };

        let platform = Arc::clone(&self.platform);
        Some(handle.spawn(async move {
            match platform.register_offline_assets(OFFLINE_MANIFEST_PATH).await {
                Ok(scope) => {
                    info!("Offline assets registered: {}", scope);
                    true
                }
                Err(e) => {
                    warn!("Offline asset registration failed: {:#}", e);
                    false
                }
            }
        }))
    }

    /// Subscribe to the platform's install signals. Signals already pending
    /// are applied before returning; later ones are applied by the returned task.
    pub fn wire_install_prompt(&self) -> Option<JoinHandle<()>> {
        self.install.sync(&self.install.lock());

        let Some(mut events) = self.platform.install_events() else {
            debug!("Platform emits no install signals");
            return None;
        };

        loop {
            match events.try_recv() {
                Ok(event) => self.install.apply(event),
                Err(TryRecvError::Disconnected) => return None,
                Err(TryRecvError::Empty) => break,
            }
        }

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!("No async runtime; later install signals are dropped");
                return None;
            }
        };

        let slot = self.install.clone();
        Some(handle.spawn(async move {
            while let Some(event) = events.recv().await {
                debug!("Install signal: {:?}", event);
                slot.apply(event);
            }
        }))
    }

    /// Platform signals installability
    pub fn installable(&self, prompt: Box<dyn DeferredPrompt>) {
        self.install.apply(InstallEvent::Installable(prompt));
    }

    /// User activated the install affordance
    pub async fn activate_install(&self) -> Option<InstallState> {
        let prompt = {
            let mut install = self.install.lock();
            let prompt = install.begin_prompt();
            self.install.sync(&install);
            prompt?
        };

        let outcome = prompt.prompt().await;

        let mut install = self.install.lock();
        install.finish_prompt(outcome);
        self.install.sync(&install);
        Some(install.state())
    }

    /// Platform reports the app as installed
    pub fn installed(&self) {
        self.install.apply(InstallEvent::Installed);
    }

    pub fn install_state(&self) -> InstallState {
        self.install.lock().state()
    }

    pub fn update_timestamp(&self) {
        let now = self.clock.now();
        let stamp = format!("Last updated: {}", now.format("%H:%M:%S"));
        if !self.page.write_if_present(targets::LAST_UPDATED, Content::Text(stamp)) {
            debug!("No timestamp target on this page");
        }
    }
}
