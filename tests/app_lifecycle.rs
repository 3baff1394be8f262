//! Bootstrap, refresh, install prompt and navigation through the app context

mod common;

use async_trait::async_trait;
use clinic_dashboard::app::{AppContext, REFRESH_MESSAGE};
use clinic_dashboard::notify::ToastLevel;
use clinic_dashboard::page::{
    Controller, DeferredPrompt, InstallEvent, InstallOutcome, InstallState, Lifecycle, PageVariant,
    Resolution,
};
use clinic_dashboard::render::{Content, targets};
use common::{ScriptedPlatform, ScriptedTransport, deps, deps_on};
use serde_json::json;

struct UserChoice(InstallOutcome);

#[async_trait]
impl DeferredPrompt for UserChoice {
    async fn prompt(&self) -> InstallOutcome {
        self.0
    }
}

#[tokio::test]
async fn test_bootstrap_dispatches_on_route() {
    let ctx = AppContext::new(deps(ScriptedTransport::new()));

    let dashboard = ctx.bootstrap("/").await;
    assert_eq!(dashboard.variant(), PageVariant::Dashboard);
    assert_eq!(dashboard.shell().lifecycle(), Lifecycle::Ready);

    let generic = ctx.bootstrap("/doctors.html").await;
    assert_eq!(generic.variant(), PageVariant::Generic);
    assert_eq!(ctx.active().unwrap().variant(), PageVariant::Generic);
    assert!(!generic.page().has(targets::DOCTOR_COUNT));
}

#[tokio::test]
async fn test_generic_page_makes_no_calls() {
    let transport = ScriptedTransport::new();
    let ctx = AppContext::new(deps(transport.clone()));
    let page = ctx.bootstrap("/settings").await;

    assert!(transport.requests().is_empty());
    let stamp = page.page().content(targets::LAST_UPDATED).unwrap();
    assert_eq!(stamp.as_text(), Some("Last updated: 09:30:00"));
}

#[tokio::test]
async fn test_lifecycle_runs_once() {
    let transport = ScriptedTransport::new();
    let ctx = AppContext::new(deps(transport.clone()));
    let controller = ctx.bootstrap("/").await;
    let calls = transport.requests().len();

    assert!(!controller.init().await);
    assert_eq!(transport.requests().len(), calls);
}

#[tokio::test]
async fn test_refresh_without_active_controller_builds_dashboard() {
    let transport = ScriptedTransport::new();
    transport.records("getDoctors", vec![json!({})]);
    let ctx = AppContext::new(deps(transport.clone()));
    assert!(ctx.active().is_none());

    let controller = ctx.refresh().await;

    assert_eq!(controller.variant(), PageVariant::Dashboard);
    assert!(ctx.active().is_some());
    assert_eq!(
        controller.page().content(targets::DOCTOR_COUNT).unwrap().as_text(),
        Some("1")
    );
    let toasts = ctx.notifier().active();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].level, ToastLevel::Success);
    assert_eq!(toasts[0].message, REFRESH_MESSAGE);
}

#[tokio::test]
async fn test_refresh_reloads_active_controller() {
    let transport = ScriptedTransport::new();
    let ctx = AppContext::new(deps(transport.clone()));
    let first = ctx.bootstrap("/").await;
    let calls_after_bootstrap = transport.requests().len();

    transport.records("getClinics", vec![json!({}), json!({}), json!({})]);
    first.page().write(targets::LAST_UPDATED, Content::Blank).unwrap();
    assert!(ctx.notifier().active().is_empty());
    let refreshed = ctx.refresh().await;

    assert!(std::sync::Arc::ptr_eq(&first, &refreshed));
    assert_eq!(transport.requests().len(), calls_after_bootstrap * 2);
    assert_eq!(
        refreshed.page().content(targets::CLINIC_COUNT).unwrap().as_text(),
        Some("3")
    );
    assert_eq!(
        refreshed.page().content(targets::LAST_UPDATED).unwrap().as_text(),
        Some("Last updated: 09:30:00")
    );
    let toasts = ctx.notifier().active();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].level, ToastLevel::Success);
    assert_eq!(toasts[0].message, REFRESH_MESSAGE);
    if let Controller::Dashboard(dashboard) = refreshed.as_ref() {
        assert_eq!(dashboard.snapshot().unwrap().clinic_count, 3);
    } else {
        panic!("expected dashboard");
    }
}

#[tokio::test]
async fn test_install_prompt_through_shell() {
    let ctx = AppContext::new(deps(ScriptedTransport::new()));
    let controller = ctx.bootstrap("/").await;
    let shell = controller.shell();
    let page = controller.page();

    assert!(!page.is_visible(targets::INSTALL_BUTTON));
    assert_eq!(shell.activate_install().await, None);

    shell.installable(Box::new(UserChoice(InstallOutcome::Accepted)));
    assert_eq!(shell.install_state(), InstallState::Captured);
    assert!(page.is_visible(targets::INSTALL_BUTTON));

    let state = shell.activate_install().await;
    assert_eq!(state, Some(InstallState::Resolved(Resolution::Accepted)));
    assert!(!page.is_visible(targets::INSTALL_BUTTON));
}

#[tokio::test]
async fn test_installed_signal_hides_affordance() {
    let ctx = AppContext::new(deps(ScriptedTransport::new()));
    let controller = ctx.bootstrap("/").await;
    let shell = controller.shell();

    shell.installable(Box::new(UserChoice(InstallOutcome::Dismissed)));
    assert!(controller.page().is_visible(targets::INSTALL_BUTTON));

    shell.installed();
    assert_eq!(shell.install_state(), InstallState::Resolved(Resolution::Installed));
    assert!(!controller.page().is_visible(targets::INSTALL_BUTTON));
}

#[tokio::test]
async fn test_platform_install_signals_reach_the_shell() {
    let (platform, events) = ScriptedPlatform::new();
    events
        .send(InstallEvent::Installable(Box::new(UserChoice(InstallOutcome::Dismissed))))
        .unwrap();
    let ctx = AppContext::new(deps_on(ScriptedTransport::new(), platform));

    let controller = ctx.bootstrap("/").await;
    let shell = controller.shell();
    assert_eq!(shell.install_state(), InstallState::Captured);
    assert!(controller.page().is_visible(targets::INSTALL_BUTTON));

    let state = shell.activate_install().await;
    assert_eq!(state, Some(InstallState::Resolved(Resolution::Dismissed)));

    // Signals after wiring are applied by the listener task
    events
        .send(InstallEvent::Installable(Box::new(UserChoice(InstallOutcome::Accepted))))
        .unwrap();
    for _ in 0..10 {
        if shell.install_state() == InstallState::Captured {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(shell.install_state(), InstallState::Captured);

    events.send(InstallEvent::Installed).unwrap();
    for _ in 0..10 {
        if shell.install_state() == InstallState::Resolved(Resolution::Installed) {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(shell.install_state(), InstallState::Resolved(Resolution::Installed));
    assert!(!controller.page().is_visible(targets::INSTALL_BUTTON));
}

#[tokio::test]
async fn test_navigation_toggle_and_collapse() {
    let ctx = AppContext::new(deps(ScriptedTransport::new()));
    let controller = ctx.bootstrap("/").await;
    let shell = controller.shell();

    assert!(!controller.page().is_visible(targets::NAV_MENU));
    assert!(shell.toggle_navigation());
    assert!(controller.page().is_visible(targets::NAV_MENU));

    shell.outside_interaction(1024);
    assert!(shell.navigation_open());

    shell.outside_interaction(600);
    assert!(!shell.navigation_open());
    assert!(!controller.page().is_visible(targets::NAV_MENU));
}

#[tokio::test]
async fn test_offline_registration_skipped_when_unsupported() {
    let ctx = AppContext::new(deps(ScriptedTransport::new()));
    let controller = ctx.bootstrap("/").await;
    assert!(controller.shell().register_offline_assets().is_none());
}
