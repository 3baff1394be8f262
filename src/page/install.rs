//! Install prompt state machine
//!
//! `Idle → Captured → Shown → Resolved`. The platform's deferred prompt is
//! held only while `Captured`/`Shown` and dropped on resolution. An
//! `installed` signal forces `Resolved(Installed)` from any state.

use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallOutcome {
    Accepted,
    Dismissed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Accepted,
    Dismissed,
    Installed,
}

impl From<InstallOutcome> for Resolution {
    fn from(outcome: InstallOutcome) -> Self {
        match outcome {
            InstallOutcome::Accepted => Self::Accepted,
            InstallOutcome::Dismissed => Self::Dismissed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", content = "resolution", rename_all = "lowercase")]
pub enum InstallState {
    #[default]
    Idle,
    Captured,
    Shown,
    Resolved(Resolution),
}

/// A platform install prompt whose display was deferred
#[async_trait]
pub trait DeferredPrompt: Send + Sync {
    /// Show the prompt and wait for the user's choice
    async fn prompt(&self) -> InstallOutcome;
}

/// Install signals a platform emits
pub enum InstallEvent {
    /// The app became installable; the prompt is held until the user asks for it
    Installable(Box<dyn DeferredPrompt>),
    Installed,
}

impl std::fmt::Debug for InstallEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Installable(_) => f.write_str("Installable"),
            Self::Installed => f.write_str("Installed"),
        }
    }
}

#[derive(Default)]
pub struct InstallPrompt {
    state: InstallState,
    deferred: Option<Box<dyn DeferredPrompt>>,
}

impl std::fmt::Debug for InstallPrompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstallPrompt")
            .field("state", &self.state)
            .field("has_deferred", &self.deferred.is_some())
            .finish()
    }
}

impl InstallPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> InstallState {
        self.state
    }

    /// Whether the install affordance should be shown
    pub fn affordance_visible(&self) -> bool {
        self.state == InstallState::Captured
    }

    /// Platform reports the app as installable. Returns whether it was captured.
    pub fn capture(&mut self, prompt: Box<dyn DeferredPrompt>) -> bool {
        match self.state {
            InstallState::Idle | InstallState::Resolved(Resolution::Dismissed) => {
                debug!("Install prompt captured");
                self.deferred = Some(prompt);
                self.state = InstallState::Captured;
                true
            }
            state => {
                debug!("Ignoring install prompt in state {:?}", state);
                false
            }
        }
    }

    /// User triggered the affordance: hand out the deferred prompt to run
    pub fn begin_prompt(&mut self) -> Option<Box<dyn DeferredPrompt>> {
        if self.state != InstallState::Captured {
            return None;
        }
        let prompt = self.deferred.take()?;
        self.state = InstallState::Shown;
        Some(prompt)
    }

    /// Record the user's choice for a prompt started with [`begin_prompt`](Self::begin_prompt)
    pub fn finish_prompt(&mut self, outcome: InstallOutcome) {
        if self.state != InstallState::Shown {
            debug!("Install outcome {:?} arrived in state {:?}", outcome, self.state);
            return;
        }
        info!("User {:?} the install prompt", outcome);
        self.deferred = None;
        self.state = InstallState::Resolved(outcome.into());
    }

    /// Platform reports the app as installed
    pub fn installed(&mut self) {
        info!("App installed");
        self.deferred = None;
        self.state = InstallState::Resolved(Resolution::Installed);
    }
}
