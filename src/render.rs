//! Render surface: a set of named targets the controllers write into
//!
//! Writes are whole-target overwrites. A page only holds the targets it was
//! built with; writing to an unknown id is a [`RenderError::MissingTarget`]
//! for [`Page::write`] and a silent no-op for [`Page::write_if_present`].

use log::trace;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

/// Stable render target identifiers
pub mod targets {
    pub const DOCTOR_COUNT: &str = "doctor-count";
    pub const CLINIC_COUNT: &str = "clinic-count";
    pub const ROSTER_COUNT: &str = "roster-count";
    pub const NOTIFICATION_COUNT: &str = "notification-count";
    pub const TODAY_SCHEDULE: &str = "today-schedule";
    pub const ON_CALL_TODAY: &str = "on-call-today";
    pub const LAST_UPDATED: &str = "last-updated";
    pub const INSTALL_BUTTON: &str = "install-btn";
    pub const NAV_TOGGLE: &str = "nav-toggle";
    pub const NAV_MENU: &str = "nav-menu";
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("render target '{0}' not found")]
    MissingTarget(String),
    #[error("malformed record: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BadgeTone {
    Success,
    Warning,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: String,
    pub tone: BadgeTone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItem {
    pub title: String,
    pub subtitle: Option<String>,
    pub details: Vec<String>,
    pub badge: Option<Badge>,
}

impl ListItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            details: Vec::new(),
            badge: None,
        }
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }

    pub fn badge(mut self, label: impl Into<String>, tone: BadgeTone) -> Self {
        self.badge = Some(Badge {
            label: label.into(),
            tone,
        });
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlaceholderKind {
    Empty,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Content {
    Blank,
    Text(String),
    Items(Vec<ListItem>),
    Placeholder { kind: PlaceholderKind, message: String },
}

impl Content {
    pub fn empty(message: impl Into<String>) -> Self {
        Self::Placeholder {
            kind: PlaceholderKind::Empty,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Placeholder {
            kind: PlaceholderKind::Error,
            message: message.into(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    pub content: Content,
    pub visible: bool,
}

impl Default for Target {
    fn default() -> Self {
        Self {
            content: Content::Blank,
            visible: true,
        }
    }
}

/// Shared handle to the page's render targets (cheap clone)
#[derive(Debug, Clone, Default)]
pub struct Page {
    targets: Arc<Mutex<BTreeMap<String, Target>>>,
}

impl Page {
    pub fn with_targets<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        let targets = ids
            .into_iter()
            .map(|id| (id.to_string(), Target::default()))
            .collect();
        Self {
            targets: Arc::new(Mutex::new(targets)),
        }
    }

    /// Every target the dashboard page carries
    pub fn dashboard() -> Self {
        use self::targets::*;
        Self::with_targets([
            DOCTOR_COUNT,
            CLINIC_COUNT,
            ROSTER_COUNT,
            NOTIFICATION_COUNT,
            TODAY_SCHEDULE,
            ON_CALL_TODAY,
            LAST_UPDATED,
            INSTALL_BUTTON,
            NAV_TOGGLE,
            NAV_MENU,
        ])
    }

    /// Targets shared by every page variant
    pub fn generic() -> Self {
        use self::targets::*;
        Self::with_targets([LAST_UPDATED, INSTALL_BUTTON, NAV_TOGGLE, NAV_MENU])
    }

    pub fn has(&self, id: &str) -> bool {
        self.lock().contains_key(id)
    }

    pub fn write(&self, id: &str, content: Content) -> Result<(), RenderError> {
        let mut targets = self.lock();
        let target = targets
            .get_mut(id)
            .ok_or_else(|| RenderError::MissingTarget(id.to_string()))?;
        trace!("render {} <- {:?}", id, content);
        target.content = content;
        Ok(())
    }

    /// Write when the target exists; otherwise do nothing
    pub fn write_if_present(&self, id: &str, content: Content) -> bool {
        self.write(id, content).is_ok()
    }

    pub fn set_visible(&self, id: &str, visible: bool) -> bool {
        match self.lock().get_mut(id) {
            Some(target) => {
                target.visible = visible;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: &str) -> Option<Target> {
        self.lock().get(id).cloned()
    }

    pub fn content(&self, id: &str) -> Option<Content> {
        self.get(id).map(|t| t.content)
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.get(id).is_some_and(|t| t.visible)
    }

    /// Copy of all targets, ordered by id
    pub fn snapshot(&self) -> BTreeMap<String, Target> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Target>> {
        self.targets.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
