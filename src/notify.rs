//! Transient toast notifications
//!
//! Every toast owns its own removal timer. Manual dismissal removes the toast
//! right away; the timer firing later finds nothing to remove and returns.

use log::{debug, warn};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Default lifetime of an error toast
pub const ERROR_TIMEOUT: Duration = Duration::from_millis(5000);

/// Default lifetime of a success toast
pub const SUCCESS_TIMEOUT: Duration = Duration::from_millis(3000);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ToastLevel {
    Success,
    Error,
}

impl ToastLevel {
    pub fn icon(self) -> &'static str {
        match self {
            Self::Success => "✓",
            Self::Error => "✗",
        }
    }
}

pub type ToastId = u64;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub id: ToastId,
    pub level: ToastLevel,
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NotificationTimeouts {
    pub error: Duration,
    pub success: Duration,
}

impl Default for NotificationTimeouts {
    fn default() -> Self {
        Self {
            error: ERROR_TIMEOUT,
            success: SUCCESS_TIMEOUT,
        }
    }
}

#[derive(Debug, Default)]
struct ReporterInner {
    next_id: ToastId,
    active: Vec<Toast>,
}

/// Shared handle to the toast stack (cheap clone)
#[derive(Debug, Clone)]
pub struct NotificationReporter {
    inner: Arc<Mutex<ReporterInner>>,
    timeouts: NotificationTimeouts,
}

impl NotificationReporter {
    pub fn new(timeouts: NotificationTimeouts) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ReporterInner::default())),
            timeouts,
        }
    }

    /// Show an error toast
    pub fn report(&self, message: impl Into<String>) -> ToastId {
        self.push(ToastLevel::Error, message.into(), self.timeouts.error)
    }

    /// Show a success toast
    pub fn success(&self, message: impl Into<String>) -> ToastId {
        self.push(ToastLevel::Success, message.into(), self.timeouts.success)
    }

    /// Remove a toast before its timer fires. Returns whether it was still shown.
    pub fn dismiss(&self, id: ToastId) -> bool {
        let removed = remove_toast(&self.inner, id);
        if removed {
            debug!("Toast {} dismissed", id);
        }
        removed
    }

    /// Dismiss the most recent toast, if any
    pub fn dismiss_latest(&self) -> bool {
        let latest = self.lock().active.last().map(|t| t.id);
        latest.is_some_and(|id| self.dismiss(id))
    }

    /// Toasts currently shown, oldest first
    pub fn active(&self) -> Vec<Toast> {
        self.lock().active.clone()
    }

    fn push(&self, level: ToastLevel, message: String, timeout: Duration) -> ToastId {
        let id = {
            let mut inner = self.lock();
            inner.next_id += 1;
            let id = inner.next_id;
            inner.active.push(Toast { id, level, message });
            id
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let inner = Arc::clone(&self.inner);
                handle.spawn(async move {
                    tokio::time::sleep(timeout).await;
                    if remove_toast(&inner, id) {
                        debug!("Toast {} expired after {:?}", id, timeout);
                    }
                });
            }
            Err(_) => warn!("No async runtime; toast {} will not auto-dismiss", id),
        }

        id
    }

    fn lock(&self) -> MutexGuard<'_, ReporterInner> {
        lock_inner(&self.inner)
    }
}

fn lock_inner(inner: &Mutex<ReporterInner>) -> MutexGuard<'_, ReporterInner> {
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn remove_toast(inner: &Mutex<ReporterInner>, id: ToastId) -> bool {
    let mut inner = lock_inner(inner);
    let before = inner.active.len();
    inner.active.retain(|t| t.id != id);
    inner.active.len() != before
}
