//! Host platform capabilities the page shell may use

use super::install::{DeferredPrompt, InstallEvent, InstallOutcome};
use crate::config::OfflineConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info, warn};
use std::path::PathBuf;
use tokio::sync::mpsc::{self, UnboundedReceiver};

/// Asset manifest registered for offline use
pub const OFFLINE_MANIFEST_PATH: &str = "./sw.js";

/// File recording a completed native install, under the local data directory
pub const INSTALL_MARKER: &str = "installed";

#[async_trait]
pub trait Platform: Send + Sync {
    fn supports_offline_assets(&self) -> bool;

    /// Register the offline asset manifest, returning the registered scope
    async fn register_offline_assets(&self, manifest_path: &str) -> Result<String>;

    /// Subscribe to installability and installed signals.
    /// `None` when the platform never emits any.
    fn install_events(&self) -> Option<UnboundedReceiver<InstallEvent>>;
}

/// Platform for the native binary: offline assets live in a configured directory.
/// The app is installable once those assets are configured, and counts as
/// installed once the install marker exists.
#[derive(Debug, Clone, Default)]
pub struct NativePlatform {
    asset_dir: Option<PathBuf>,
    install_marker: Option<PathBuf>,
}

impl NativePlatform {
    pub fn new(config: &OfflineConfig) -> Self {
        let install_marker =
            dirs::data_local_dir().map(|dir| dir.join("clinic-dashboard").join(INSTALL_MARKER));
        if install_marker.is_none() {
            debug!("No local data directory; install prompt disabled");
        }
        Self {
            asset_dir: config.asset_dir.clone(),
            install_marker,
        }
    }

    pub fn with_install_marker(mut self, marker: PathBuf) -> Self {
        self.install_marker = Some(marker);
        self
    }
}

/// Native install: the user's acceptance writes the install marker
#[derive(Debug, Clone)]
pub struct NativeInstallPrompt {
    marker: PathBuf,
}

#[async_trait]
impl DeferredPrompt for NativeInstallPrompt {
    async fn prompt(&self) -> InstallOutcome {
        let written = async {
            if let Some(dir) = self.marker.parent() {
                tokio::fs::create_dir_all(dir)
                    .await
                    .with_context(|| format!("Failed to create install directory: {:?}", dir))?;
            }
            tokio::fs::write(&self.marker, env!("CARGO_PKG_VERSION"))
                .await
                .with_context(|| format!("Failed to write install marker: {:?}", self.marker))
        };

        match written.await {
            Ok(()) => {
                info!("Install marker written to {:?}", self.marker);
                InstallOutcome::Accepted
            }
            Err(e) => {
                warn!("Install failed: {:#}", e);
                InstallOutcome::Dismissed
            }
        }
    }
}

#[async_trait]
impl Platform for NativePlatform {
    fn supports_offline_assets(&self) -> bool {
        self.asset_dir.is_some()
    }

    async fn register_offline_assets(&self, manifest_path: &str) -> Result<String> {
        let asset_dir = self
            .asset_dir
            .as_ref()
            .context("Offline assets are not configured")?;
        let manifest = asset_dir.join(manifest_path.trim_start_matches("./"));
        debug!("Registering offline asset manifest {:?}", manifest);

        let metadata = tokio::fs::metadata(&manifest)
            .await
            .with_context(|| format!("Offline asset manifest not found: {:?}", manifest))?;
        anyhow::ensure!(metadata.is_file(), "Offline asset manifest is not a file: {:?}", manifest);

        Ok(asset_dir.display().to_string())
    }

    fn install_events(&self) -> Option<UnboundedReceiver<InstallEvent>> {
        self.asset_dir.as_ref()?;
        let marker = self.install_marker.clone()?;

        let event = if marker.exists() {
            InstallEvent::Installed
        } else {
            InstallEvent::Installable(Box::new(NativeInstallPrompt { marker }))
        };
        debug!("Native install signal: {:?}", event);

        // The sender drops here; the receiver drains this one event and closes
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(event).ok()?;
        Some(rx)
    }
}
