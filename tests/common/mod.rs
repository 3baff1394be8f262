//! Shared fixtures: a scripted transport, a scripted platform and a frozen clock

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Local, TimeZone};
use clinic_dashboard::api::{ApiClient, RawResponse, Transport, TransportError};
use clinic_dashboard::models::{Clock, FixedClock};
use clinic_dashboard::notify::{NotificationReporter, NotificationTimeouts};
use clinic_dashboard::page::{InstallEvent, NativePlatform, Platform, ShellDeps};
use reqwest::Url;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

#[derive(Clone)]
pub enum Reply {
    Records(Vec<Value>),
    Body(u16, String),
    Unreachable,
}

#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<HashMap<String, Reply>>,
    delays: Mutex<HashMap<String, Duration>>,
    requests: Mutex<Vec<Url>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, action: &str, reply: Reply) {
        self.replies.lock().unwrap().insert(action.to_string(), reply);
    }

    pub fn records(&self, action: &str, records: Vec<Value>) {
        self.reply(action, Reply::Records(records));
    }

    pub fn delay(&self, action: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(action.to_string(), delay);
    }

    pub fn requests(&self) -> Vec<Url> {
        self.requests.lock().unwrap().clone()
    }

    pub fn actions(&self) -> Vec<String> {
        self.requests()
            .iter()
            .filter_map(|url| {
                url.query_pairs()
                    .find(|(k, _)| k == "action")
                    .map(|(_, v)| v.into_owned())
            })
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &Url, _correlation_id: &str) -> Result<RawResponse, TransportError> {
        self.requests.lock().unwrap().push(url.clone());
        let action = url
            .query_pairs()
            .find(|(k, _)| k == "action")
            .map(|(_, v)| v.into_owned())
            .unwrap_or_default();

        let delay = self.delays.lock().unwrap().get(&action).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get(&action)
            .cloned()
            .unwrap_or(Reply::Records(Vec::new()));

        match reply {
            Reply::Records(records) => Ok(RawResponse {
                status: 200,
                body: json!({"success": true, "data": records}).to_string(),
            }),
            Reply::Body(status, body) => Ok(RawResponse { status, body }),
            Reply::Unreachable => Err(TransportError("connection refused".to_string())),
        }
    }
}

/// Platform whose install signals are sent by the test
pub struct ScriptedPlatform {
    events: Mutex<Option<UnboundedReceiver<InstallEvent>>>,
}

impl ScriptedPlatform {
    pub fn new() -> (Arc<Self>, UnboundedSender<InstallEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let platform = Arc::new(Self {
            events: Mutex::new(Some(rx)),
        });
        (platform, tx)
    }
}

#[async_trait]
impl Platform for ScriptedPlatform {
    fn supports_offline_assets(&self) -> bool {
        false
    }

    async fn register_offline_assets(&self, _manifest_path: &str) -> anyhow::Result<String> {
        anyhow::bail!("offline assets unsupported")
    }

    fn install_events(&self) -> Option<UnboundedReceiver<InstallEvent>> {
        self.events.lock().unwrap().take()
    }
}

pub fn today_clock() -> Arc<dyn Clock> {
    let now = Local.with_ymd_and_hms(2026, 10, 15, 9, 30, 0).unwrap();
    Arc::new(FixedClock(now))
}

pub fn deps(transport: Arc<ScriptedTransport>) -> ShellDeps {
    deps_on(transport, Arc::new(NativePlatform::default()))
}

pub fn deps_on(transport: Arc<ScriptedTransport>, platform: Arc<dyn Platform>) -> ShellDeps {
    let notifier = NotificationReporter::new(NotificationTimeouts::default());
    let api = ApiClient::new("http://dashboard.test/api", transport, notifier.clone()).unwrap();
    ShellDeps {
        api,
        notifier,
        platform,
        clock: today_clock(),
        nav_breakpoint: 768,
    }
}
