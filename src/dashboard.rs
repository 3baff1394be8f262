//! Dashboard page: stats, today's clinic schedule and today's on-call roster
//!
//! The three routines run concurrently and each contains its own render
//! failures, so a broken schedule never blanks the stats or the on-call list.

use crate::api::constants::actions;
use crate::api::{ApiParams, Record};
use crate::models::{CallRosterEntry, DashboardSnapshot, RosterEntry, pending_count};
use crate::page::{PageShell, ShellDeps};
use crate::render::{BadgeTone, Content, ListItem, Page, RenderError, targets};
use chrono::NaiveDate;
use futures::join;
use log::{debug, warn};
use std::sync::{Mutex, MutexGuard};

/// Consultants listed per schedule item before eliding the rest
pub const VISIBLE_CONSULTANTS: usize = 2;

/// Appended to the consultant list when names were elided
pub const CONTINUATION_MARKER: &str = "...";

pub const NO_SCHEDULE_MESSAGE: &str = "No schedule for today";
pub const NO_ON_CALL_MESSAGE: &str = "No on-call assignments for today";
pub const SCHEDULE_ERROR_MESSAGE: &str = "Error loading schedule";
pub const ON_CALL_ERROR_MESSAGE: &str = "Error loading on-call roster";

const NOT_ASSIGNED: &str = "Not assigned";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatCounts {
    pub doctors: usize,
    pub clinics: usize,
    pub roster: usize,
    pub pending_notifications: usize,
}

pub struct DashboardController {
    shell: PageShell,
    snapshot: Mutex<Option<DashboardSnapshot>>,
}

impl DashboardController {
    pub fn new(deps: &ShellDeps) -> Self {
        Self {
            shell: PageShell::new(deps, Page::dashboard()),
            snapshot: Mutex::new(None),
        }
    }

    pub fn shell(&self) -> &PageShell {
        &self.shell
    }

    /// View state of the most recent completed refresh
    pub fn snapshot(&self) -> Option<DashboardSnapshot> {
        self.lock_snapshot().clone()
    }

    /// Run all three routines concurrently, then replace the snapshot
    pub async fn load_data(&self) {
        let (stats, today_schedule, today_on_call) = join!(
            self.load_stats(),
            self.load_today_schedule(),
            self.load_on_call_today()
        );

        let snapshot = DashboardSnapshot {
            doctor_count: stats.doctors,
            clinic_count: stats.clinics,
            roster_count: stats.roster,
            pending_notification_count: stats.pending_notifications,
            today_schedule,
            today_on_call,
        };
        debug!(
            "Dashboard loaded: {} doctors, {} clinics, {} roster, {} pending",
            snapshot.doctor_count,
            snapshot.clinic_count,
            snapshot.roster_count,
            snapshot.pending_notification_count
        );
        *self.lock_snapshot() = Some(snapshot);
    }

    pub async fn load_stats(&self) -> StatCounts {
        let api = self.shell.api();
        let today = self.shell.clock().today();

        let (doctors, clinics, roster, notifications) = join!(
            api.call(ApiParams::action(actions::GET_DOCTORS)),
            api.call(ApiParams::action(actions::GET_CLINICS)),
            api.call(ApiParams::action(actions::GET_ROSTER).with_date(today)),
            api.call(ApiParams::action(actions::GET_NOTIFICATIONS))
        );

        let counts = StatCounts {
            doctors: doctors.len(),
            clinics: clinics.len(),
            roster: roster.len(),
            pending_notifications: pending_count(&notifications),
        };

        let page = self.shell.page();
        for (id, count) in [
            (targets::DOCTOR_COUNT, counts.doctors),
            (targets::CLINIC_COUNT, counts.clinics),
            (targets::ROSTER_COUNT, counts.roster),
            (targets::NOTIFICATION_COUNT, counts.pending_notifications),
        ] {
            page.write_if_present(id, Content::Text(count.to_string()));
        }

        counts
    }

    pub async fn load_today_schedule(&self) -> Vec<RosterEntry> {
        let today = self.shell.clock().today();
        let roster = self
            .shell
            .api()
            .call(ApiParams::action(actions::GET_ROSTER).with_date(today))
            .await;

        let page = self.shell.page();
        render_schedule(page, &roster).unwrap_or_else(|e| {
            warn!("Failed to render today's schedule: {}", e);
            page.write_if_present(targets::TODAY_SCHEDULE, Content::error(SCHEDULE_ERROR_MESSAGE));
            Vec::new()
        })
    }

    pub async fn load_on_call_today(&self) -> Vec<CallRosterEntry> {
        let today = self.shell.clock().today();
        let call_roster = self
            .shell
            .api()
            .call(ApiParams::action(actions::GET_CALL_ROSTER))
            .await;

        let page = self.shell.page();
        render_on_call(page, &call_roster, today).unwrap_or_else(|e| {
            warn!("Failed to render on-call roster: {}", e);
            page.write_if_present(targets::ON_CALL_TODAY, Content::error(ON_CALL_ERROR_MESSAGE));
            Vec::new()
        })
    }

    fn lock_snapshot(&self) -> MutexGuard<'_, Option<DashboardSnapshot>> {
        self.snapshot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn render_schedule(page: &Page, roster: &[Record]) -> Result<Vec<RosterEntry>, RenderError> {
    if roster.is_empty() {
        page.write(targets::TODAY_SCHEDULE, Content::empty(NO_SCHEDULE_MESSAGE))?;
        return Ok(Vec::new());
    }

    let entries = roster
        .iter()
        .map(RosterEntry::from_record)
        .collect::<Result<Vec<_>, _>>()?;
    let items = entries.iter().map(schedule_item).collect();
    page.write(targets::TODAY_SCHEDULE, Content::Items(items))?;
    Ok(entries)
}

fn render_on_call(page: &Page, call_roster: &[Record], today: NaiveDate) -> Result<Vec<CallRosterEntry>, RenderError> {
    let todays = on_call_for_day(call_roster, today)?;

    if todays.is_empty() {
        page.write(targets::ON_CALL_TODAY, Content::empty(NO_ON_CALL_MESSAGE))?;
        return Ok(todays);
    }

    let items = todays.iter().map(on_call_item).collect();
    page.write(targets::ON_CALL_TODAY, Content::Items(items))?;
    Ok(todays)
}

/// Entries falling on `day`, in their original order.
/// Only records on `day` are projected; a record that is not an object fails.
pub fn on_call_for_day(records: &[Record], day: NaiveDate) -> Result<Vec<CallRosterEntry>, RenderError> {
    if let Some(record) = records.iter().find(|record| !record.is_object()) {
        return Err(RenderError::Malformed(format!("call roster entry is not an object: {}", record)));
    }
    records
        .iter()
        .filter(|record| CallRosterEntry::record_day(record) == Some(day))
        .map(CallRosterEntry::from_record)
        .collect()
}

pub fn schedule_item(entry: &RosterEntry) -> ListItem {
    let title = entry.clinic.as_deref().unwrap_or("Unknown clinic");
    let mut item = ListItem::new(title);

    let names = entry.consultant_names();
    if !names.is_empty() {
        let shown = names.len().min(VISIBLE_CONSULTANTS);
        let mut subtitle = names[..shown].join(", ");
        if names.len() > VISIBLE_CONSULTANTS {
            subtitle.push_str(CONTINUATION_MARKER);
        }
        item = item.subtitle(subtitle);
    }

    let status = entry.display_status();
    let tone = match status {
        "Sent" => BadgeTone::Success,
        "Pending" => BadgeTone::Warning,
        _ => BadgeTone::Neutral,
    };
    item.badge(status, tone)
}

pub fn on_call_item(entry: &CallRosterEntry) -> ListItem {
    let or_unassigned = |name: &Option<String>| {
        name.as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(NOT_ASSIGNED)
            .to_string()
    };

    ListItem::new(or_unassigned(&entry.consultant_on_call))
        .detail(format!("Senior Registrar: {}", or_unassigned(&entry.senior_registrar_on_call)))
        .detail(format!("Registrar: {}", or_unassigned(&entry.registrar_on_call)))
}
