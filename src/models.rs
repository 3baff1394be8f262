//! Projections of remote records consumed by the dashboard

use crate::api::Record;
use crate::render::RenderError;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::Value;

/// Status shown for roster entries that carry none
pub const DEFAULT_ROSTER_STATUS: &str = "Pending";

/// Notification status counted on the dashboard
pub const PENDING_STATUS: &str = "Pending";

/// Sheet cells arrive as strings, numbers or booleans; all read as text
fn loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None => Ok(None),
        Some(value) => scalar_text(&value)
            .map_err(|found| de::Error::custom(format!("expected a scalar cell, found {}", found))),
    }
}

fn scalar_text(value: &Value) -> Result<Option<String>, &'static str> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text.clone())),
        Value::Number(number) => Ok(Some(number.to_string())),
        Value::Bool(flag) => Ok(Some(flag.to_string())),
        Value::Array(_) => Err("an array"),
        Value::Object(_) => Err("an object"),
    }
}

fn project<T: de::DeserializeOwned>(record: &Record, what: &str) -> Result<T, RenderError> {
    if !record.is_object() {
        return Err(RenderError::Malformed(format!("{} is not an object: {}", what, record)));
    }
    serde_json::from_value(record.clone()).map_err(|e| RenderError::Malformed(format!("{}: {}", what, e)))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    #[serde(rename = "Clinic", default, deserialize_with = "loose_string")]
    pub clinic: Option<String>,
    #[serde(rename = "Consultants", default, deserialize_with = "loose_string")]
    pub consultants: Option<String>,
    #[serde(rename = "Status", default, deserialize_with = "loose_string")]
    pub status: Option<String>,
}

impl RosterEntry {
    pub fn from_record(record: &Record) -> Result<Self, RenderError> {
        project(record, "roster entry")
    }

    /// Consultant names in their listed order, blanks dropped
    pub fn consultant_names(&self) -> Vec<&str> {
        self.consultants
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect()
    }

    /// Status for display; the entry itself is left untouched
    pub fn display_status(&self) -> &str {
        self.status.as_deref().unwrap_or(DEFAULT_ROSTER_STATUS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRosterEntry {
    #[serde(rename = "Date", default, deserialize_with = "loose_string")]
    pub date: Option<String>,
    #[serde(rename = "ConsultantOnCall", default, deserialize_with = "loose_string")]
    pub consultant_on_call: Option<String>,
    #[serde(rename = "SeniorRegistrarOnCall", default, deserialize_with = "loose_string")]
    pub senior_registrar_on_call: Option<String>,
    #[serde(rename = "RegistrarOnCall", default, deserialize_with = "loose_string")]
    pub registrar_on_call: Option<String>,
}

impl CallRosterEntry {
    pub fn from_record(record: &Record) -> Result<Self, RenderError> {
        project(record, "call roster entry")
    }

    /// Calendar day of a raw call-roster record, read without projecting it
    pub fn record_day(record: &Record) -> Option<NaiveDate> {
        let date = scalar_text(record.get("Date")?).ok()??;
        normalize_day(&date)
    }
}

/// Number of notifications whose `Status` is exactly "Pending"
pub fn pending_count(notifications: &[Record]) -> usize {
    notifications
        .iter()
        .filter(|n| n.get("Status").and_then(|s| s.as_str()) == Some(PENDING_STATUS))
        .count()
}

/// Reduce a date-like string to its local calendar day
pub fn normalize_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Local).date_naive());
    }

    const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];
    for format in DATETIME_FORMATS {
        if let Ok(local) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(local.date());
        }
    }

    const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

/// Aggregated view state of one refresh
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSnapshot {
    pub doctor_count: usize,
    pub clinic_count: usize,
    pub roster_count: usize,
    pub pending_notification_count: usize,
    pub today_schedule: Vec<RosterEntry>,
    pub today_on_call: Vec<CallRosterEntry>,
}

/// Source of the current local time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pending_count_is_case_sensitive() {
        let notifications = vec![
            json!({"Status": "Pending"}),
            json!({"Status": "pending"}),
            json!({"Status": "Sent"}),
            json!({"Status": "Pending", "Message": "x"}),
            json!({"Message": "no status"}),
            json!({"Status": 1}),
        ];
        assert_eq!(pending_count(&notifications), 2);
    }

    #[test]
    fn test_consultant_names() {
        let entry = RosterEntry::from_record(&json!({"Clinic": "ENT", "Consultants": "A, B,,C "})).unwrap();
        assert_eq!(entry.consultant_names(), vec!["A", "B", "C"]);
        assert_eq!(entry.display_status(), "Pending");
        assert_eq!(entry.status, None);
    }

    #[test]
    fn test_scalar_cells_read_as_text() {
        let entry = RosterEntry::from_record(&json!({"Clinic": 42, "Consultants": "A", "Status": null})).unwrap();
        assert_eq!(entry.clinic.as_deref(), Some("42"));
        assert_eq!(entry.status, None);

        let on_call = CallRosterEntry::from_record(&json!({
            "Date": "2026-10-15", "RegistrarOnCall": 4521, "ConsultantOnCall": true
        }))
        .unwrap();
        assert_eq!(on_call.registrar_on_call.as_deref(), Some("4521"));
        assert_eq!(on_call.consultant_on_call.as_deref(), Some("true"));
    }

    #[test]
    fn test_malformed_roster_entry() {
        assert!(matches!(
            RosterEntry::from_record(&json!("just a string")),
            Err(RenderError::Malformed(_))
        ));
        assert!(matches!(
            RosterEntry::from_record(&json!({"Clinic": ["ENT", "Eye"]})),
            Err(RenderError::Malformed(_))
        ));
    }

    #[test]
    fn test_record_day() {
        let day = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
        assert_eq!(CallRosterEntry::record_day(&json!({"Date": "2026-10-15T07:00:00"})), Some(day));
        assert_eq!(CallRosterEntry::record_day(&json!({"Date": 20261015})), None);
        assert_eq!(CallRosterEntry::record_day(&json!({"Date": null})), None);
        assert_eq!(CallRosterEntry::record_day(&json!({})), None);
        assert_eq!(CallRosterEntry::record_day(&json!(["2026-10-15"])), None);
    }

    #[test]
    fn test_normalize_day_formats() {
        let day = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
        assert_eq!(normalize_day("2026-10-15"), Some(day));
        assert_eq!(normalize_day("2026-10-15T08:30:00"), Some(day));
        assert_eq!(normalize_day("2026-10-15T08:30:00.000"), Some(day));
        assert_eq!(normalize_day("2026-10-15 23:59:59"), Some(day));
        assert_eq!(normalize_day("10/15/2026"), Some(day));
        assert_eq!(normalize_day("not a date"), None);
        assert_eq!(normalize_day("  "), None);
    }

    #[test]
    fn test_normalize_rfc3339_uses_local_day() {
        let raw = "2026-10-15T12:00:00Z";
        let expected = DateTime::parse_from_rfc3339(raw).unwrap().with_timezone(&Local).date_naive();
        assert_eq!(normalize_day(raw), Some(expected));
    }
}
