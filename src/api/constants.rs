//! API Constants for the clinic dashboard endpoint

/// Default endpoint used when neither config nor environment provide one
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/api";

/// User agent sent with every request
pub const USER_AGENT: &str = "clinic-dashboard/0.1";

/// Query parameter naming the remote operation
pub const ACTION_PARAM: &str = "action";

/// Query parameter scoping roster requests to a calendar day
pub const DATE_PARAM: &str = "date";

/// Date format the remote API expects for `date`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Remote operations consumed by the dashboard
pub mod actions {
    pub const GET_DOCTORS: &str = "getDoctors";
    pub const GET_CLINICS: &str = "getClinics";
    pub const GET_ROSTER: &str = "getRoster";
    pub const GET_NOTIFICATIONS: &str = "getNotifications";
    pub const GET_CALL_ROSTER: &str = "getCallRoster";
}

/// Standard headers
pub mod headers {
    pub const ACCEPT: &str = "Accept";
    pub const CONTENT_TYPE_JSON: &str = "application/json";
    pub const X_CORRELATION_ID: &str = "X-Correlation-Id";
}
