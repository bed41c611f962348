// libs/scheduling-cell/src/models.rs
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use shared_api_client::ApiError;

// ==============================================================================
// APPOINTMENT IDENTITY
// ==============================================================================

static NEXT_LOCAL_HANDLE: AtomicU64 = AtomicU64::new(1);

/// Identity of an appointment record.
///
/// Unsaved records carry a process-local handle instead of overloading the
/// sign of the server ID; a provisional record can therefore never be
/// mistaken for a persisted one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppointmentId {
    /// Local-only record, not yet confirmed by the server.
    Local(u64),
    /// Server-assigned identity.
    Persisted(i64),
}

impl AppointmentId {
    pub fn new_local() -> Self {
        AppointmentId::Local(NEXT_LOCAL_HANDLE.fetch_add(1, Ordering::Relaxed))
    }

    pub fn is_persisted(&self) -> bool {
        matches!(self, AppointmentId::Persisted(_))
    }

    pub fn persisted(&self) -> Option<i64> {
        match self {
            AppointmentId::Persisted(id) => Some(*id),
            AppointmentId::Local(_) => None,
        }
    }

    /// String form used as the calendar event id.
    pub fn event_id(&self) -> String {
        match self {
            AppointmentId::Persisted(id) => id.to_string(),
            AppointmentId::Local(handle) => format!("local-{}", handle),
        }
    }
}

impl fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.event_id())
    }
}

// The wire format keeps the remote API's integer scheme: persisted IDs are
// positive, anything non-positive means "unsaved".
impl Serialize for AppointmentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AppointmentId::Persisted(id) => serializer.serialize_i64(*id),
            AppointmentId::Local(_) => serializer.serialize_i64(0),
        }
    }
}

impl<'de> Deserialize<'de> for AppointmentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        if raw > 0 {
            Ok(AppointmentId::Persisted(raw))
        } else {
            Ok(AppointmentId::new_local())
        }
    }
}

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

pub const UNKNOWN_PATIENT_LABEL: &str = "Unknown Patient";
pub const GENERAL_RESOURCE_LABEL: &str = "General";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Appointment {
    #[serde(rename = "ID", default = "AppointmentId::new_local")]
    pub id: AppointmentId,
    pub start_date_time: NaiveDateTime,
    pub end_date_time: NaiveDateTime,
    #[serde(rename = "PatientID", default)]
    pub patient_id: Option<i64>,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(rename = "DoctorID", default)]
    pub doctor_id: Option<i64>,
    #[serde(default)]
    pub doctor_name: Option<String>,
    #[serde(default)]
    pub treatment_name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default = "Appointment::default_status")]
    pub appointment_status: String,
    #[serde(default)]
    pub created_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub modified_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub modified_by: Option<String>,
    #[serde(default = "Appointment::default_active")]
    pub is_active: i32,
}

impl Appointment {
    fn default_status() -> String {
        "Scheduled".to_string()
    }

    fn default_active() -> i32 {
        1
    }

    /// Patient display label; never empty.
    pub fn patient_label(&self) -> &str {
        match self.patient_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => UNKNOWN_PATIENT_LABEL,
        }
    }

    /// Doctor/resource display label; never empty.
    pub fn doctor_label(&self) -> &str {
        match self.doctor_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => GENERAL_RESOURCE_LABEL,
        }
    }

    /// Wall-clock "HH:MM" parts used by the editing form.
    pub fn start_time_text(&self) -> String {
        self.start_date_time.format("%H:%M").to_string()
    }

    pub fn end_time_text(&self) -> String {
        self.end_date_time.format("%H:%M").to_string()
    }

    pub fn date_text(&self) -> String {
        self.start_date_time.format("%Y-%m-%d").to_string()
    }
}

/// A start/end range selected on the calendar widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

// ==============================================================================
// CALENDAR VIEW MODELS
// ==============================================================================

/// Render-ready projection of an [`Appointment`]; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub text: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub resource: String,
    pub back_color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    Day,
    Week,
    WorkWeek,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Day => write!(f, "day"),
            ViewMode::Week => write!(f, "week"),
            ViewMode::WorkWeek => write!(f, "work_week"),
        }
    }
}

/// The date range currently fetched and displayed; recomputed on every
/// navigation action, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub mode: ViewMode,
}

impl ViewWindow {
    pub fn fetch_start(&self) -> NaiveDateTime {
        self.start_date.and_time(NaiveTime::MIN)
    }

    pub fn fetch_end(&self) -> NaiveDateTime {
        self.end_date.and_time(NaiveTime::MIN) + Duration::hours(23)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationAction {
    Today,
    PreviousDay,
    NextDay,
    PreviousWeek,
    NextWeek,
    SwitchToDayView,
    SwitchToWeekView,
    SwitchToWorkWeekView,
}

/// Emitted on every navigation transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationEvent {
    pub action: NavigationAction,
    pub date: NaiveDate,
    pub window: ViewWindow,
}

// ==============================================================================
// SEARCH AND PAGING MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    #[serde(default)]
    pub from_date: Option<NaiveDate>,
    #[serde(default)]
    pub to_date: Option<NaiveDate>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(rename = "doctorID", default)]
    pub doctor_id: Option<i64>,
    pub page_number: u32,
    pub page_size: u32,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            from_date: None,
            to_date: None,
            name: None,
            city: None,
            email: None,
            phone: None,
            doctor_id: None,
            page_number: 1,
            page_size: 20,
        }
    }
}

/// One page of fetch/search results, with the server-side total.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPage {
    pub appointments: Vec<Appointment>,
    pub total_count: u64,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum SchedulingError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Appointment not found")]
    NotFound,

    #[error("Unauthorized access to appointments")]
    Unauthorized,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },
}

impl From<ApiError> for SchedulingError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized(_) => SchedulingError::Unauthorized,
            ApiError::NotFound(_) => SchedulingError::NotFound,
            ApiError::BadRequest { message, .. } => SchedulingError::Validation(message),
            ApiError::Server { status, message } => SchedulingError::Server { status, message },
            ApiError::Network(e) => SchedulingError::Network(e.to_string()),
        }
    }
}
