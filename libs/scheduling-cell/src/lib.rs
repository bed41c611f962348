pub mod models;
pub mod ports;
pub mod repository;
pub mod services;

// Re-export the main entry points for external use
pub use models::{
    Appointment, AppointmentId, AppointmentPage, CalendarEvent, NavigationAction,
    NavigationEvent, SchedulingError, SearchCriteria, TimeRange, ViewMode, ViewWindow,
};
pub use ports::{CalendarSink, Notifier, TracingNotifier};
pub use repository::{AppointmentRepository, HttpAppointmentRepository};
pub use services::session::SchedulingSession;
