// libs/scheduling-cell/src/services/engine.rs
//
// Single source of truth for what the calendar currently shows. The engine
// owns the in-memory appointment collection for the active view window and
// reconciles it against server-confirmed state: provisional records get
// their server identity on create, updates replace by ID, deletes remove
// only after the server confirms, and stale window fetches are discarded.

use tracing::{debug, info, warn};

use crate::models::{
    Appointment, AppointmentId, AppointmentPage, CalendarEvent, SchedulingError, TimeRange,
    ViewWindow,
};
use crate::repository::AppointmentRepository;

/// Fixed event palette. Colors are cosmetic only and must never be used as
/// an identity signal.
const EVENT_PALETTE: [&str; 8] = [
    "#3c78d8", "#6aa84f", "#cc4125", "#e69138", "#674ea7", "#45818e", "#a64d79", "#bf9000",
];

/// Deterministic palette pick keyed on the doctor, so an appointment keeps
/// its color across unrelated re-renders.
fn event_color(appointment: &Appointment) -> &'static str {
    let key = match appointment.doctor_id {
        Some(id) => id.unsigned_abs(),
        None => appointment
            .doctor_label()
            .bytes()
            .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(u64::from(b))),
    };
    EVENT_PALETTE[(key % EVENT_PALETTE.len() as u64) as usize]
}

/// Pure projection of appointments onto the calendar widget's event model.
/// Events are ordered by start time; ties keep collection insertion order.
/// Labels always resolve, never to an empty string.
pub fn project_to_events(appointments: &[Appointment]) -> Vec<CalendarEvent> {
    let mut events: Vec<CalendarEvent> = appointments
        .iter()
        .map(|appointment| CalendarEvent {
            id: appointment.id.event_id(),
            text: appointment.patient_label().to_string(),
            start: appointment.start_date_time,
            end: appointment.end_date_time,
            resource: appointment.doctor_label().to_string(),
            back_color: event_color(appointment).to_string(),
        })
        .collect();

    // Vec::sort_by_key is stable; equal starts keep insertion order.
    events.sort_by_key(|event| event.start);
    events
}

/// Tags an in-flight window fetch so a stale response can be recognized and
/// discarded instead of overwriting a newer window's rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    pub window: ViewWindow,
}

pub struct CalendarEngine {
    appointments: Vec<Appointment>,
    window: ViewWindow,
    active_generation: u64,
    total_count: u64,
}

impl CalendarEngine {
    pub fn new(window: ViewWindow) -> Self {
        Self {
            appointments: Vec::new(),
            window,
            active_generation: 0,
            total_count: 0,
        }
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn window(&self) -> ViewWindow {
        self.window
    }

    /// Server-side total for the active window (may exceed the page held
    /// locally).
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn events(&self) -> Vec<CalendarEvent> {
        project_to_events(&self.appointments)
    }

    // --------------------------------------------------------------------------
    // WINDOW FETCH RECONCILIATION
    // --------------------------------------------------------------------------

    /// Start a fetch for `window`. The new window supersedes the old one in
    /// display terms immediately; any fetch ticketed before this call is
    /// stale from here on.
    pub fn begin_fetch(&mut self, window: ViewWindow) -> FetchTicket {
        self.active_generation += 1;
        self.window = window;
        FetchTicket {
            generation: self.active_generation,
            window,
        }
    }

    /// Apply a resolved fetch. Returns `false` (collection untouched) when
    /// the ticket is stale because a later fetch superseded it.
    pub fn apply_fetch(&mut self, ticket: &FetchTicket, page: AppointmentPage) -> bool {
        if ticket.generation != self.active_generation {
            debug!(
                "Discarding stale fetch for window {} - {}",
                ticket.window.start_date, ticket.window.end_date
            );
            return false;
        }

        info!(
            "Loaded {} of {} appointments for window {} - {}",
            page.appointments.len(),
            page.total_count,
            ticket.window.start_date,
            ticket.window.end_date
        );
        self.appointments = page.appointments;
        self.total_count = page.total_count;
        true
    }

    /// Apply a failed fetch: a failed window yields an empty collection plus
    /// the reported error, never silently-stale data. Returns `false` when
    /// the ticket is stale.
    pub fn apply_fetch_error(&mut self, ticket: &FetchTicket, error: &SchedulingError) -> bool {
        if ticket.generation != self.active_generation {
            return false;
        }

        warn!(
            "Fetch failed for window {} - {}: {}",
            ticket.window.start_date, ticket.window.end_date, error
        );
        self.appointments.clear();
        self.total_count = 0;
        true
    }

    // --------------------------------------------------------------------------
    // LOCAL (UNPERSISTED) MUTATIONS
    // --------------------------------------------------------------------------

    /// A time range was selected on the widget: append a provisional local
    /// appointment. No repository call; saving is a separate explicit action.
    pub fn select_time_range(
        &mut self,
        range: TimeRange,
        patient_name: Option<String>,
        doctor_name: Option<String>,
    ) -> AppointmentId {
        let id = AppointmentId::new_local();
        let (start, end) = if range.start <= range.end {
            (range.start, range.end)
        } else {
            (range.end, range.start)
        };

        debug!("New provisional appointment {} for {} - {}", id, start, end);
        self.appointments.push(Appointment {
            id,
            start_date_time: start,
            end_date_time: end,
            patient_id: None,
            patient_name,
            doctor_id: None,
            doctor_name,
            treatment_name: None,
            notes: None,
            appointment_status: "Scheduled".to_string(),
            created_date: None,
            modified_date: None,
            created_by: None,
            modified_by: None,
            is_active: 1,
        });
        id
    }

    /// Stage a drag-move locally. Dragging never auto-persists; an explicit
    /// save is required.
    pub fn move_event(
        &mut self,
        event_id: &str,
        range: TimeRange,
    ) -> Result<(), SchedulingError> {
        self.stage_time_change("move", event_id, range)
    }

    /// Stage a resize locally, same policy as [`Self::move_event`].
    pub fn resize_event(
        &mut self,
        event_id: &str,
        range: TimeRange,
    ) -> Result<(), SchedulingError> {
        self.stage_time_change("resize", event_id, range)
    }

    fn stage_time_change(
        &mut self,
        kind: &str,
        event_id: &str,
        range: TimeRange,
    ) -> Result<(), SchedulingError> {
        if range.end <= range.start {
            return Err(SchedulingError::Validation(
                "appointment end must be after its start".to_string(),
            ));
        }

        let appointment = self
            .appointments
            .iter_mut()
            .find(|a| a.id.event_id() == event_id)
            .ok_or(SchedulingError::NotFound)?;

        debug!(
            "Staging {} of appointment {}: {} - {}",
            kind, appointment.id, range.start, range.end
        );
        appointment.start_date_time = range.start;
        appointment.end_date_time = range.end;
        Ok(())
    }

    // --------------------------------------------------------------------------
    // CONFIRMED MUTATIONS
    // --------------------------------------------------------------------------

    /// Persist an appointment: create for local records, update for
    /// persisted ones. The collection is only touched on the success path,
    /// so a failed save leaves it byte-unchanged and the user can retry.
    pub async fn save(
        &mut self,
        repository: &dyn AppointmentRepository,
        appointment: Appointment,
    ) -> Result<Appointment, SchedulingError> {
        validate(&appointment)?;

        let saved = match appointment.id {
            AppointmentId::Local(_) => {
                let created = repository.create_appointment(&appointment).await?;
                info!("Appointment {} created as {}", appointment.id, created.id);
                created
            }
            AppointmentId::Persisted(server_id) => {
                let updated = repository.update_appointment(server_id, &appointment).await?;
                info!("Appointment {} updated", updated.id);
                updated
            }
        };

        // Reconcile: replace the provisional/outdated entry in place to keep
        // insertion order; append when the record was not in the collection.
        match self.position_of(&appointment.id) {
            Some(index) => self.appointments[index] = saved.clone(),
            None => self.appointments.push(saved.clone()),
        }
        Ok(saved)
    }

    /// Delete an appointment. Removal from the collection is deferred until
    /// the server confirms; local-only records are removed without a
    /// repository call since the server never saw them.
    pub async fn delete(
        &mut self,
        repository: &dyn AppointmentRepository,
        id: AppointmentId,
    ) -> Result<(), SchedulingError> {
        match id {
            AppointmentId::Persisted(server_id) => {
                repository.delete_appointment(server_id).await?;
                if let Some(index) = self.position_of(&id) {
                    self.appointments.remove(index);
                    info!("Appointment {} removed", id);
                } else {
                    warn!("Appointment {} deleted server-side but not held locally", id);
                }
                Ok(())
            }
            AppointmentId::Local(_) => match self.position_of(&id) {
                Some(index) => {
                    self.appointments.remove(index);
                    info!("Provisional appointment {} discarded", id);
                    Ok(())
                }
                None => Err(SchedulingError::NotFound),
            },
        }
    }

    fn position_of(&self, id: &AppointmentId) -> Option<usize> {
        self.appointments.iter().position(|a| a.id == *id)
    }
}

/// Pre-flight validation; violations never reach the repository.
fn validate(appointment: &Appointment) -> Result<(), SchedulingError> {
    if appointment.end_date_time <= appointment.start_date_time {
        return Err(SchedulingError::Validation(
            "appointment end must be after its start".to_string(),
        ));
    }
    if appointment.patient_id.is_none()
        && appointment
            .patient_name
            .as_deref()
            .map_or(true, |name| name.trim().is_empty())
    {
        return Err(SchedulingError::Validation(
            "a patient is required".to_string(),
        ));
    }
    Ok(())
}
