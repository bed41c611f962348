// libs/scheduling-cell/src/services/session.rs
//
// Per-navigation-context composition root. One session owns the engine, the
// view-window controller and the paginator for the calendar it drives, with
// the repository, rendering sink and notifier passed in explicitly. Replaces
// the ambient shared-state singleton the legacy front-end used.

use chrono::{Local, NaiveDate};
use std::sync::Arc;
use tracing::debug;

use crate::models::{
    Appointment, AppointmentId, AppointmentPage, NavigationAction, NavigationEvent,
    SchedulingError, SearchCriteria, TimeRange,
};
use crate::ports::{CalendarSink, Notifier};
use crate::repository::AppointmentRepository;
use crate::services::engine::CalendarEngine;
use crate::services::navigation::ViewWindowController;
use crate::services::pagination::Paginator;

const MAX_PAGES_TO_SHOW: u32 = 5;

pub struct SchedulingSession {
    repository: Arc<dyn AppointmentRepository>,
    calendar: Box<dyn CalendarSink>,
    notifier: Arc<dyn Notifier>,
    controller: ViewWindowController,
    engine: CalendarEngine,
    paginator: Paginator,
}

impl SchedulingSession {
    pub fn new(
        repository: Arc<dyn AppointmentRepository>,
        calendar: Box<dyn CalendarSink>,
        notifier: Arc<dyn Notifier>,
        page_size: u32,
    ) -> Self {
        Self::starting_from(repository, calendar, notifier, page_size, system_today())
    }

    /// Construct with an explicit "today", for deterministic tests.
    pub fn starting_from(
        repository: Arc<dyn AppointmentRepository>,
        calendar: Box<dyn CalendarSink>,
        notifier: Arc<dyn Notifier>,
        page_size: u32,
        today: NaiveDate,
    ) -> Self {
        let controller = ViewWindowController::new(today);
        let engine = CalendarEngine::new(controller.window());
        Self {
            repository,
            calendar,
            notifier,
            controller,
            engine,
            paginator: Paginator::new(page_size, MAX_PAGES_TO_SHOW),
        }
    }

    pub fn engine(&self) -> &CalendarEngine {
        &self.engine
    }

    pub fn controller(&self) -> &ViewWindowController {
        &self.controller
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    // --------------------------------------------------------------------------
    // NAVIGATION AND FETCH
    // --------------------------------------------------------------------------

    /// Apply a navigation action: recompute the window, reset paging to the
    /// first page, fetch and re-render.
    pub async fn navigate(&mut self, action: NavigationAction) -> NavigationEvent {
        self.navigate_from(action, system_today()).await
    }

    /// [`Self::navigate`] with an explicit "today", for deterministic tests.
    pub async fn navigate_from(
        &mut self,
        action: NavigationAction,
        today: NaiveDate,
    ) -> NavigationEvent {
        let event = self.controller.apply(action, today);
        self.paginator.reset();
        self.fetch_window_page(1).await;
        event
    }

    /// Re-fetch the active window at the current page.
    pub async fn refresh(&mut self) {
        self.fetch_window_page(self.paginator.current_page()).await;
    }

    /// Jump to a page of the active window. No fetch and no page-change when
    /// the target is out of range or already current.
    pub async fn go_to_page(&mut self, page: u32) -> bool {
        match self.paginator.go_to_page(page) {
            Some(page) => {
                self.fetch_window_page(page).await;
                true
            }
            None => false,
        }
    }

    pub fn visible_pages(&self) -> Vec<u32> {
        self.paginator.visible_pages()
    }

    async fn fetch_window_page(&mut self, page: u32) {
        let window = self.engine.window();
        let ticket = self.engine.begin_fetch(window);
        let result = self
            .repository
            .fetch_appointments(
                window.fetch_start(),
                window.fetch_end(),
                page,
                self.paginator.page_size(),
            )
            .await;

        match result {
            Ok(fetched) => {
                let total = fetched.total_count;
                if self.engine.apply_fetch(&ticket, fetched) {
                    self.paginator.set_total_items(total);
                    if total == 0 {
                        self.notifier.info("No appointments in the selected period");
                    }
                    self.push_events();
                }
            }
            Err(error) => {
                if self.engine.apply_fetch_error(&ticket, &error) {
                    self.notifier
                        .error(&format!("Failed to load appointments: {}", error));
                    self.push_events();
                }
            }
        }
    }

    // --------------------------------------------------------------------------
    // WIDGET CALLBACKS
    // --------------------------------------------------------------------------

    /// Time range selected on the widget: stage a provisional appointment
    /// and re-render. Saving is a separate explicit action.
    pub fn select_time_range(
        &mut self,
        range: TimeRange,
        patient_name: Option<String>,
        doctor_name: Option<String>,
    ) -> AppointmentId {
        let id = self.engine.select_time_range(range, patient_name, doctor_name);
        self.push_events();
        id
    }

    pub fn move_event(&mut self, event_id: &str, range: TimeRange) -> Result<(), SchedulingError> {
        let staged = self.engine.move_event(event_id, range);
        self.stage_time_change(staged)
    }

    pub fn resize_event(
        &mut self,
        event_id: &str,
        range: TimeRange,
    ) -> Result<(), SchedulingError> {
        let staged = self.engine.resize_event(event_id, range);
        self.stage_time_change(staged)
    }

    fn stage_time_change(
        &mut self,
        result: Result<(), SchedulingError>,
    ) -> Result<(), SchedulingError> {
        match result {
            Ok(()) => {
                self.push_events();
                Ok(())
            }
            Err(error) => {
                self.notifier
                    .error(&format!("Could not reschedule appointment: {}", error));
                Err(error)
            }
        }
    }

    // --------------------------------------------------------------------------
    // PERSISTENCE
    // --------------------------------------------------------------------------

    pub async fn save(&mut self, appointment: Appointment) -> Result<Appointment, SchedulingError> {
        match self.engine.save(self.repository.as_ref(), appointment).await {
            Ok(saved) => {
                self.notifier.success("Appointment saved");
                self.push_events();
                Ok(saved)
            }
            Err(error) => {
                self.notifier
                    .error(&format!("Failed to save appointment: {}", error));
                if matches!(error, SchedulingError::NotFound) {
                    // The target vanished server-side; re-fetch instead of
                    // guessing at local state.
                    self.refresh().await;
                }
                Err(error)
            }
        }
    }

    pub async fn delete(&mut self, id: AppointmentId) -> Result<(), SchedulingError> {
        match self.engine.delete(self.repository.as_ref(), id).await {
            Ok(()) => {
                self.notifier.success("Appointment deleted");
                self.push_events();
                Ok(())
            }
            Err(error) => {
                self.notifier
                    .error(&format!("Failed to delete appointment: {}", error));
                if matches!(error, SchedulingError::NotFound) {
                    self.refresh().await;
                }
                Err(error)
            }
        }
    }

    // --------------------------------------------------------------------------
    // SEARCH
    // --------------------------------------------------------------------------

    /// Criteria-driven search for the list view. Does not touch the calendar
    /// collection; zero rows is a normal outcome, not an error. The paginator
    /// is retotaled from the search result, so page numbers refer to the
    /// search until the next window fetch resets them.
    pub async fn search(
        &mut self,
        criteria: &SearchCriteria,
    ) -> Result<AppointmentPage, SchedulingError> {
        debug!("Searching appointments, page {}", criteria.page_number);
        match self.repository.search_appointments(criteria).await {
            Ok(found) => {
                self.paginator.set_total_items(found.total_count);
                self.paginator.go_to_page(criteria.page_number);
                if found.appointments.is_empty() {
                    self.notifier.info("No matching appointments found");
                }
                Ok(found)
            }
            Err(error) => {
                self.notifier
                    .error(&format!("Appointment search failed: {}", error));
                Err(error)
            }
        }
    }

    fn push_events(&mut self) {
        let window = self.engine.window();
        self.calendar.replace_events(self.engine.events(), &window);
    }
}

fn system_today() -> NaiveDate {
    Local::now().date_naive()
}
