// libs/scheduling-cell/src/services/navigation.rs
use chrono::{Datelike, Duration, NaiveDate};
use tracing::debug;

use crate::models::{NavigationAction, NavigationEvent, ViewMode, ViewWindow};

/// State machine over a display mode and a pivot date; computes the visible
/// date window for the calendar.
///
/// `today` is an explicit parameter on every transition so the controller is
/// deterministic and transitions are idempotent.
#[derive(Debug, Clone)]
pub struct ViewWindowController {
    mode: ViewMode,
    pivot: NaiveDate,
}

impl ViewWindowController {
    pub fn new(today: NaiveDate) -> Self {
        Self::with_mode(today, ViewMode::Week)
    }

    pub fn with_mode(today: NaiveDate, mode: ViewMode) -> Self {
        Self { mode, pivot: today }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn pivot(&self) -> NaiveDate {
        self.pivot
    }

    /// The window for the current mode and pivot. Week and work-week span
    /// the ISO week (Monday + 6 days); day mode covers the pivot date alone.
    pub fn window(&self) -> ViewWindow {
        match self.mode {
            ViewMode::Day => ViewWindow {
                start_date: self.pivot,
                end_date: self.pivot,
                mode: self.mode,
            },
            ViewMode::Week | ViewMode::WorkWeek => {
                let monday =
                    self.pivot - Duration::days(self.pivot.weekday().num_days_from_monday() as i64);
                ViewWindow {
                    start_date: monday,
                    end_date: monday + Duration::days(6),
                    mode: self.mode,
                }
            }
        }
    }

    /// Apply a navigation action and return the transition event. Day-step
    /// actions invoked outside day mode still shift the pivot; the window is
    /// always recomputed with the active mode's rule.
    pub fn apply(&mut self, action: NavigationAction, today: NaiveDate) -> NavigationEvent {
        match action {
            NavigationAction::Today => self.pivot = today,
            NavigationAction::PreviousDay => self.pivot -= Duration::days(1),
            NavigationAction::NextDay => self.pivot += Duration::days(1),
            NavigationAction::PreviousWeek => self.pivot -= Duration::days(7),
            NavigationAction::NextWeek => self.pivot += Duration::days(7),
            NavigationAction::SwitchToDayView => {
                // Day view starts from today, matching the default behavior.
                self.mode = ViewMode::Day;
                self.pivot = today;
            }
            NavigationAction::SwitchToWeekView => self.mode = ViewMode::Week,
            NavigationAction::SwitchToWorkWeekView => self.mode = ViewMode::WorkWeek,
        }

        let window = self.window();
        debug!(
            "Navigation {:?}: pivot {}, window {} - {} ({})",
            action, self.pivot, window.start_date, window.end_date, window.mode
        );

        NavigationEvent {
            action,
            date: self.pivot,
            window,
        }
    }
}
