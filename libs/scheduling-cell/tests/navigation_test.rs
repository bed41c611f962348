// libs/scheduling-cell/tests/navigation_test.rs
use chrono::{Duration, NaiveDate};

use scheduling_cell::models::{NavigationAction, ViewMode};
use scheduling_cell::services::navigation::ViewWindowController;

// Friday 2024-03-15; its ISO week runs Monday 11th through Sunday 17th.
fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

#[test]
fn week_window_spans_iso_monday_through_sunday() {
    let controller = ViewWindowController::new(today());
    let window = controller.window();

    assert_eq!(window.mode, ViewMode::Week);
    assert_eq!(window.start_date, NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
    assert_eq!(window.end_date, NaiveDate::from_ymd_opt(2024, 3, 17).unwrap());
}

#[test]
fn day_window_covers_twenty_three_hours() {
    let mut controller = ViewWindowController::new(today());
    let event = controller.apply(NavigationAction::SwitchToDayView, today());

    assert_eq!(event.window.start_date, today());
    assert_eq!(event.window.end_date, today());
    assert_eq!(
        event.window.fetch_end() - event.window.fetch_start(),
        Duration::hours(23)
    );
}

#[test]
fn today_is_idempotent() {
    let mut controller = ViewWindowController::new(today());
    controller.apply(NavigationAction::NextWeek, today());

    let first = controller.apply(NavigationAction::Today, today());
    let second = controller.apply(NavigationAction::Today, today());

    assert_eq!(first.window, second.window);
    assert_eq!(first.date, today());
}

#[test]
fn next_then_previous_week_returns_to_the_original_window() {
    let mut controller = ViewWindowController::new(today());
    let original = controller.window();

    controller.apply(NavigationAction::NextWeek, today());
    let back = controller.apply(NavigationAction::PreviousWeek, today());

    assert_eq!(back.window, original);
}

#[test]
fn week_steps_shift_by_seven_days() {
    let mut controller = ViewWindowController::new(today());

    let forward = controller.apply(NavigationAction::NextWeek, today());
    assert_eq!(
        forward.window.start_date,
        NaiveDate::from_ymd_opt(2024, 3, 18).unwrap()
    );

    controller.apply(NavigationAction::PreviousWeek, today());
    let backward = controller.apply(NavigationAction::PreviousWeek, today());
    assert_eq!(
        backward.window.start_date,
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    );
}

#[test]
fn day_steps_shift_the_pivot_in_day_mode() {
    let mut controller = ViewWindowController::new(today());
    controller.apply(NavigationAction::SwitchToDayView, today());

    let next = controller.apply(NavigationAction::NextDay, today());
    assert_eq!(next.date, NaiveDate::from_ymd_opt(2024, 3, 16).unwrap());

    controller.apply(NavigationAction::PreviousDay, today());
    let previous = controller.apply(NavigationAction::PreviousDay, today());
    assert_eq!(previous.date, NaiveDate::from_ymd_opt(2024, 3, 14).unwrap());
}

#[test]
fn day_steps_outside_day_mode_shift_without_error() {
    let mut controller = ViewWindowController::new(today());
    assert_eq!(controller.mode(), ViewMode::Week);

    // Friday + 3 days lands in the next ISO week; the window follows the
    // active mode's rule.
    controller.apply(NavigationAction::NextDay, today());
    controller.apply(NavigationAction::NextDay, today());
    let event = controller.apply(NavigationAction::NextDay, today());

    assert_eq!(event.date, NaiveDate::from_ymd_opt(2024, 3, 18).unwrap());
    assert_eq!(
        event.window.start_date,
        NaiveDate::from_ymd_opt(2024, 3, 18).unwrap()
    );
    assert_eq!(event.window.mode, ViewMode::Week);
}

#[test]
fn switching_to_week_views_keeps_the_pivot() {
    let mut controller = ViewWindowController::new(today());
    controller.apply(NavigationAction::NextWeek, today());

    let work_week = controller.apply(NavigationAction::SwitchToWorkWeekView, today());
    assert_eq!(work_week.date, NaiveDate::from_ymd_opt(2024, 3, 22).unwrap());
    assert_eq!(work_week.window.mode, ViewMode::WorkWeek);
    assert_eq!(
        work_week.window.start_date,
        NaiveDate::from_ymd_opt(2024, 3, 18).unwrap()
    );

    let week = controller.apply(NavigationAction::SwitchToWeekView, today());
    assert_eq!(week.window.start_date, work_week.window.start_date);
}

#[test]
fn switching_to_day_view_resets_the_pivot_to_today() {
    let mut controller = ViewWindowController::new(today());
    controller.apply(NavigationAction::NextWeek, today());
    controller.apply(NavigationAction::NextWeek, today());

    let event = controller.apply(NavigationAction::SwitchToDayView, today());

    assert_eq!(event.date, today());
    assert_eq!(event.window.mode, ViewMode::Day);
    assert_eq!(event.window.start_date, today());
}
