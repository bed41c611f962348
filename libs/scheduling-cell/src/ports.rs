// libs/scheduling-cell/src/ports.rs
//
// Outbound interfaces the scheduling core drives: the calendar rendering
// surface and the user-facing notification channel. Both are dumb targets;
// the core never waits on them or reads state back.

use tracing::{error, info};

use crate::models::{CalendarEvent, ViewWindow};

/// Rendering target for the calendar widget.
///
/// The core pushes full replacement sets; the sink is never expected to
/// diff, merge, or retain events beyond the latest call.
pub trait CalendarSink: Send {
    fn replace_events(&mut self, events: Vec<CalendarEvent>, window: &ViewWindow);
}

/// Fire-and-forget user notifications (toast/message area).
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn info(&self, message: &str);
}

/// Default notifier that routes messages to the tracing subscriber.
#[derive(Debug, Default, Clone)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        info!(kind = "success", "{}", message);
    }

    fn error(&self, message: &str) {
        error!(kind = "error", "{}", message);
    }

    fn info(&self, message: &str) {
        info!(kind = "info", "{}", message);
    }
}
