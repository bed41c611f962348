use std::sync::Arc;
use anyhow::bail;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scheduling_cell::{
    CalendarEvent, CalendarSink, HttpAppointmentRepository, NavigationAction, SchedulingSession,
    TracingNotifier, ViewWindow,
};
use shared_config::AppConfig;

/// Rendering target that logs each full event replacement.
struct LoggingCalendarSink;

impl CalendarSink for LoggingCalendarSink {
    fn replace_events(&mut self, events: Vec<CalendarEvent>, window: &ViewWindow) {
        info!(
            "Calendar rebuilt for {} - {} ({}): {} events",
            window.start_date,
            window.end_date,
            window.mode,
            events.len()
        );
        for event in &events {
            info!(
                "  [{}] {} with {} ({} - {})",
                event.id, event.text, event.resource, event.start, event.end
            );
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting clinic scheduler console");

    // Load configuration
    let config = AppConfig::from_env();
    if !config.is_configured() {
        bail!("clinic API not configured; set CLINIC_API_URL and CLINIC_API_KEY");
    }

    let repository = Arc::new(HttpAppointmentRepository::new(&config));
    let mut session = SchedulingSession::new(
        repository,
        Box::new(LoggingCalendarSink),
        Arc::new(TracingNotifier),
        config.default_page_size,
    );

    // Render the current week around today
    let event = session.navigate(NavigationAction::Today).await;
    info!(
        "Active window {} - {}, {} appointments of {} total",
        event.window.start_date,
        event.window.end_date,
        session.engine().appointments().len(),
        session.engine().total_count()
    );

    Ok(())
}
