// libs/scheduling-cell/src/repository.rs
use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Method;
use std::sync::Arc;
use tracing::debug;

use shared_api_client::ClinicApiClient;
use shared_config::AppConfig;

use crate::models::{Appointment, AppointmentPage, SchedulingError, SearchCriteria};

const DATE_TIME_QUERY_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Persistence contract for appointments.
///
/// All durable state lives behind this trait; the engine owns only the
/// in-memory collection for the active view window.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn fetch_appointments(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        page: u32,
        page_size: u32,
    ) -> Result<AppointmentPage, SchedulingError>;

    async fn search_appointments(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<AppointmentPage, SchedulingError>;

    /// Create a new appointment; the server assigns the durable ID.
    async fn create_appointment(
        &self,
        appointment: &Appointment,
    ) -> Result<Appointment, SchedulingError>;

    async fn update_appointment(
        &self,
        id: i64,
        appointment: &Appointment,
    ) -> Result<Appointment, SchedulingError>;

    async fn delete_appointment(&self, id: i64) -> Result<(), SchedulingError>;
}

/// [`AppointmentRepository`] over the remote clinic HTTP API.
pub struct HttpAppointmentRepository {
    client: Arc<ClinicApiClient>,
}

impl HttpAppointmentRepository {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Arc::new(ClinicApiClient::new(config)),
        }
    }

    pub fn with_client(client: Arc<ClinicApiClient>) -> Self {
        Self { client }
    }

    fn encode_body(appointment: &Appointment) -> Result<serde_json::Value, SchedulingError> {
        serde_json::to_value(appointment)
            .map_err(|e| SchedulingError::Validation(format!("unserializable appointment: {}", e)))
    }
}

#[async_trait]
impl AppointmentRepository for HttpAppointmentRepository {
    async fn fetch_appointments(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        page: u32,
        page_size: u32,
    ) -> Result<AppointmentPage, SchedulingError> {
        let path = format!(
            "/api/appointments?startDate={}&endDate={}&pageNumber={}&pageSize={}",
            start.format(DATE_TIME_QUERY_FORMAT),
            end.format(DATE_TIME_QUERY_FORMAT),
            page,
            page_size,
        );
        debug!("Fetching appointments for window {} - {}", start, end);

        let result = self.client.request(Method::GET, &path, None).await?;
        Ok(result)
    }

    async fn search_appointments(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<AppointmentPage, SchedulingError> {
        let mut path = format!(
            "/api/appointments/search?pageNumber={}&pageSize={}",
            criteria.page_number, criteria.page_size,
        );
        if let Some(from) = criteria.from_date {
            path.push_str(&format!("&fromDate={}", from.format("%Y-%m-%d")));
        }
        if let Some(to) = criteria.to_date {
            path.push_str(&format!("&toDate={}", to.format("%Y-%m-%d")));
        }
        for (key, value) in [
            ("name", &criteria.name),
            ("city", &criteria.city),
            ("email", &criteria.email),
            ("phone", &criteria.phone),
        ] {
            if let Some(text) = value.as_deref().filter(|t| !t.is_empty()) {
                path.push_str(&format!("&{}={}", key, urlencoding::encode(text)));
            }
        }
        if let Some(doctor_id) = criteria.doctor_id {
            path.push_str(&format!("&doctorID={}", doctor_id));
        }

        let page = self.client.request(Method::GET, &path, None).await?;
        Ok(page)
    }

    async fn create_appointment(
        &self,
        appointment: &Appointment,
    ) -> Result<Appointment, SchedulingError> {
        let body = Self::encode_body(appointment)?;
        let created = self
            .client
            .request(Method::POST, "/api/appointments", Some(body))
            .await?;
        Ok(created)
    }

    async fn update_appointment(
        &self,
        id: i64,
        appointment: &Appointment,
    ) -> Result<Appointment, SchedulingError> {
        let body = Self::encode_body(appointment)?;
        let path = format!("/api/appointments/{}", id);
        let updated = self.client.request(Method::PUT, &path, Some(body)).await?;
        Ok(updated)
    }

    async fn delete_appointment(&self, id: i64) -> Result<(), SchedulingError> {
        let path = format!("/api/appointments/{}", id);
        self.client
            .request_no_content(Method::DELETE, &path, None)
            .await?;
        Ok(())
    }
}
