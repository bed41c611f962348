// libs/scheduling-cell/tests/repository_test.rs
use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scheduling_cell::models::{Appointment, AppointmentId, SchedulingError, SearchCriteria};
use scheduling_cell::repository::{AppointmentRepository, HttpAppointmentRepository};
use shared_config::AppConfig;

// ==============================================================================
// TEST FIXTURES AND UTILITIES
// ==============================================================================

struct TestSetup {
    repository: HttpAppointmentRepository,
    mock_server: MockServer,
}

impl TestSetup {
    async fn new() -> Self {
        let mock_server = MockServer::start().await;
        let config = AppConfig {
            clinic_api_url: mock_server.uri(),
            clinic_api_key: "anon-key".to_string(),
            clinic_api_token: "test_token".to_string(),
            default_page_size: 20,
        };

        Self {
            repository: HttpAppointmentRepository::new(&config),
            mock_server,
        }
    }
}

fn dt(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn appointment_json(id: i64) -> serde_json::Value {
    json!({
        "ID": id,
        "StartDateTime": "2024-03-15T09:00:00",
        "EndDateTime": "2024-03-15T09:30:00",
        "PatientID": 101,
        "PatientName": "Ana Flores",
        "DoctorID": 7,
        "DoctorName": "Dr. Reyes",
        "AppointmentStatus": "Scheduled",
        "IsActive": 1
    })
}

// ==============================================================================
// FETCH AND SEARCH
// ==============================================================================

#[tokio::test]
async fn fetch_sends_the_window_and_credentials_and_parses_the_page() {
    let setup = TestSetup::new().await;

    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .and(query_param("startDate", "2024-03-11T00:00:00"))
        .and(query_param("endDate", "2024-03-17T23:00:00"))
        .and(query_param("pageNumber", "1"))
        .and(query_param("pageSize", "20"))
        .and(header("Authorization", "Bearer test_token"))
        .and(header("apikey", "anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "appointments": [appointment_json(12)],
            "totalCount": 47
        })))
        .expect(1)
        .mount(&setup.mock_server)
        .await;

    let page = setup
        .repository
        .fetch_appointments(dt(11, 0), dt(17, 23), 1, 20)
        .await
        .unwrap();

    assert_eq!(page.total_count, 47);
    assert_eq!(page.appointments.len(), 1);

    let fetched = &page.appointments[0];
    assert_eq!(fetched.id, AppointmentId::Persisted(12));
    assert_eq!(fetched.patient_name.as_deref(), Some("Ana Flores"));
    assert_eq!(fetched.start_date_time, dt(15, 9));
}

#[tokio::test]
async fn incoming_zero_ids_become_local_records() {
    let setup = TestSetup::new().await;

    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "appointments": [appointment_json(0)],
            "totalCount": 1
        })))
        .mount(&setup.mock_server)
        .await;

    let page = setup
        .repository
        .fetch_appointments(dt(11, 0), dt(17, 23), 1, 20)
        .await
        .unwrap();

    assert_matches!(page.appointments[0].id, AppointmentId::Local(_));
}

#[tokio::test]
async fn search_encodes_text_filters() {
    let setup = TestSetup::new().await;

    Mock::given(method("GET"))
        .and(path("/api/appointments/search"))
        .and(query_param("name", "Ana Flores"))
        .and(query_param("city", "San José"))
        .and(query_param("doctorID", "7"))
        .and(query_param("pageNumber", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "appointments": [],
            "totalCount": 0
        })))
        .expect(1)
        .mount(&setup.mock_server)
        .await;

    let criteria = SearchCriteria {
        name: Some("Ana Flores".to_string()),
        city: Some("San José".to_string()),
        doctor_id: Some(7),
        page_number: 2,
        ..SearchCriteria::default()
    };

    let page = setup.repository.search_appointments(&criteria).await.unwrap();
    assert_eq!(page.total_count, 0);
}

// ==============================================================================
// MUTATIONS AND ERROR MAPPING
// ==============================================================================

#[tokio::test]
async fn create_posts_an_unsaved_id_and_returns_the_server_record() {
    let setup = TestSetup::new().await;

    Mock::given(method("POST"))
        .and(path("/api/appointments"))
        .and(body_partial_json(json!({
            "ID": 0,
            "PatientName": "Ana Flores"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(appointment_json(99)))
        .expect(1)
        .mount(&setup.mock_server)
        .await;

    let unsaved = Appointment {
        id: AppointmentId::new_local(),
        start_date_time: dt(15, 9),
        end_date_time: dt(15, 9) + chrono::Duration::minutes(30),
        patient_id: Some(101),
        patient_name: Some("Ana Flores".to_string()),
        doctor_id: Some(7),
        doctor_name: Some("Dr. Reyes".to_string()),
        treatment_name: None,
        notes: None,
        appointment_status: "Scheduled".to_string(),
        created_date: None,
        modified_date: None,
        created_by: None,
        modified_by: None,
        is_active: 1,
    };

    let created = setup.repository.create_appointment(&unsaved).await.unwrap();
    assert_eq!(created.id, AppointmentId::Persisted(99));
}

#[tokio::test]
async fn deleting_a_missing_appointment_maps_to_not_found() {
    let setup = TestSetup::new().await;

    Mock::given(method("DELETE"))
        .and(path("/api/appointments/42"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&setup.mock_server)
        .await;

    let result = setup.repository.delete_appointment(42).await;
    assert_matches!(result, Err(SchedulingError::NotFound));
}

#[tokio::test]
async fn server_failures_map_to_server_errors() {
    let setup = TestSetup::new().await;

    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&setup.mock_server)
        .await;

    let result = setup
        .repository
        .fetch_appointments(dt(11, 0), dt(17, 23), 1, 20)
        .await;

    assert_matches!(result, Err(SchedulingError::Server { status: 500, .. }));
}

#[tokio::test]
async fn rejected_payloads_map_to_validation_errors() {
    let setup = TestSetup::new().await;

    Mock::given(method("PUT"))
        .and(path("/api/appointments/12"))
        .respond_with(ResponseTemplate::new(422).set_body_string("end before start"))
        .mount(&setup.mock_server)
        .await;

    let mut edited = Appointment {
        id: AppointmentId::Persisted(12),
        start_date_time: dt(15, 9),
        end_date_time: dt(15, 10),
        patient_id: Some(101),
        patient_name: Some("Ana Flores".to_string()),
        doctor_id: Some(7),
        doctor_name: Some("Dr. Reyes".to_string()),
        treatment_name: None,
        notes: None,
        appointment_status: "Scheduled".to_string(),
        created_date: None,
        modified_date: None,
        created_by: None,
        modified_by: None,
        is_active: 1,
    };
    edited.notes = Some("edited".to_string());

    let result = setup.repository.update_appointment(12, &edited).await;
    assert_matches!(result, Err(SchedulingError::Validation(_)));
}
