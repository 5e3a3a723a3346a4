//! Endpoint groups and the chatbot conversation against a mock backend

mod common;

use common::{Harness, user_json};
use medportal_client::storage::keys;
use medportal_client::{ChatConversation, ClientError, StorageArea};
use medportal_core::{AppointmentInput, ChatRole, DoctorQuery, ListParams};
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn patient_list_sends_paging_and_reads_envelope() {
    let h = Harness::start().await;

    Mock::given(method("GET"))
        .and(path("/api/patients/"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "5"))
        .and(query_param("search", "asha"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "patients": [
                { "id": 11, "patient_id": "P00011", "first_name": "Asha", "ward": "B" }
            ],
            "total": 6,
            "pages": 2,
            "current_page": 2,
            "per_page": 5
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let params = ListParams {
        page: Some(2),
        per_page: Some(5),
        search: Some("asha".into()),
    };
    let page = h.client.patients().list(&params).await.unwrap();

    assert_eq!(page.total, 6);
    assert_eq!(page.current_page, 2);
    assert_eq!(page.items.len(), 1);
    let patient = &page.items[0];
    assert_eq!(patient.patient_id.as_deref(), Some("P00011"));
    assert_eq!(patient.extra.get("ward"), Some(&json!("B")));
}

#[tokio::test]
async fn doctor_filters_become_query_parameters() {
    let h = Harness::start().await;

    Mock::given(method("GET"))
        .and(path("/api/doctors/"))
        .and(query_param("specialization", "Cardiology"))
        .and(query_param("available_only", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "doctors": [{ "id": 3, "full_name": "Dr. Rao", "is_available": true }]
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let query = DoctorQuery {
        specialization: Some("Cardiology".into()),
        available_only: Some(true),
        ..Default::default()
    };
    let page = h.client.doctors().list(&query).await.unwrap();
    assert_eq!(page.items[0].full_name.as_deref(), Some("Dr. Rao"));
}

#[tokio::test]
async fn booking_an_appointment_returns_the_created_record() {
    let h = Harness::start().await;
    h.store(StorageArea::Durable, keys::ACCESS_TOKEN, "A1");

    Mock::given(method("POST"))
        .and(path("/api/appointments/"))
        .and(body_partial_json(json!({ "doctor_id": 3 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "message": "Appointment booked",
            "appointment": { "id": 21, "doctor_id": 3, "status": "scheduled" }
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let input = AppointmentInput {
        doctor_id: Some(3),
        appointment_date: Some("2026-11-02T10:30:00".into()),
        ..Default::default()
    };
    let appointment = h.client.appointments().create(&input).await.unwrap();
    assert_eq!(appointment.id, 21);
    assert_eq!(appointment.status.as_deref(), Some("scheduled"));
}

#[tokio::test]
async fn admin_toggles_user_status() {
    let h = Harness::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/admin/users/8/toggle-status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "is_active": false })))
        .expect(1)
        .mount(&h.server)
        .await;

    let body = h.client.admin().toggle_user_status(8).await.unwrap();
    assert_eq!(body["is_active"], json!(false));
}

#[tokio::test]
async fn hospital_login_and_logout_own_only_hospital_keys() {
    let h = Harness::start().await;
    h.store(StorageArea::Durable, keys::ACCESS_TOKEN, "PATIENT");

    Mock::given(method("POST"))
        .and(path("/api/hospital-auth/login"))
        .and(body_json(json!({ "email": "admin@city.org", "password": "pw" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "H1",
            "refresh_token": "HR1",
            "user": user_json(30),
            "hospital": { "id": 2, "name": "City Hospital" }
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let hospital = h.client.hospital();
    let response = hospital.login("admin@city.org", "pw").await.unwrap();
    assert_eq!(response.user.id, 30);

    let durable = |key| h.stored(StorageArea::Durable, key);
    assert_eq!(durable(keys::HOSPITAL_ACCESS_TOKEN).as_deref(), Some("H1"));
    assert_eq!(durable(keys::HOSPITAL_REFRESH_TOKEN).as_deref(), Some("HR1"));
    assert!(durable(keys::HOSPITAL_USER).is_some());
    assert_eq!(
        hospital.stored_hospital().map(|h| h.name),
        Some("City Hospital".to_string())
    );

    hospital.logout().unwrap();
    for key in keys::HOSPITAL_ENTRIES {
        assert_eq!(durable(key), None);
    }
    assert_eq!(durable(keys::ACCESS_TOKEN).as_deref(), Some("PATIENT"));
    assert_eq!(h.authorization_headers().await, [None]);
}

#[tokio::test]
async fn chat_sends_recent_context_and_records_both_sides() {
    let h = Harness::start().await;

    Mock::given(method("POST"))
        .and(path("/api/ai/chatbot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": { "reply": "Drink water.", "type": "general", "suggestions": [] }
        })))
        .mount(&h.server)
        .await;

    let mut chat = ChatConversation::new(h.client.clone());
    for i in 0..4 {
        let reply = chat.send(&format!("question {i}")).await.unwrap();
        assert_eq!(reply.and_then(|r| r.reply).as_deref(), Some("Drink water."));
    }
    assert_eq!(chat.history().len(), 8);
    assert_eq!(chat.history()[0].role, ChatRole::User);
    assert_eq!(chat.history()[1].role, ChatRole::Bot);

    let requests = h.server.received_requests().await.unwrap();
    let first: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(first.get("context").is_none());

    let last: serde_json::Value = serde_json::from_slice(&requests[3].body).unwrap();
    assert_eq!(last["message"], "question 3");
    let context = last["context"].as_array().unwrap();
    assert_eq!(context.len(), 6);
    assert_eq!(context[0], json!({ "role": "user", "message": "question 0" }));
}

#[tokio::test]
async fn chat_ignores_blank_input() {
    let h = Harness::start().await;
    let mut chat = ChatConversation::new(h.client.clone());

    assert!(chat.send("   ").await.unwrap().is_none());
    assert!(chat.history().is_empty());
    assert!(h.server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn chat_substitutes_empty_reply() {
    let h = Harness::start().await;

    Mock::given(method("POST"))
        .and(path("/api/ai/chatbot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": {} })))
        .mount(&h.server)
        .await;

    let mut chat = ChatConversation::new(h.client.clone());
    chat.send("hello").await.unwrap();
    assert_eq!(chat.history()[1].message, "I am here to help.");
}

#[tokio::test]
async fn chat_failure_appends_apology_and_notifies() {
    let h = Harness::start().await;

    Mock::given(method("POST"))
        .and(path("/api/ai/chatbot"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "Message is required" })),
        )
        .mount(&h.server)
        .await;

    let mut chat = ChatConversation::new(h.client.clone());
    let result = chat.send("hello").await;

    assert!(matches!(result, Err(ClientError::BadRequest(_))));
    assert_eq!(chat.history().len(), 2);
    assert_eq!(
        chat.history()[1].message,
        "Sorry, I could not process that. Please try again."
    );
    assert_eq!(h.notifier.errors(), ["Message is required"]);
}
