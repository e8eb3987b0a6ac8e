use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

use appointment_cell::appointment_routes;
use shared_utils::test_utils::{send, TestAccount, TestClinic};

struct Fixture {
    clinic: TestClinic,
    doctor: TestAccount,
    patient: TestAccount,
    other_patient: TestAccount,
}

async fn fixture() -> Fixture {
    let clinic = TestClinic::new();
    let spec = clinic.seed_specialization("Therapy").await;
    let doctor = clinic.seed_doctor("doc@clinic.test", "Dr. House", spec.id).await;
    let patient = clinic.seed_patient("p1@clinic.test", "Patient One").await;
    let other_patient = clinic.seed_patient("p2@clinic.test", "Patient Two").await;
    Fixture { clinic, doctor, patient, other_patient }
}

async fn book(fx: &Fixture, who: &TestAccount, date: &str) -> (StatusCode, Value) {
    send(
        appointment_routes(fx.clinic.state.clone()),
        Method::POST,
        "/",
        Some(&who.token),
        Some(json!({ "doctorId": fx.doctor.detail_id(), "date": date })),
    )
    .await
}

#[tokio::test]
async fn booked_appointment_shows_up_for_patient() {
    let fx = fixture().await;

    let (status, appointment) = book(&fx, &fx.patient, "2030-06-02 09:00:00").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(appointment["status"], "scheduled");
    assert_eq!(appointment["appointment_date"], "2030-06-02T09:00:00");

    let (status, mine) = send(
        appointment_routes(fx.clinic.state.clone()),
        Method::GET,
        "/my",
        Some(&fx.patient.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["id"], appointment["id"]);
    assert_eq!(mine[0]["doctor_name"], "Dr. House");
    assert_eq!(mine[0]["specialization"], "Therapy");
}

#[tokio::test]
async fn second_booking_of_slot_is_conflict() {
    let fx = fixture().await;

    let (status, _) = book(&fx, &fx.patient, "2030-06-02 09:00:00").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = book(&fx, &fx.other_patient, "2030-06-02T09:00:00").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "This time slot is already taken");
}

#[tokio::test]
async fn concurrent_bookings_admit_exactly_one() {
    let fx = fixture().await;

    let ((first, _), (second, _)) = futures::join!(
        book(&fx, &fx.patient, "2030-06-03 14:30:00"),
        book(&fx, &fx.other_patient, "2030-06-03 14:30:00"),
    );

    let statuses = [first, second];
    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::CREATED).count(), 1);
    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::CONFLICT).count(), 1);
}

#[tokio::test]
async fn booking_input_is_validated() {
    let fx = fixture().await;

    let (status, body) = book(&fx, &fx.patient, "next tuesday").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");

    let (status, _) = send(
        appointment_routes(fx.clinic.state.clone()),
        Method::POST,
        "/",
        Some(&fx.patient.token),
        Some(json!({ "doctorId": Uuid::new_v4(), "date": "2030-06-02 09:00:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Off-grid times are accepted; the grid is advisory.
    let (status, _) = book(&fx, &fx.patient, "2030-06-02 10:15").await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn booking_requires_patient_role() {
    let fx = fixture().await;

    let (status, _) = book(&fx, &fx.doctor, "2030-06-02 09:00:00").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        appointment_routes(fx.clinic.state.clone()),
        Method::POST,
        "/",
        None,
        Some(json!({ "doctorId": fx.doctor.detail_id(), "date": "2030-06-02 09:00:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let expired = fx.clinic.expired_token_for(&fx.patient.identity());
    let (status, _) = send(
        appointment_routes(fx.clinic.state.clone()),
        Method::GET,
        "/my",
        Some(&expired),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        appointment_routes(fx.clinic.state.clone()),
        Method::GET,
        "/doctor",
        Some(&fx.patient.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn cancellation_is_owner_and_state_restricted() {
    let fx = fixture().await;
    let (_, appointment) = book(&fx, &fx.patient, "2030-06-04 11:00:00").await;
    let cancel_uri = format!("/{}/cancel", appointment["id"].as_str().unwrap());
    let router = appointment_routes(fx.clinic.state.clone());

    let (status, _) = send(router.clone(), Method::PUT, &cancel_uri, Some(&fx.other_patient.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(router.clone(), Method::PUT, &cancel_uri, Some(&fx.doctor.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(router.clone(), Method::PUT, &cancel_uri, Some(&fx.patient.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["appointment"]["status"], "cancelled");

    let (status, _) = send(router.clone(), Method::PUT, &cancel_uri, Some(&fx.patient.token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        router,
        Method::PUT,
        &format!("/{}/cancel", Uuid::new_v4()),
        Some(&fx.patient.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The released slot can be booked again.
    let (status, _) = book(&fx, &fx.other_patient, "2030-06-04 11:00:00").await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn availability_endpoints_are_public() {
    let fx = fixture().await;
    book(&fx, &fx.patient, "2030-06-05 09:30:00").await;
    book(&fx, &fx.other_patient, "2030-06-05 12:10:00").await;
    let (_, cancelled) = book(&fx, &fx.patient, "2030-06-05 15:00:00").await;
    send(
        appointment_routes(fx.clinic.state.clone()),
        Method::PUT,
        &format!("/{}/cancel", cancelled["id"].as_str().unwrap()),
        Some(&fx.patient.token),
        None,
    )
    .await;

    let query = format!("?doctorId={}&date=2030-06-05", fx.doctor.detail_id());

    let (status, booked) = send(
        appointment_routes(fx.clinic.state.clone()),
        Method::GET,
        &format!("/booked{}", query),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        booked,
        json!([
            { "appointment_date": "2030-06-05T09:30:00" },
            { "appointment_date": "2030-06-05T12:10:00" },
        ])
    );

    let (status, grid) = send(
        appointment_routes(fx.clinic.state.clone()),
        Method::GET,
        &format!("/slots{}", query),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let grid = grid.as_array().unwrap();
    assert_eq!(grid.len(), 17);
    assert_eq!(grid.iter().filter(|s| s["available"] == false).count(), 2);
    assert!(grid.iter().any(|s| s["time"] == "15:00" && s["available"] == true));

    let (status, _) = send(
        appointment_routes(fx.clinic.state.clone()),
        Method::GET,
        &format!("/booked?doctorId={}&date=june", fx.doctor.detail_id()),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn doctor_schedule_lists_upcoming_scheduled_visits() {
    let fx = fixture().await;
    book(&fx, &fx.patient, "2030-06-06 16:00:00").await;
    book(&fx, &fx.other_patient, "2030-06-06 09:00:00").await;
    book(&fx, &fx.patient, "2020-01-01 09:00:00").await;

    let (status, schedule) = send(
        appointment_routes(fx.clinic.state.clone()),
        Method::GET,
        "/doctor",
        Some(&fx.doctor.token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let schedule = schedule.as_array().unwrap();
    assert_eq!(schedule.len(), 2);
    assert_eq!(schedule[0]["patient_name"], "Patient Two");
    assert_eq!(schedule[0]["status"], "scheduled");
    assert_eq!(schedule[1]["patient_name"], "Patient One");
    assert_eq!(schedule[1]["patient_id"], json!(fx.patient.detail_id()));
}
