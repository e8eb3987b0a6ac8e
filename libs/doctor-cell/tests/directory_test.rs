use axum::http::{Method, StatusCode};
use chrono::NaiveDateTime;
use serde_json::json;
use uuid::Uuid;

use doctor_cell::{admin_routes, directory_routes};
use shared_database::{ClinicStore, FailPoint};
use shared_models::scheduling::NewAppointment;
use shared_utils::test_utils::{send, TestClinic};

#[tokio::test]
async fn public_listings_hide_contact_data() {
    let clinic = TestClinic::new();
    let spec = clinic.seed_specialization("Cardiology").await;
    clinic.seed_doctor("heart@clinic.test", "Dr. Heart", spec.id).await;

    let router = directory_routes(clinic.state.clone());

    let (status, body) = send(router.clone(), Method::GET, "/specializations", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{ "id": spec.id, "name": "Cardiology" }]));

    let (status, body) = send(router, Method::GET, "/doctors", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let doctor = &body[0];
    assert_eq!(doctor["full_name"], "Dr. Heart");
    assert_eq!(doctor["specialization"], "Cardiology");
    assert_eq!(doctor["cabinet_number"], "101");
    assert!(doctor.get("email").is_none());
    assert!(doctor.get("phone").is_none());
    assert!(doctor.get("password_hash").is_none());
}

#[tokio::test]
async fn admin_routes_require_admin_role() {
    let clinic = TestClinic::new();
    let patient = clinic.seed_patient("pat@clinic.test", "Pat").await;
    let router = admin_routes(clinic.state.clone());

    let (status, body) = send(router.clone(), Method::GET, "/doctors", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");

    let (status, _) = send(router, Method::GET, "/doctors", Some(&patient.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_manages_doctor_lifecycle() {
    let clinic = TestClinic::new();
    let admin = clinic.seed_admin("admin@clinic.test").await;
    let therapy = clinic.seed_specialization("Therapy").await;
    let surgery = clinic.seed_specialization("Surgery").await;
    let router = admin_routes(clinic.state.clone());

    let (status, created) = send(
        router.clone(),
        Method::POST,
        "/doctors",
        Some(&admin.token),
        Some(json!({
            "email": "new.doc@clinic.test",
            "password": "doctor-pass",
            "fullName": "Dr. New",
            "phone": "+1 555 0199",
            "specializationId": therapy.id,
            "cabinetNumber": "7"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["email"], "new.doc@clinic.test");
    assert_eq!(created["specialization"], "Therapy");
    let doctor_id = created["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        router.clone(),
        Method::POST,
        "/doctors",
        Some(&admin.token),
        Some(json!({
            "email": "new.doc@clinic.test",
            "password": "doctor-pass",
            "fullName": "Dr. Copy",
            "specializationId": therapy.id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, updated) = send(
        router.clone(),
        Method::PUT,
        &format!("/doctors/{}", doctor_id),
        Some(&admin.token),
        Some(json!({
            "fullName": "Dr. Renamed",
            "phone": null,
            "specializationId": surgery.id,
            "bio": "Moved to surgery",
            "cabinetNumber": "12"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["full_name"], "Dr. Renamed");
    assert_eq!(updated["specialization"], "Surgery");
    assert_eq!(updated["cabinet_number"], "12");

    let (status, listing) = send(router.clone(), Method::GET, "/doctors", Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing.as_array().unwrap().len(), 1);
    assert_eq!(listing[0]["email"], "new.doc@clinic.test");

    let (status, _) = send(
        router.clone(),
        Method::DELETE,
        &format!("/doctors/{}", doctor_id),
        Some(&admin.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        router,
        Method::GET,
        &format!("/doctors/{}", doctor_id),
        Some(&admin.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(clinic
        .store
        .find_account_by_email("new.doc@clinic.test")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn doctor_with_appointments_cannot_be_removed() {
    let clinic = TestClinic::new();
    let admin = clinic.seed_admin("admin@clinic.test").await;
    let spec = clinic.seed_specialization("ENT").await;
    let doctor = clinic.seed_doctor("ent@clinic.test", "Dr. Ear", spec.id).await;
    let patient = clinic.seed_patient("pat@clinic.test", "Pat").await;

    clinic
        .store
        .book_slot(NewAppointment {
            doctor_id: doctor.detail_id(),
            patient_id: patient.detail_id(),
            appointment_date: NaiveDateTime::parse_from_str("2030-03-01 10:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
        })
        .await
        .unwrap();

    let (status, body) = send(
        admin_routes(clinic.state.clone()),
        Method::DELETE,
        &format!("/doctors/{}", doctor.detail_id()),
        Some(&admin.token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Doctor has appointments and cannot be removed");
    assert!(clinic.store.doctor(doctor.detail_id()).await.unwrap().is_some());
}

#[tokio::test]
async fn referenced_specialization_cannot_be_deleted() {
    let clinic = TestClinic::new();
    let admin = clinic.seed_admin("admin@clinic.test").await;
    let used = clinic.seed_specialization("Pediatrics").await;
    clinic.seed_doctor("kids@clinic.test", "Dr. Kids", used.id).await;
    let router = admin_routes(clinic.state.clone());

    let (status, body) = send(
        router.clone(),
        Method::DELETE,
        &format!("/specializations/{}", used.id),
        Some(&admin.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");
    assert_eq!(clinic.store.specializations().await.unwrap().len(), 1);

    let (status, created) = send(
        router.clone(),
        Method::POST,
        "/specializations",
        Some(&admin.token),
        Some(json!({ "name": "Dermatology" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        router.clone(),
        Method::DELETE,
        &format!("/specializations/{}", created["id"].as_str().unwrap()),
        Some(&admin.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        router,
        Method::DELETE,
        &format!("/specializations/{}", Uuid::new_v4()),
        Some(&admin.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn specialization_names_are_validated() {
    let clinic = TestClinic::new();
    let admin = clinic.seed_admin("admin@clinic.test").await;
    clinic.seed_specialization("Oncology").await;
    let router = admin_routes(clinic.state.clone());

    let (status, _) = send(
        router.clone(),
        Method::POST,
        "/specializations",
        Some(&admin.token),
        Some(json!({ "name": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        router.clone(),
        Method::POST,
        "/specializations",
        Some(&admin.token),
        Some(json!({ "name": "Oncology" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(router, Method::GET, "/doctors/not-a-uuid", Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn interrupted_doctor_edit_keeps_old_details() {
    let clinic = TestClinic::new();
    let admin = clinic.seed_admin("admin@clinic.test").await;
    let therapy = clinic.seed_specialization("Therapy").await;
    let surgery = clinic.seed_specialization("Surgery").await;
    let doctor = clinic.seed_doctor("doc@clinic.test", "Dr. Old", therapy.id).await;
    let router = admin_routes(clinic.state.clone());
    let uri = format!("/doctors/{}", doctor.detail_id());

    clinic.store.fail_at(FailPoint::AfterAccountUpdate).await;
    let (status, body) = send(
        router.clone(),
        Method::PUT,
        &uri,
        Some(&admin.token),
        Some(json!({
            "fullName": "Dr. New",
            "specializationId": surgery.id,
            "cabinetNumber": "12"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "internal_error");

    let (status, current) = send(router, Method::GET, &uri, Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(current["full_name"], "Dr. Old");
    assert_eq!(current["specialization"], "Therapy");
    assert_eq!(current["cabinet_number"], "101");
}

#[tokio::test]
async fn interrupted_doctor_creation_leaves_no_account() {
    let clinic = TestClinic::new();
    let admin = clinic.seed_admin("admin@clinic.test").await;
    let therapy = clinic.seed_specialization("Therapy").await;
    let router = admin_routes(clinic.state.clone());

    clinic.store.fail_at(FailPoint::AfterAccountInsert).await;
    let (status, _) = send(
        router.clone(),
        Method::POST,
        "/doctors",
        Some(&admin.token),
        Some(json!({
            "email": "half.doc@clinic.test",
            "password": "doctor-pass",
            "fullName": "Dr. Half",
            "specializationId": therapy.id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(clinic
        .store
        .find_account_by_email("half.doc@clinic.test")
        .await
        .unwrap()
        .is_none());

    let (status, listing) = send(router, Method::GET, "/doctors", Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing, json!([]));
}
