use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::auth::Identity;
use shared_models::error::AppError;
use shared_models::scheduling::{Appointment, BookedSlot, PatientAppointment, ScheduledVisit};
use shared_utils::AppState;

use crate::models::{BookAppointmentRequest, DaySlotsQuery, SlotView};
use crate::services::booking::AppointmentBookingService;
use crate::services::lifecycle::AppointmentLifecycleService;
use crate::services::listing::AppointmentListingService;

pub async fn book_appointment(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    WithRejection(Json(request), _): WithRejection<Json<BookAppointmentRequest>, AppError>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let service = AppointmentBookingService::new(&state);
    let appointment = service.book_appointment(&identity, request).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

pub async fn get_booked_slots(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<DaySlotsQuery>, AppError>,
) -> Result<Json<Vec<BookedSlot>>, AppError> {
    let service = AppointmentBookingService::new(&state);
    Ok(Json(service.booked_slots(query.doctor_id, query.date).await?))
}

pub async fn get_day_slots(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<DaySlotsQuery>, AppError>,
) -> Result<Json<Vec<SlotView>>, AppError> {
    let service = AppointmentBookingService::new(&state);
    Ok(Json(service.day_slots(query.doctor_id, query.date).await?))
}

pub async fn get_my_appointments(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<PatientAppointment>>, AppError> {
    let service = AppointmentListingService::new(&state);
    Ok(Json(service.patient_appointments(&identity).await?))
}

pub async fn get_doctor_schedule(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<ScheduledVisit>>, AppError> {
    let service = AppointmentListingService::new(&state);
    Ok(Json(service.doctor_schedule(&identity).await?))
}

pub async fn cancel_appointment(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    WithRejection(Path(appointment_id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentLifecycleService::new(&state);
    let appointment = service.cancel_appointment(&identity, appointment_id).await?;

    Ok(Json(json!({
        "message": "Appointment cancelled",
        "appointment": appointment,
    })))
}
