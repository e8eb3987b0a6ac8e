use axum::{
    routing::{get, post, put},
    Router,
};

use shared_utils::extractor::guarded;
use shared_utils::guard::Access;
use shared_utils::AppState;

use crate::handlers;

pub fn appointment_routes(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/booked", get(handlers::get_booked_slots))
        .route("/slots", get(handlers::get_day_slots));

    let patient_routes = Router::new()
        .route("/", post(handlers::book_appointment))
        .route("/my", get(handlers::get_my_appointments))
        .route("/{appointment_id}/cancel", put(handlers::cancel_appointment));

    let doctor_routes = Router::new().route("/doctor", get(handlers::get_doctor_schedule));

    Router::new()
        .merge(public_routes)
        .merge(guarded(patient_routes, &state, Access::PATIENT))
        .merge(guarded(doctor_routes, &state, Access::DOCTOR))
        .with_state(state)
}
