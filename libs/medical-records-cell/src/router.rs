use axum::{
    routing::{get, post},
    Router,
};

use shared_utils::extractor::guarded;
use shared_utils::guard::Access;
use shared_utils::AppState;

use crate::handlers;

pub fn medical_record_routes(state: AppState) -> Router {
    let doctor_routes = Router::new()
        .route("/", post(handlers::complete_visit))
        .route("/patient/{patient_id}", get(handlers::get_patient_records));

    let patient_routes = Router::new().route("/my", get(handlers::get_my_records));

    Router::new()
        .merge(guarded(doctor_routes, &state, Access::DOCTOR))
        .merge(guarded(patient_routes, &state, Access::PATIENT))
        .with_state(state)
}
