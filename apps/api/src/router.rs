use axum::{routing::get, Router};

use appointment_cell::appointment_routes;
use auth_cell::auth_routes;
use doctor_cell::{admin_routes, directory_routes};
use medical_records_cell::medical_record_routes;
use profile_cell::profile_routes;
use shared_utils::AppState;

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/auth", auth_routes(state.clone()))
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/medical-records", medical_record_routes(state.clone()))
        .nest("/users", profile_routes(state.clone()))
        .nest("/admin", admin_routes(state.clone()))
        .merge(directory_routes(state));

    Router::new()
        .route("/", get(|| async { "Polyclinic API Running" }))
        .nest("/api", api)
}
