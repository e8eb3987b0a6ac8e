use axum::{
    routing::{delete, get, post},
    Router,
};

use shared_utils::extractor::guarded;
use shared_utils::guard::Access;
use shared_utils::AppState;

use crate::handlers;

/// Public listings, mounted at the API root.
pub fn directory_routes(state: AppState) -> Router {
    Router::new()
        .route("/specializations", get(handlers::list_specializations))
        .route("/doctors", get(handlers::list_doctors))
        .with_state(state)
}

pub fn admin_routes(state: AppState) -> Router {
    let routes = Router::new()
        .route("/doctors", get(handlers::list_admin_doctors).post(handlers::create_doctor))
        .route(
            "/doctors/{doctor_id}",
            get(handlers::get_admin_doctor)
                .put(handlers::update_doctor)
                .delete(handlers::delete_doctor),
        )
        .route("/specializations", post(handlers::create_specialization))
        .route("/specializations/{specialization_id}", delete(handlers::delete_specialization));

    guarded(routes, &state, Access::ADMIN).with_state(state)
}
