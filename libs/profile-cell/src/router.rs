use axum::{routing::get, Router};

use shared_utils::extractor::guarded;
use shared_utils::guard::Access;
use shared_utils::AppState;

use crate::handlers;

pub fn profile_routes(state: AppState) -> Router {
    let routes = Router::new().route(
        "/profile",
        get(handlers::get_profile).put(handlers::update_profile),
    );

    guarded(routes, &state, Access::Authenticated).with_state(state)
}
