use axum::{
    extract::{Extension, State},
    Json,
};
use axum_extra::extract::WithRejection;
use serde_json::{json, Value};

use shared_models::accounts::Profile;
use shared_models::auth::Identity;
use shared_models::error::AppError;
use shared_utils::AppState;

use crate::models::UpdateProfileRequest;
use crate::services::ProfileService;

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Profile>, AppError> {
    let service = ProfileService::new(&state);
    Ok(Json(service.get_profile(&identity).await?))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateProfileRequest>, AppError>,
) -> Result<Json<Value>, AppError> {
    let service = ProfileService::new(&state);
    let profile = service.update_profile(&identity, request).await?;

    Ok(Json(json!({
        "message": "Profile updated",
        "profile": profile,
    })))
}
