use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;
use tracing::debug;

use shared_models::auth::TokenResponse;
use shared_models::error::AppError;
use shared_utils::AppState;

use crate::models::{LoginRequest, RegisterRequest};
use crate::services::account::AuthService;

pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<RegisterRequest>, AppError>,
) -> Result<Json<TokenResponse>, AppError> {
    debug!("Registration request for role {}", request.role);

    let service = AuthService::new(&state);
    Ok(Json(service.register(request).await?))
}

pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<LoginRequest>, AppError>,
) -> Result<Json<TokenResponse>, AppError> {
    let service = AuthService::new(&state);
    Ok(Json(service.login(request).await?))
}
