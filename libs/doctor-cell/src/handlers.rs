use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use shared_models::auth::Identity;
use shared_models::directory::{AdminDoctorListing, DoctorListing, Specialization};
use shared_models::error::AppError;
use shared_utils::AppState;

use crate::models::{CreateDoctorRequest, CreateSpecializationRequest, UpdateDoctorRequest};
use crate::services::admin::AdminDirectoryService;
use crate::services::directory::DirectoryService;

// ==============================================================================
// PUBLIC DIRECTORY
// ==============================================================================

pub async fn list_specializations(
    State(state): State<AppState>,
) -> Result<Json<Vec<Specialization>>, AppError> {
    let service = DirectoryService::new(&state);
    Ok(Json(service.specializations().await?))
}

pub async fn list_doctors(State(state): State<AppState>) -> Result<Json<Vec<DoctorListing>>, AppError> {
    let service = DirectoryService::new(&state);
    Ok(Json(service.doctors().await?))
}

// ==============================================================================
// ADMINISTRATION
// ==============================================================================

pub async fn list_admin_doctors(
    State(state): State<AppState>,
) -> Result<Json<Vec<AdminDoctorListing>>, AppError> {
    let service = AdminDirectoryService::new(&state);
    Ok(Json(service.doctors().await?))
}

pub async fn get_admin_doctor(
    State(state): State<AppState>,
    WithRejection(Path(doctor_id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Json<AdminDoctorListing>, AppError> {
    let service = AdminDirectoryService::new(&state);
    Ok(Json(service.doctor(doctor_id).await?))
}

pub async fn create_doctor(
    State(state): State<AppState>,
    Extension(admin): Extension<Identity>,
    WithRejection(Json(request), _): WithRejection<Json<CreateDoctorRequest>, AppError>,
) -> Result<(StatusCode, Json<AdminDoctorListing>), AppError> {
    let service = AdminDirectoryService::new(&state);
    let doctor = service.create_doctor(request).await?;

    info!("Admin {} created doctor {}", admin.account_id(), doctor.id);
    Ok((StatusCode::CREATED, Json(doctor)))
}

pub async fn update_doctor(
    State(state): State<AppState>,
    Extension(admin): Extension<Identity>,
    WithRejection(Path(doctor_id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateDoctorRequest>, AppError>,
) -> Result<Json<AdminDoctorListing>, AppError> {
    let service = AdminDirectoryService::new(&state);
    let doctor = service.update_doctor(doctor_id, request).await?;

    info!("Admin {} updated doctor {}", admin.account_id(), doctor_id);
    Ok(Json(doctor))
}

pub async fn delete_doctor(
    State(state): State<AppState>,
    Extension(admin): Extension<Identity>,
    WithRejection(Path(doctor_id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Json<Value>, AppError> {
    let service = AdminDirectoryService::new(&state);
    service.delete_doctor(doctor_id).await?;

    info!("Admin {} removed doctor {}", admin.account_id(), doctor_id);
    Ok(Json(json!({ "message": "Doctor removed" })))
}

pub async fn create_specialization(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<CreateSpecializationRequest>, AppError>,
) -> Result<(StatusCode, Json<Specialization>), AppError> {
    let service = AdminDirectoryService::new(&state);
    let specialization = service.create_specialization(&request.name).await?;
    Ok((StatusCode::CREATED, Json(specialization)))
}

pub async fn delete_specialization(
    State(state): State<AppState>,
    WithRejection(Path(specialization_id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Json<Value>, AppError> {
    let service = AdminDirectoryService::new(&state);
    service.delete_specialization(specialization_id).await?;
    Ok(Json(json!({ "message": "Specialization deleted" })))
}
