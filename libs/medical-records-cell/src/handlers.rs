use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use tracing::debug;
use uuid::Uuid;

use shared_models::auth::Identity;
use shared_models::error::AppError;
use shared_models::records::{HistoryEntry, MedicalRecord};
use shared_utils::AppState;

use crate::models::CompleteVisitRequest;
use crate::services::records::MedicalRecordService;

pub async fn complete_visit(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    WithRejection(Json(request), _): WithRejection<Json<CompleteVisitRequest>, AppError>,
) -> Result<(StatusCode, Json<MedicalRecord>), AppError> {
    let service = MedicalRecordService::new(&state);
    let record = service.complete_visit(&identity, request).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn get_my_records(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<HistoryEntry>>, AppError> {
    let service = MedicalRecordService::new(&state);
    Ok(Json(service.my_history(&identity).await?))
}

pub async fn get_patient_records(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    WithRejection(Path(patient_id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Json<Vec<HistoryEntry>>, AppError> {
    debug!("Doctor {} reads history of patient {}", identity.account_id(), patient_id);

    let service = MedicalRecordService::new(&state);
    Ok(Json(service.patient_history(patient_id).await?))
}
