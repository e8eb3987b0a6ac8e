use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use shared_database::StoreError;
use shared_models::error::AppError;
use shared_models::scheduling::AppointmentStatus;
use shared_utils::validation::InvalidInput;

/// Note stamped on every record written through the API.
pub const WEB_RECORD_NOTE: &str = "Created in web system";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteVisitRequest {
    /// Redundant with the appointment; checked when present.
    pub patient_id: Option<Uuid>,
    pub appointment_id: Uuid,
    pub diagnosis: String,
    #[serde(default)]
    pub symptoms: String,
    #[serde(default)]
    pub treatment: String,
}

#[derive(Debug, Error)]
pub enum MedicalRecordError {
    #[error("Doctor profile not found")]
    DoctorProfileMissing,

    #[error("Patient not found")]
    PatientNotFound,

    #[error("Appointment not found")]
    AppointmentNotFound,

    #[error("Appointment belongs to another doctor")]
    NotTreatingDoctor,

    #[error("patientId does not match the appointment")]
    PatientMismatch,

    #[error("Appointment is {0}, only scheduled visits can be completed")]
    NotScheduled(AppointmentStatus),

    #[error(transparent)]
    Invalid(#[from] InvalidInput),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<MedicalRecordError> for AppError {
    fn from(err: MedicalRecordError) -> Self {
        match err {
            MedicalRecordError::DoctorProfileMissing
            | MedicalRecordError::PatientNotFound
            | MedicalRecordError::AppointmentNotFound => AppError::NotFound(err.to_string()),
            MedicalRecordError::NotTreatingDoctor => AppError::Forbidden(err.to_string()),
            MedicalRecordError::PatientMismatch => AppError::ValidationError(err.to_string()),
            MedicalRecordError::NotScheduled(_) => AppError::Conflict(err.to_string()),
            MedicalRecordError::Invalid(invalid) => invalid.into(),
            MedicalRecordError::Store(store) => store.into(),
        }
    }
}
