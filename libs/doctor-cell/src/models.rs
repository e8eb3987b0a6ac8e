use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use shared_database::StoreError;
use shared_models::error::AppError;
use shared_utils::validation::InvalidInput;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDoctorRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub specialization_id: Uuid,
    pub bio: Option<String>,
    pub cabinet_number: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDoctorRequest {
    pub full_name: String,
    pub phone: Option<String>,
    pub specialization_id: Uuid,
    pub bio: Option<String>,
    pub cabinet_number: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSpecializationRequest {
    pub name: String,
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Specialization not found")]
    SpecializationNotFound,

    #[error("Specialization already exists")]
    SpecializationExists,

    #[error("Specialization is assigned to doctors and cannot be deleted")]
    SpecializationInUse,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Doctor has appointments and cannot be removed")]
    DoctorHasAppointments,

    #[error(transparent)]
    Invalid(#[from] InvalidInput),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::DoctorNotFound | DirectoryError::SpecializationNotFound => {
                AppError::NotFound(err.to_string())
            }
            DirectoryError::SpecializationExists
            | DirectoryError::SpecializationInUse
            | DirectoryError::EmailTaken
            | DirectoryError::DoctorHasAppointments => AppError::Conflict(err.to_string()),
            DirectoryError::Invalid(invalid) => invalid.into(),
            DirectoryError::Hashing(_) => AppError::Internal(err.to_string()),
            DirectoryError::Store(store) => store.into(),
        }
    }
}
