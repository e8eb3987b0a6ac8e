use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_database::StoreError;
use shared_models::error::AppError;
use shared_models::scheduling::AppointmentStatus;
use shared_utils::validation::InvalidInput;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookAppointmentRequest {
    pub doctor_id: Uuid,
    /// `YYYY-MM-DD HH:MM:SS`; see `shared_utils::validation::parse_timestamp`.
    pub date: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySlotsQuery {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
}

/// One entry of the advisory day grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotView {
    pub time: String,
    pub appointment_date: NaiveDateTime,
    pub available: bool,
    /// False for occupied timestamps that fall between grid points.
    pub on_grid: bool,
}

#[derive(Debug, Error)]
pub enum AppointmentError {
    #[error("Only patients can book appointments")]
    NotPatient,

    #[error("Doctor profile not found")]
    DoctorProfileMissing,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Appointment not found")]
    NotFound,

    #[error("Appointment belongs to another patient")]
    NotOwner,

    #[error("This time slot is already taken")]
    SlotTaken,

    #[error("Appointment cannot be changed in status '{0}'")]
    InvalidStatusTransition(AppointmentStatus),

    #[error(transparent)]
    Invalid(#[from] InvalidInput),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotPatient | AppointmentError::NotOwner => AppError::Forbidden(err.to_string()),
            AppointmentError::DoctorProfileMissing
            | AppointmentError::DoctorNotFound
            | AppointmentError::NotFound => AppError::NotFound(err.to_string()),
            AppointmentError::SlotTaken | AppointmentError::InvalidStatusTransition(_) => {
                AppError::Conflict(err.to_string())
            }
            AppointmentError::Invalid(invalid) => invalid.into(),
            AppointmentError::Store(store) => store.into(),
        }
    }
}
