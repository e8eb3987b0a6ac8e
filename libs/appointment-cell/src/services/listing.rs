use std::sync::Arc;

use chrono::Local;
use tracing::debug;

use shared_database::ClinicStore;
use shared_models::auth::Identity;
use shared_models::scheduling::{PatientAppointment, ScheduledVisit};
use shared_utils::AppState;

use crate::models::AppointmentError;

pub struct AppointmentListingService {
    store: Arc<dyn ClinicStore>,
}

impl AppointmentListingService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: Arc::clone(&state.store),
        }
    }

    /// The calling patient's appointments, newest first, in every status.
    pub async fn patient_appointments(&self, identity: &Identity) -> Result<Vec<PatientAppointment>, AppointmentError> {
        let Identity::Patient { account_id } = *identity else {
            return Err(AppointmentError::NotPatient);
        };
        let Some(patient) = self.store.patient_by_account(account_id).await? else {
            return Err(AppointmentError::NotPatient);
        };

        Ok(self.store.patient_appointments(patient.id).await?)
    }

    /// The calling doctor's scheduled visits from today on, oldest first.
    pub async fn doctor_schedule(&self, identity: &Identity) -> Result<Vec<ScheduledVisit>, AppointmentError> {
        let Identity::Doctor { account_id } = *identity else {
            return Err(AppointmentError::DoctorProfileMissing);
        };
        let doctor = self
            .store
            .doctor_by_account(account_id)
            .await?
            .ok_or(AppointmentError::DoctorProfileMissing)?;

        let today = Local::now().date_naive();
        let visits = self.store.doctor_schedule(doctor.id, today).await?;
        debug!("Doctor {} has {} upcoming visits", doctor.id, visits.len());
        Ok(visits)
    }
}
