use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_database::{ClinicStore, StoreError};
use shared_models::auth::Identity;
use shared_models::scheduling::{Appointment, AppointmentStatus};
use shared_utils::AppState;

use crate::models::AppointmentError;

pub struct AppointmentLifecycleService {
    store: Arc<dyn ClinicStore>,
}

impl AppointmentLifecycleService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: Arc::clone(&state.store),
        }
    }

    pub fn validate_status_transition(
        current: AppointmentStatus,
        next: AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        if !current.can_transition_to(next) {
            warn!("Invalid status transition attempted: {} -> {}", current, next);
            return Err(AppointmentError::InvalidStatusTransition(current));
        }
        Ok(())
    }

    /// Cancels a scheduled appointment owned by the calling patient. The slot
    /// becomes bookable again.
    pub async fn cancel_appointment(
        &self,
        identity: &Identity,
        appointment_id: Uuid,
    ) -> Result<Appointment, AppointmentError> {
        let Identity::Patient { account_id } = *identity else {
            return Err(AppointmentError::NotOwner);
        };
        let patient = self
            .store
            .patient_by_account(account_id)
            .await?
            .ok_or(AppointmentError::NotOwner)?;

        let appointment = self
            .store
            .appointment(appointment_id)
            .await?
            .ok_or(AppointmentError::NotFound)?;

        if appointment.patient_id != patient.id {
            debug!("Patient {} tried to cancel appointment {}", patient.id, appointment_id);
            return Err(AppointmentError::NotOwner);
        }

        Self::validate_status_transition(appointment.status, AppointmentStatus::Cancelled)?;

        let cancelled = self
            .store
            .cancel_appointment(appointment_id, patient.id)
            .await
            .map_err(|e| match e {
                // Completed or cancelled between the read and the write.
                StoreError::Conflict(_) => AppointmentError::InvalidStatusTransition(appointment.status),
                StoreError::NotFound(_) => AppointmentError::NotFound,
                other => AppointmentError::Store(other),
            })?;

        info!("Appointment {} cancelled", appointment_id);
        Ok(cancelled)
    }
}
