use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use shared_database::{ClinicStore, StoreError};
use shared_models::auth::Identity;
use shared_models::scheduling::{Appointment, BookedSlot, NewAppointment};
use shared_utils::validation::parse_timestamp;
use shared_utils::AppState;

use crate::models::{AppointmentError, BookAppointmentRequest, SlotView};
use crate::services::slots::day_grid;

pub struct AppointmentBookingService {
    store: Arc<dyn ClinicStore>,
}

impl AppointmentBookingService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: Arc::clone(&state.store),
        }
    }

    /// Books `request.date` with the doctor for the calling patient.
    ///
    /// The free-slot check and the insert happen inside the store as one unit,
    /// so of two racing requests for the same slot exactly one succeeds.
    #[instrument(skip(self, request), fields(doctor_id = %request.doctor_id))]
    pub async fn book_appointment(
        &self,
        identity: &Identity,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        let Identity::Patient { account_id } = *identity else {
            return Err(AppointmentError::NotPatient);
        };
        let patient = self
            .store
            .patient_by_account(account_id)
            .await?
            .ok_or(AppointmentError::NotPatient)?;

        let appointment_date = parse_timestamp(&request.date)?;

        if self.store.doctor(request.doctor_id).await?.is_none() {
            return Err(AppointmentError::DoctorNotFound);
        }

        let appointment = self
            .store
            .book_slot(NewAppointment {
                doctor_id: request.doctor_id,
                patient_id: patient.id,
                appointment_date,
            })
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => {
                    debug!("Slot {} already taken", appointment_date);
                    AppointmentError::SlotTaken
                }
                StoreError::NotFound(_) => AppointmentError::DoctorNotFound,
                other => AppointmentError::Store(other),
            })?;

        info!("Appointment {} booked for {}", appointment.id, appointment.appointment_date);
        Ok(appointment)
    }

    /// Every occupying appointment of the doctor on `date`, on the grid or not.
    pub async fn booked_slots(&self, doctor_id: Uuid, date: NaiveDate) -> Result<Vec<BookedSlot>, AppointmentError> {
        let slots = self.store.booked_slots(doctor_id, date).await?;
        Ok(slots
            .into_iter()
            .map(|appointment_date| BookedSlot { appointment_date })
            .collect())
    }

    pub async fn day_slots(&self, doctor_id: Uuid, date: NaiveDate) -> Result<Vec<SlotView>, AppointmentError> {
        if self.store.doctor(doctor_id).await?.is_none() {
            return Err(AppointmentError::DoctorNotFound);
        }

        let booked = self.store.booked_slots(doctor_id, date).await?;
        Ok(day_grid(date, &booked))
    }
}
