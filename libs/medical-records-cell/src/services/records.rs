use std::sync::Arc;

use chrono::Local;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use shared_database::{ClinicStore, StoreError};
use shared_models::auth::Identity;
use shared_models::records::{ClinicalData, HistoryEntry, MedicalRecord, VisitCompletion};
use shared_models::scheduling::AppointmentStatus;
use shared_utils::validation::require_non_blank;
use shared_utils::AppState;

use crate::models::{CompleteVisitRequest, MedicalRecordError, WEB_RECORD_NOTE};

pub struct MedicalRecordService {
    store: Arc<dyn ClinicStore>,
}

impl MedicalRecordService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: Arc::clone(&state.store),
        }
    }

    /// Writes the medical record and closes the appointment as one unit.
    ///
    /// Only the doctor bound to the appointment may do this. The record's
    /// patient is always the appointment's patient.
    #[instrument(skip(self, identity, request), fields(appointment_id = %request.appointment_id))]
    pub async fn complete_visit(
        &self,
        identity: &Identity,
        request: CompleteVisitRequest,
    ) -> Result<MedicalRecord, MedicalRecordError> {
        let Identity::Doctor { account_id } = *identity else {
            return Err(MedicalRecordError::NotTreatingDoctor);
        };
        let doctor = self
            .store
            .doctor_by_account(account_id)
            .await?
            .ok_or(MedicalRecordError::DoctorProfileMissing)?;

        let diagnosis_code = require_non_blank("Diagnosis", &request.diagnosis)?;

        let appointment = self
            .store
            .appointment(request.appointment_id)
            .await?
            .ok_or(MedicalRecordError::AppointmentNotFound)?;

        if appointment.doctor_id != doctor.id {
            warn!("Doctor {} tried to complete another doctor's visit", doctor.id);
            return Err(MedicalRecordError::NotTreatingDoctor);
        }
        if request.patient_id.is_some_and(|p| p != appointment.patient_id) {
            return Err(MedicalRecordError::PatientMismatch);
        }
        if !appointment.status.can_transition_to(AppointmentStatus::Completed) {
            return Err(MedicalRecordError::NotScheduled(appointment.status));
        }

        let visit = VisitCompletion {
            appointment_id: appointment.id,
            doctor_id: doctor.id,
            patient_id: appointment.patient_id,
            visit_date: Local::now().date_naive(),
            diagnosis_code,
            clinical_data: ClinicalData {
                symptoms: request.symptoms.trim().to_string(),
                treatment: request.treatment.trim().to_string(),
                notes: WEB_RECORD_NOTE.to_string(),
            },
        };

        let record = self.store.complete_visit(visit).await.map_err(|e| match e {
            // Cancelled or completed between the read and the write.
            StoreError::Conflict(_) => MedicalRecordError::NotScheduled(appointment.status),
            StoreError::NotFound(_) => MedicalRecordError::AppointmentNotFound,
            other => MedicalRecordError::Store(other),
        })?;

        info!("Medical record {} written for appointment {}", record.id, record.appointment_id);
        Ok(record)
    }

    /// The calling patient's own history, newest first.
    pub async fn my_history(&self, identity: &Identity) -> Result<Vec<HistoryEntry>, MedicalRecordError> {
        let Identity::Patient { account_id } = *identity else {
            return Err(MedicalRecordError::PatientNotFound);
        };
        let patient = self
            .store
            .patient_by_account(account_id)
            .await?
            .ok_or(MedicalRecordError::PatientNotFound)?;

        Ok(self.store.medical_history(patient.id).await?)
    }

    /// Any patient's history, for doctors.
    pub async fn patient_history(&self, patient_id: Uuid) -> Result<Vec<HistoryEntry>, MedicalRecordError> {
        if self.store.patient(patient_id).await?.is_none() {
            return Err(MedicalRecordError::PatientNotFound);
        }

        let history = self.store.medical_history(patient_id).await?;
        debug!("Patient {} has {} records", patient_id, history.len());
        Ok(history)
    }
}
