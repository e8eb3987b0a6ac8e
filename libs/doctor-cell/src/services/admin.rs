use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use shared_database::{ClinicStore, StoreError};
use shared_models::accounts::{NewAccount, NewRoleDetail};
use shared_models::directory::{AdminDoctorListing, DoctorUpdate, Specialization};
use shared_utils::password::hash_password;
use shared_utils::validation::{check_password, normalize_email, optional_text, require_non_blank};
use shared_utils::AppState;

use crate::models::{CreateDoctorRequest, DirectoryError, UpdateDoctorRequest};

/// Administrator-only management of doctors and specializations.
pub struct AdminDirectoryService {
    store: Arc<dyn ClinicStore>,
}

impl AdminDirectoryService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: Arc::clone(&state.store),
        }
    }

    pub async fn doctors(&self) -> Result<Vec<AdminDoctorListing>, DirectoryError> {
        Ok(self.store.admin_doctor_listings().await?)
    }

    pub async fn doctor(&self, doctor_id: Uuid) -> Result<AdminDoctorListing, DirectoryError> {
        self.store
            .admin_doctor_listing(doctor_id)
            .await?
            .ok_or(DirectoryError::DoctorNotFound)
    }

    /// Creates the account and doctor detail in one unit of work.
    #[instrument(skip(self, request))]
    pub async fn create_doctor(&self, request: CreateDoctorRequest) -> Result<AdminDoctorListing, DirectoryError> {
        let email = normalize_email(&request.email)?;
        check_password(&request.password)?;
        let full_name = require_non_blank("Full name", &request.full_name)?;

        let password_hash = hash_password(&request.password)
            .await
            .map_err(|e| DirectoryError::Hashing(e.to_string()))?;

        let account = self
            .store
            .create_account(NewAccount {
                email,
                password_hash,
                full_name,
                phone: optional_text(request.phone),
                details: NewRoleDetail::Doctor {
                    specialization_id: request.specialization_id,
                    bio: optional_text(request.bio),
                    cabinet_number: optional_text(request.cabinet_number),
                },
            })
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => DirectoryError::EmailTaken,
                StoreError::NotFound(_) => DirectoryError::SpecializationNotFound,
                other => DirectoryError::Store(other),
            })?;

        let doctor = self
            .store
            .doctor_by_account(account.id)
            .await?
            .ok_or(DirectoryError::DoctorNotFound)?;

        info!("Doctor {} created for account {}", doctor.id, account.id);
        self.doctor(doctor.id).await
    }

    pub async fn update_doctor(
        &self,
        doctor_id: Uuid,
        request: UpdateDoctorRequest,
    ) -> Result<AdminDoctorListing, DirectoryError> {
        let update = DoctorUpdate {
            full_name: require_non_blank("Full name", &request.full_name)?,
            phone: optional_text(request.phone),
            specialization_id: request.specialization_id,
            bio: optional_text(request.bio),
            cabinet_number: optional_text(request.cabinet_number),
        };

        // The store names which of doctor or specialization is missing.
        let updated = self.store.update_doctor(doctor_id, update).await?;

        info!("Doctor {} updated", doctor_id);
        Ok(updated)
    }

    /// Medical history is immutable, so a doctor with any appointment stays.
    pub async fn delete_doctor(&self, doctor_id: Uuid) -> Result<(), DirectoryError> {
        self.store.delete_doctor(doctor_id).await.map_err(|e| match e {
            StoreError::NotFound(_) => DirectoryError::DoctorNotFound,
            StoreError::Conflict(_) => DirectoryError::DoctorHasAppointments,
            other => DirectoryError::Store(other),
        })?;

        info!("Doctor {} removed", doctor_id);
        Ok(())
    }

    pub async fn create_specialization(&self, name: &str) -> Result<Specialization, DirectoryError> {
        let name = require_non_blank("Name", name)?;

        self.store.create_specialization(&name).await.map_err(|e| match e {
            StoreError::Conflict(_) => DirectoryError::SpecializationExists,
            other => DirectoryError::Store(other),
        })
    }

    pub async fn delete_specialization(&self, id: Uuid) -> Result<(), DirectoryError> {
        self.store.delete_specialization(id).await.map_err(|e| match e {
            StoreError::NotFound(_) => DirectoryError::SpecializationNotFound,
            StoreError::Conflict(_) => DirectoryError::SpecializationInUse,
            other => DirectoryError::Store(other),
        })?;

        info!("Specialization {} deleted", id);
        Ok(())
    }
}
