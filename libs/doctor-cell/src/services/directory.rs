use std::sync::Arc;

use tracing::debug;

use shared_database::ClinicStore;
use shared_models::directory::{DoctorListing, Specialization};
use shared_utils::AppState;

use crate::models::DirectoryError;

/// Public, read-only view of the clinic's specializations and doctors.
pub struct DirectoryService {
    store: Arc<dyn ClinicStore>,
}

impl DirectoryService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: Arc::clone(&state.store),
        }
    }

    pub async fn specializations(&self) -> Result<Vec<Specialization>, DirectoryError> {
        Ok(self.store.specializations().await?)
    }

    pub async fn doctors(&self) -> Result<Vec<DoctorListing>, DirectoryError> {
        let doctors = self.store.doctor_listings().await?;
        debug!("Directory lists {} doctors", doctors.len());
        Ok(doctors)
    }
}
