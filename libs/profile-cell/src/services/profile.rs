use std::sync::Arc;

use tracing::{debug, info, instrument};

use shared_database::ClinicStore;
use shared_models::accounts::{Profile, ProfileUpdate};
use shared_models::auth::{Identity, Role};
use shared_utils::validation::{normalize_email, optional_text, require_non_blank};
use shared_utils::AppState;

use crate::models::{ProfileError, UpdateProfileRequest};

pub struct ProfileService {
    store: Arc<dyn ClinicStore>,
}

impl ProfileService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: Arc::clone(&state.store),
        }
    }

    pub async fn get_profile(&self, identity: &Identity) -> Result<Profile, ProfileError> {
        debug!("Loading profile for account {}", identity.account_id());

        self.store
            .profile(identity.account_id())
            .await?
            .ok_or(ProfileError::NotFound)
    }

    /// Updates name, phone and (patients only) address in one transaction.
    #[instrument(skip(self, identity, request), fields(account_id = %identity.account_id()))]
    pub async fn update_profile(
        &self,
        identity: &Identity,
        request: UpdateProfileRequest,
    ) -> Result<Profile, ProfileError> {
        let current = self.get_profile(identity).await?;

        if let Some(email) = request.email.as_deref() {
            if normalize_email(email)? != current.email {
                return Err(ProfileError::EmailImmutable);
            }
        }

        let address = optional_text(request.address);
        if address.is_some() && identity.role() != Role::Patient {
            return Err(ProfileError::AddressNotApplicable);
        }

        let update = ProfileUpdate {
            full_name: require_non_blank("Full name", &request.full_name)?,
            phone: optional_text(request.phone),
            address,
        };

        let profile = self.store.update_profile(identity.account_id(), update).await?;
        info!("Profile updated");
        Ok(profile)
    }
}
