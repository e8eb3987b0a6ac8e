use serde::Deserialize;
use thiserror::Error;

use shared_database::StoreError;
use shared_models::error::AppError;
use shared_utils::validation::InvalidInput;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub full_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Accepted for compatibility with clients that echo the whole profile back.
    pub email: Option<String>,
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Profile not found")]
    NotFound,

    #[error("Email cannot be changed")]
    EmailImmutable,

    #[error("Only patients have an address")]
    AddressNotApplicable,

    #[error(transparent)]
    Invalid(#[from] InvalidInput),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ProfileError> for AppError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::NotFound => AppError::NotFound(err.to_string()),
            ProfileError::EmailImmutable | ProfileError::AddressNotApplicable => {
                AppError::ValidationError(err.to_string())
            }
            ProfileError::Invalid(invalid) => invalid.into(),
            ProfileError::Store(store) => store.into(),
        }
    }
}
