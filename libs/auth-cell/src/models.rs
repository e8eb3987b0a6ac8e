use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use shared_database::StoreError;
use shared_models::auth::Role;
use shared_models::error::AppError;
use shared_utils::jwt::TokenError;
use shared_utils::validation::InvalidInput;

/// Registration body. Role detail fields sit next to the account fields;
/// only the ones matching `role` are read.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub gender: Option<String>,
    pub specialization_id: Option<Uuid>,
    pub bio: Option<String>,
    pub cabinet_number: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailTaken,

    /// Same message for unknown email and wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Administrator accounts cannot be self-registered")]
    AdminRegistration,

    #[error("specializationId is required for doctors")]
    MissingSpecialization,

    #[error("Specialization not found")]
    UnknownSpecialization,

    #[error(transparent)]
    Invalid(#[from] InvalidInput),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailTaken => AppError::Conflict(err.to_string()),
            AuthError::InvalidCredentials => AppError::Unauthorized(err.to_string()),
            AuthError::AdminRegistration => AppError::Forbidden(err.to_string()),
            AuthError::MissingSpecialization | AuthError::UnknownSpecialization => {
                AppError::ValidationError(err.to_string())
            }
            AuthError::Invalid(invalid) => invalid.into(),
            AuthError::Hashing(_) | AuthError::Token(_) => AppError::Internal(err.to_string()),
            AuthError::Store(store) => store.into(),
        }
    }
}
