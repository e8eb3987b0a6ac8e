use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use shared_database::{ClinicStore, StoreError};
use shared_models::accounts::{NewAccount, NewRoleDetail};
use shared_models::auth::{Identity, Role, TokenResponse};
use shared_utils::jwt::issue_token;
use shared_utils::password::{hash_password, verify_password};
use shared_utils::validation::{check_password, normalize_email, optional_text, require_non_blank};
use shared_utils::AppState;

use crate::models::{AuthError, LoginRequest, RegisterRequest};

pub struct AuthService {
    store: Arc<dyn ClinicStore>,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: Arc::clone(&state.store),
            jwt_secret: state.config.jwt_secret.clone(),
        }
    }

    /// Creates a patient or doctor account together with its detail row and
    /// signs the caller in.
    #[instrument(skip(self, request), fields(role = %request.role))]
    pub async fn register(&self, request: RegisterRequest) -> Result<TokenResponse, AuthError> {
        let details = match request.role {
            Role::Admin => return Err(AuthError::AdminRegistration),
            Role::Patient => NewRoleDetail::Patient {
                date_of_birth: request.date_of_birth,
                address: optional_text(request.address),
                gender: optional_text(request.gender),
            },
            Role::Doctor => NewRoleDetail::Doctor {
                specialization_id: request.specialization_id.ok_or(AuthError::MissingSpecialization)?,
                bio: optional_text(request.bio),
                cabinet_number: optional_text(request.cabinet_number),
            },
        };

        let email = normalize_email(&request.email)?;
        check_password(&request.password)?;
        let full_name = require_non_blank("Full name", &request.full_name)?;

        if self.store.find_account_by_email(&email).await?.is_some() {
            debug!("Registration refused, email in use");
            return Err(AuthError::EmailTaken);
        }

        let password_hash = hash_password(&request.password)
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?;

        let account = self
            .store
            .create_account(NewAccount {
                email,
                password_hash,
                full_name,
                phone: optional_text(request.phone),
                details,
            })
            .await
            .map_err(|e| match e {
                // Lost a race with another registration of the same email.
                StoreError::Conflict(_) => AuthError::EmailTaken,
                StoreError::NotFound(_) => AuthError::UnknownSpecialization,
                other => AuthError::Store(other),
            })?;

        info!("Registered {} account {}", account.role, account.id);
        self.token_for(Identity::new(account.id, account.role))
    }

    #[instrument(skip(self, request))]
    pub async fn login(&self, request: LoginRequest) -> Result<TokenResponse, AuthError> {
        let email = normalize_email(&request.email).map_err(|_| AuthError::InvalidCredentials)?;

        let Some(account) = self.store.find_account_by_email(&email).await? else {
            debug!("Login for unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        let valid = verify_password(&request.password, &account.password_hash)
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        if !valid {
            debug!("Login with wrong password for account {}", account.id);
            return Err(AuthError::InvalidCredentials);
        }

        self.token_for(Identity::new(account.id, account.role))
    }

    /// Provisions the administrator account when it does not exist yet.
    /// Returns whether an account was created.
    #[instrument(skip(self, password))]
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<bool, AuthError> {
        let email = normalize_email(email)?;
        check_password(password)?;

        if let Some(existing) = self.store.find_account_by_email(&email).await? {
            if existing.role != Role::Admin {
                warn!("Bootstrap email belongs to a {} account; no administrator created", existing.role);
            }
            return Ok(false);
        }

        let password_hash = hash_password(password).await.map_err(|e| AuthError::Hashing(e.to_string()))?;
        let account = self
            .store
            .create_account(NewAccount {
                email,
                password_hash,
                full_name: "Administrator".to_string(),
                phone: None,
                details: NewRoleDetail::Admin,
            })
            .await?;

        info!("Administrator account {} provisioned", account.id);
        Ok(true)
    }

    fn token_for(&self, identity: Identity) -> Result<TokenResponse, AuthError> {
        Ok(TokenResponse {
            token: issue_token(&identity, &self.jwt_secret)?,
            role: identity.role(),
        })
    }
}
