use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use shared_config::{AppConfig, DatabaseBackend};
use shared_database::{ClinicStore, MemoryStore};
use shared_models::accounts::{Account, NewAccount, NewRoleDetail};
use shared_models::auth::{Identity, Role};
use shared_models::directory::Specialization;

use crate::jwt::{issue_token, issue_token_at};
use crate::password::hash_password;
use crate::state::AppState;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_service_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_service_key: "test-service-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_service_key: self.supabase_service_key.clone(),
            jwt_secret: self.jwt_secret.clone(),
            port: 0,
            database_backend: DatabaseBackend::Memory,
            admin_email: None,
            admin_password: None,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

/// A seeded account plus a live bearer token for it.
#[derive(Debug, Clone)]
pub struct TestAccount {
    pub account: Account,
    /// PatientDetail or DoctorDetail id; `None` for admins.
    pub detail_id: Option<Uuid>,
    pub token: String,
}

impl TestAccount {
    pub fn identity(&self) -> Identity {
        Identity::new(self.account.id, self.account.role)
    }

    pub fn detail_id(&self) -> Uuid {
        self.detail_id.unwrap_or_default()
    }
}

/// In-memory clinic wired the same way the server wires a real one.
pub struct TestClinic {
    pub config: TestConfig,
    pub store: Arc<MemoryStore>,
    pub state: AppState,
}

impl Default for TestClinic {
    fn default() -> Self {
        Self::new()
    }
}

impl TestClinic {
    pub fn new() -> Self {
        let config = TestConfig::default();
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(config.to_arc(), store.clone());
        Self { config, store, state }
    }

    pub fn token_for(&self, identity: &Identity) -> String {
        issue_token(identity, &self.config.jwt_secret).expect("test token")
    }

    pub fn expired_token_for(&self, identity: &Identity) -> String {
        let issued = Utc::now() - Duration::hours(48);
        issue_token_at(identity, &self.config.jwt_secret, issued).expect("test token")
    }

    pub async fn seed_specialization(&self, name: &str) -> Specialization {
        self.store
            .create_specialization(name)
            .await
            .expect("seed specialization")
    }

    pub async fn seed_patient(&self, email: &str, full_name: &str) -> TestAccount {
        self.seed(
            email,
            full_name,
            NewRoleDetail::Patient {
                date_of_birth: None,
                address: Some("12 Linden Street".to_string()),
                gender: Some("female".to_string()),
            },
        )
        .await
    }

    pub async fn seed_doctor(&self, email: &str, full_name: &str, specialization_id: Uuid) -> TestAccount {
        self.seed(
            email,
            full_name,
            NewRoleDetail::Doctor {
                specialization_id,
                bio: Some("General practice".to_string()),
                cabinet_number: Some("101".to_string()),
            },
        )
        .await
    }

    pub async fn seed_admin(&self, email: &str) -> TestAccount {
        self.seed(email, "Clinic Admin", NewRoleDetail::Admin).await
    }

    async fn seed(&self, email: &str, full_name: &str, details: NewRoleDetail) -> TestAccount {
        let account = self
            .store
            .create_account(NewAccount {
                email: email.to_string(),
                password_hash: hash_password(TEST_PASSWORD).await.expect("hash"),
                full_name: full_name.to_string(),
                phone: Some("+1 555 0100".to_string()),
                details,
            })
            .await
            .expect("seed account");

        let detail_id = match account.role {
            Role::Patient => self
                .store
                .patient_by_account(account.id)
                .await
                .expect("patient lookup")
                .map(|p| p.id),
            Role::Doctor => self
                .store
                .doctor_by_account(account.id)
                .await
                .expect("doctor lookup")
                .map(|d| d.id),
            Role::Admin => None,
        };

        let token = self.token_for(&Identity::new(account.id, account.role));
        TestAccount { account, detail_id, token }
    }
}

/// Drives `router` with one request and returns the status plus the JSON body
/// (`Value::Null` when the body is empty).
pub async fn send(
    router: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = router.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    (status, json)
}
