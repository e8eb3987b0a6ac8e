use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientDetail {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub gender: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorDetail {
    pub id: Uuid,
    pub user_id: Uuid,
    pub specialization_id: Uuid,
    pub bio: Option<String>,
    pub cabinet_number: Option<String>,
}

/// Role-specific half of a new account; written in the same transaction as
/// the account row.
#[derive(Debug, Clone)]
pub enum NewRoleDetail {
    Patient {
        date_of_birth: Option<NaiveDate>,
        address: Option<String>,
        gender: Option<String>,
    },
    Doctor {
        specialization_id: Uuid,
        bio: Option<String>,
        cabinet_number: Option<String>,
    },
    Admin,
}

impl NewRoleDetail {
    pub fn role(&self) -> Role {
        match self {
            NewRoleDetail::Patient { .. } => Role::Patient,
            NewRoleDetail::Doctor { .. } => Role::Doctor,
            NewRoleDetail::Admin => Role::Admin,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub details: NewRoleDetail,
}

/// Self-service view of an account joined with its role detail row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cabinet_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    pub full_name: String,
    pub phone: Option<String>,
    /// Only meaningful for patient accounts.
    pub address: Option<String>,
}
