use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Doctor => "doctor",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "patient" => Ok(Role::Patient),
            "doctor" => Ok(Role::Doctor),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Verified caller identity, decoded from a signed assertion.
///
/// Trusted for the duration of a single request only; it is never re-checked
/// against the store mid-request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    Patient { account_id: Uuid },
    Doctor { account_id: Uuid },
    Admin { account_id: Uuid },
}

impl Identity {
    pub fn new(account_id: Uuid, role: Role) -> Self {
        match role {
            Role::Patient => Identity::Patient { account_id },
            Role::Doctor => Identity::Doctor { account_id },
            Role::Admin => Identity::Admin { account_id },
        }
    }

    pub fn account_id(&self) -> Uuid {
        match *self {
            Identity::Patient { account_id }
            | Identity::Doctor { account_id }
            | Identity::Admin { account_id } => account_id,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Identity::Patient { .. } => Role::Patient,
            Identity::Doctor { .. } => Role::Doctor,
            Identity::Admin { .. } => Role::Admin,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtHeader {
    pub alg: String,
    pub typ: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: Uuid,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl JwtClaims {
    pub fn identity(&self) -> Identity {
        Identity::new(self.sub, self.role)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub role: Role,
}
