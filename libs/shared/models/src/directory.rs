use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specialization {
    pub id: Uuid,
    pub name: String,
}

/// Public doctor card. Never carries credentials or contact data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorListing {
    pub id: Uuid,
    pub full_name: String,
    pub specialization: String,
    pub bio: Option<String>,
    pub cabinet_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminDoctorListing {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub specialization_id: Uuid,
    pub specialization: String,
    pub bio: Option<String>,
    pub cabinet_number: Option<String>,
}

impl From<AdminDoctorListing> for DoctorListing {
    fn from(row: AdminDoctorListing) -> Self {
        DoctorListing {
            id: row.id,
            full_name: row.full_name,
            specialization: row.specialization,
            bio: row.bio,
            cabinet_number: row.cabinet_number,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoctorUpdate {
    pub full_name: String,
    pub phone: Option<String>,
    pub specialization_id: Uuid,
    pub bio: Option<String>,
    pub cabinet_number: Option<String>,
}
