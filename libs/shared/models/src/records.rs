use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Free-form findings attached to a medical record; stored as a JSON blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicalData {
    pub symptoms: String,
    pub treatment: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_id: Uuid,
    pub visit_date: NaiveDate,
    pub diagnosis_code: String,
    pub clinical_data: ClinicalData,
}

/// Everything needed to close a visit in one unit of work.
#[derive(Debug, Clone)]
pub struct VisitCompletion {
    pub appointment_id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub visit_date: NaiveDate,
    pub diagnosis_code: String,
    pub clinical_data: ClinicalData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub visit_date: NaiveDate,
    pub diagnosis_code: String,
    pub clinical_data: ClinicalData,
    pub doctor_name: String,
    pub specialization: String,
}
