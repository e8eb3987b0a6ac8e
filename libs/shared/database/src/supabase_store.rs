use async_trait::async_trait;
use chrono::{Days, NaiveDate, NaiveDateTime};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::accounts::{Account, DoctorDetail, NewAccount, NewRoleDetail, PatientDetail, Profile, ProfileUpdate};
use shared_models::directory::{AdminDoctorListing, DoctorListing, DoctorUpdate, Specialization};
use shared_models::records::{HistoryEntry, MedicalRecord, VisitCompletion};
use shared_models::scheduling::{Appointment, BookedSlot, NewAppointment, PatientAppointment, ScheduledVisit};

use crate::error::{StoreError, StoreResult};
use crate::store::ClinicStore;
use crate::supabase::SupabaseClient;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// [`ClinicStore`] over PostgREST. Reads hit tables and views directly;
/// every multi-row write is a stored procedure from
/// `migrations/0001_clinic_schema.sql`, so it commits or rolls back as one.
pub struct SupabaseStore {
    supabase: SupabaseClient,
}

impl SupabaseStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    async fn select<T: DeserializeOwned>(&self, path: &str) -> StoreResult<Vec<T>> {
        self.supabase.request(Method::GET, path, None).await
    }

    async fn select_one<T: DeserializeOwned>(&self, path: &str) -> StoreResult<Option<T>> {
        let rows: Vec<T> = self.select(path).await?;
        Ok(rows.into_iter().next())
    }
}

fn day_bounds(date: NaiveDate) -> (String, String) {
    let start = date.format("%Y-%m-%dT00:00:00").to_string();
    let end = date
        .checked_add_days(Days::new(1))
        .unwrap_or(date)
        .format("%Y-%m-%dT00:00:00")
        .to_string();
    (start, end)
}

fn first_row<T>(rows: Vec<T>, missing: &str) -> StoreResult<T> {
    rows.into_iter()
        .next()
        .ok_or_else(|| StoreError::NotFound(missing.to_string()))
}

fn with_conflict_message(err: StoreError, message: &str) -> StoreError {
    match err {
        StoreError::Conflict(_) => StoreError::Conflict(message.to_string()),
        other => other,
    }
}

#[async_trait]
impl ClinicStore for SupabaseStore {
    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let path = format!(
            "/rest/v1/users?email=eq.{}&select=id,email,password_hash,full_name,phone,role",
            urlencoding::encode(email)
        );
        self.select_one(&path).await
    }

    async fn create_account(&self, account: NewAccount) -> StoreResult<Account> {
        debug!("Registering {} account via RPC", account.details.role());

        let mut args = json!({
            "p_email": account.email,
            "p_password_hash": account.password_hash,
            "p_full_name": account.full_name,
            "p_phone": account.phone,
            "p_role": account.details.role().as_str(),
        });

        match &account.details {
            NewRoleDetail::Patient { date_of_birth, address, gender } => {
                args["p_date_of_birth"] = json!(date_of_birth);
                args["p_address"] = json!(address);
                args["p_gender"] = json!(gender);
            }
            NewRoleDetail::Doctor { specialization_id, bio, cabinet_number } => {
                args["p_specialization_id"] = json!(specialization_id);
                args["p_bio"] = json!(bio);
                args["p_cabinet_number"] = json!(cabinet_number);
            }
            NewRoleDetail::Admin => {}
        }

        self.supabase.rpc("register_account", args).await
    }

    async fn patient_by_account(&self, account_id: Uuid) -> StoreResult<Option<PatientDetail>> {
        self.select_one(&format!("/rest/v1/patients?user_id=eq.{}", account_id)).await
    }

    async fn doctor_by_account(&self, account_id: Uuid) -> StoreResult<Option<DoctorDetail>> {
        self.select_one(&format!("/rest/v1/doctors?user_id=eq.{}", account_id)).await
    }

    async fn patient(&self, patient_id: Uuid) -> StoreResult<Option<PatientDetail>> {
        self.select_one(&format!("/rest/v1/patients?id=eq.{}", patient_id)).await
    }

    async fn doctor(&self, doctor_id: Uuid) -> StoreResult<Option<DoctorDetail>> {
        self.select_one(&format!("/rest/v1/doctors?id=eq.{}", doctor_id)).await
    }

    async fn profile(&self, account_id: Uuid) -> StoreResult<Option<Profile>> {
        self.select_one(&format!("/rest/v1/user_profiles?user_id=eq.{}", account_id)).await
    }

    async fn update_profile(&self, account_id: Uuid, update: ProfileUpdate) -> StoreResult<Profile> {
        let rows: Vec<Profile> = self
            .supabase
            .rpc(
                "update_profile",
                json!({
                    "p_user_id": account_id,
                    "p_full_name": update.full_name,
                    "p_phone": update.phone,
                    "p_address": update.address,
                }),
            )
            .await?;
        first_row(rows, "Account not found")
    }

    async fn specializations(&self) -> StoreResult<Vec<Specialization>> {
        self.select("/rest/v1/specializations?select=id,name&order=name.asc").await
    }

    async fn create_specialization(&self, name: &str) -> StoreResult<Specialization> {
        let rows: Vec<Specialization> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/specializations",
                Some(json!({ "name": name })),
                Some(SupabaseClient::return_representation()),
            )
            .await
            .map_err(|e| with_conflict_message(e, "Specialization already exists"))?;

        let created = first_row(rows, "Specialization not created")?;
        info!("Specialization {} created", created.id);
        Ok(created)
    }

    async fn delete_specialization(&self, id: Uuid) -> StoreResult<()> {
        let rows: Vec<Specialization> = self
            .supabase
            .request_with_headers(
                Method::DELETE,
                &format!("/rest/v1/specializations?id=eq.{}", id),
                None,
                Some(SupabaseClient::return_representation()),
            )
            .await
            .map_err(|e| with_conflict_message(e, "Specialization is assigned to doctors"))?;

        first_row(rows, "Specialization not found").map(|_| ())
    }

    async fn doctor_listings(&self) -> StoreResult<Vec<DoctorListing>> {
        self.select("/rest/v1/doctor_directory?select=id,full_name,specialization,bio,cabinet_number&order=full_name.asc")
            .await
    }

    async fn admin_doctor_listings(&self) -> StoreResult<Vec<AdminDoctorListing>> {
        self.select("/rest/v1/doctor_directory?order=full_name.asc").await
    }

    async fn admin_doctor_listing(&self, doctor_id: Uuid) -> StoreResult<Option<AdminDoctorListing>> {
        self.select_one(&format!("/rest/v1/doctor_directory?id=eq.{}", doctor_id)).await
    }

    async fn update_doctor(&self, doctor_id: Uuid, update: DoctorUpdate) -> StoreResult<AdminDoctorListing> {
        let rows: Vec<AdminDoctorListing> = self
            .supabase
            .rpc(
                "update_doctor",
                json!({
                    "p_doctor_id": doctor_id,
                    "p_full_name": update.full_name,
                    "p_phone": update.phone,
                    "p_specialization_id": update.specialization_id,
                    "p_bio": update.bio,
                    "p_cabinet_number": update.cabinet_number,
                }),
            )
            .await?;
        first_row(rows, "Doctor not found")
    }

    async fn delete_doctor(&self, doctor_id: Uuid) -> StoreResult<()> {
        self.supabase
            .rpc::<()>("delete_doctor", json!({ "p_doctor_id": doctor_id }))
            .await
    }

    async fn book_slot(&self, appointment: NewAppointment) -> StoreResult<Appointment> {
        self.supabase
            .rpc(
                "book_appointment",
                json!({
                    "p_doctor_id": appointment.doctor_id,
                    "p_patient_id": appointment.patient_id,
                    "p_appointment_date": appointment.appointment_date.format(TIMESTAMP_FORMAT).to_string(),
                }),
            )
            .await
    }

    async fn appointment(&self, id: Uuid) -> StoreResult<Option<Appointment>> {
        self.select_one(&format!(
            "/rest/v1/appointments?id=eq.{}&select=id,doctor_id,patient_id,appointment_date,status",
            id
        ))
        .await
    }

    async fn cancel_appointment(&self, id: Uuid, patient_id: Uuid) -> StoreResult<Appointment> {
        self.supabase
            .rpc(
                "cancel_appointment",
                json!({ "p_appointment_id": id, "p_patient_id": patient_id }),
            )
            .await
    }

    async fn booked_slots(&self, doctor_id: Uuid, date: NaiveDate) -> StoreResult<Vec<NaiveDateTime>> {
        let (start, end) = day_bounds(date);
        let path = format!(
            "/rest/v1/appointments?select=appointment_date&doctor_id=eq.{}&status=neq.cancelled\
             &appointment_date=gte.{}&appointment_date=lt.{}&order=appointment_date.asc",
            doctor_id, start, end
        );
        let rows: Vec<BookedSlot> = self.select(&path).await?;
        Ok(rows.into_iter().map(|slot| slot.appointment_date).collect())
    }

    async fn patient_appointments(&self, patient_id: Uuid) -> StoreResult<Vec<PatientAppointment>> {
        self.select(&format!(
            "/rest/v1/patient_appointment_list?patient_id=eq.{}&order=appointment_date.desc",
            patient_id
        ))
        .await
    }

    async fn doctor_schedule(&self, doctor_id: Uuid, from: NaiveDate) -> StoreResult<Vec<ScheduledVisit>> {
        let (start, _) = day_bounds(from);
        self.select(&format!(
            "/rest/v1/doctor_schedule_list?doctor_id=eq.{}&status=eq.scheduled\
             &appointment_date=gte.{}&order=appointment_date.asc",
            doctor_id, start
        ))
        .await
    }

    async fn complete_visit(&self, visit: VisitCompletion) -> StoreResult<MedicalRecord> {
        let record: MedicalRecord = self
            .supabase
            .rpc(
                "complete_visit",
                json!({
                    "p_appointment_id": visit.appointment_id,
                    "p_doctor_id": visit.doctor_id,
                    "p_patient_id": visit.patient_id,
                    "p_visit_date": visit.visit_date,
                    "p_diagnosis_code": visit.diagnosis_code,
                    "p_clinical_data": visit.clinical_data,
                }),
            )
            .await?;

        info!("Visit {} completed with record {}", visit.appointment_id, record.id);
        Ok(record)
    }

    async fn medical_history(&self, patient_id: Uuid) -> StoreResult<Vec<HistoryEntry>> {
        self.select(&format!(
            "/rest/v1/medical_history_list?patient_id=eq.{}&order=visit_date.desc,appointment_date.desc,id.desc",
            patient_id
        ))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_bounds_cover_one_calendar_day() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        let (start, end) = day_bounds(date);
        assert_eq!(start, "2025-06-30T00:00:00");
        assert_eq!(end, "2025-07-01T00:00:00");
    }
}
