use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use shared_models::accounts::{Account, DoctorDetail, NewAccount, PatientDetail, Profile, ProfileUpdate};
use shared_models::directory::{AdminDoctorListing, DoctorListing, DoctorUpdate, Specialization};
use shared_models::records::{HistoryEntry, MedicalRecord, VisitCompletion};
use shared_models::scheduling::{Appointment, NewAppointment, PatientAppointment, ScheduledVisit};

use crate::error::StoreResult;

/// Storage seam shared by every cell.
///
/// Each method is one unit of work: methods that touch more than one row
/// commit all of their writes or none of them. Backends classify failures
/// into [`crate::StoreError`] so callers never see driver detail.
#[async_trait]
pub trait ClinicStore: Send + Sync {
    // ---- identity ----------------------------------------------------------

    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<Account>>;

    /// Inserts the account and its role detail row together.
    ///
    /// `Conflict` on a duplicate email, `NotFound` when a doctor's
    /// specialization does not exist.
    async fn create_account(&self, account: NewAccount) -> StoreResult<Account>;

    async fn patient_by_account(&self, account_id: Uuid) -> StoreResult<Option<PatientDetail>>;

    async fn doctor_by_account(&self, account_id: Uuid) -> StoreResult<Option<DoctorDetail>>;

    async fn patient(&self, patient_id: Uuid) -> StoreResult<Option<PatientDetail>>;

    async fn doctor(&self, doctor_id: Uuid) -> StoreResult<Option<DoctorDetail>>;

    async fn profile(&self, account_id: Uuid) -> StoreResult<Option<Profile>>;

    /// Updates name/phone and, for patients, the address in one transaction.
    async fn update_profile(&self, account_id: Uuid, update: ProfileUpdate) -> StoreResult<Profile>;

    // ---- directory ---------------------------------------------------------

    async fn specializations(&self) -> StoreResult<Vec<Specialization>>;

    /// `Conflict` when the name is taken.
    async fn create_specialization(&self, name: &str) -> StoreResult<Specialization>;

    /// `Conflict` while any doctor references it, `NotFound` when absent.
    async fn delete_specialization(&self, id: Uuid) -> StoreResult<()>;

    async fn doctor_listings(&self) -> StoreResult<Vec<DoctorListing>>;

    async fn admin_doctor_listings(&self) -> StoreResult<Vec<AdminDoctorListing>>;

    async fn admin_doctor_listing(&self, doctor_id: Uuid) -> StoreResult<Option<AdminDoctorListing>>;

    /// Updates the doctor's account and detail rows together.
    async fn update_doctor(&self, doctor_id: Uuid, update: DoctorUpdate) -> StoreResult<AdminDoctorListing>;

    /// Removes the doctor's account; the detail row goes with it.
    /// `Conflict` while any appointment references the doctor.
    async fn delete_doctor(&self, doctor_id: Uuid) -> StoreResult<()>;

    // ---- scheduling --------------------------------------------------------

    /// Inserts a `scheduled` appointment unless a non-cancelled one already
    /// holds the same (doctor, timestamp). The check and the insert are
    /// atomic; the loser of a race gets `Conflict`.
    async fn book_slot(&self, appointment: NewAppointment) -> StoreResult<Appointment>;

    async fn appointment(&self, id: Uuid) -> StoreResult<Option<Appointment>>;

    /// Moves a `scheduled` appointment owned by `patient_id` to `cancelled`.
    /// `Conflict` if it is no longer scheduled when the write lands.
    async fn cancel_appointment(&self, id: Uuid, patient_id: Uuid) -> StoreResult<Appointment>;

    /// Every slot-holding appointment of the doctor on `date`, grid-aligned
    /// or not, ordered by time.
    async fn booked_slots(&self, doctor_id: Uuid, date: NaiveDate) -> StoreResult<Vec<NaiveDateTime>>;

    /// Newest first.
    async fn patient_appointments(&self, patient_id: Uuid) -> StoreResult<Vec<PatientAppointment>>;

    /// Scheduled entries on or after `from`, oldest first.
    async fn doctor_schedule(&self, doctor_id: Uuid, from: NaiveDate) -> StoreResult<Vec<ScheduledVisit>>;

    // ---- clinical records --------------------------------------------------

    /// Inserts the medical record and marks the appointment `completed` in one
    /// transaction. `Conflict` if the appointment is no longer scheduled.
    async fn complete_visit(&self, visit: VisitCompletion) -> StoreResult<MedicalRecord>;

    /// Newest first.
    async fn medical_history(&self, patient_id: Uuid) -> StoreResult<Vec<HistoryEntry>>;
}
