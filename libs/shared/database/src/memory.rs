use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_models::accounts::{Account, DoctorDetail, NewAccount, NewRoleDetail, PatientDetail, Profile, ProfileUpdate};
use shared_models::directory::{AdminDoctorListing, DoctorListing, DoctorUpdate, Specialization};
use shared_models::records::{HistoryEntry, MedicalRecord, VisitCompletion};
use shared_models::scheduling::{
    Appointment, AppointmentStatus, NewAppointment, PatientAppointment, ScheduledVisit,
};

use crate::error::{StoreError, StoreResult};
use crate::store::ClinicStore;

/// Points inside multi-row writes where a storage failure can be injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    /// Registration: account row written, detail row not yet.
    AfterAccountInsert,
    /// Profile and doctor edits: account row updated, detail row not yet.
    AfterAccountUpdate,
    /// Visit completion: record inserted, appointment still scheduled.
    AfterRecordInsert,
}

#[derive(Debug, Clone, Default)]
struct Tables {
    users: HashMap<Uuid, Account>,
    patients: HashMap<Uuid, PatientDetail>,
    doctors: HashMap<Uuid, DoctorDetail>,
    specializations: HashMap<Uuid, Specialization>,
    appointments: HashMap<Uuid, Appointment>,
    records: HashMap<Uuid, MedicalRecord>,
}

impl Tables {
    fn patient_by_user(&self, user_id: Uuid) -> Option<&PatientDetail> {
        self.patients.values().find(|p| p.user_id == user_id)
    }

    fn doctor_by_user(&self, user_id: Uuid) -> Option<&DoctorDetail> {
        self.doctors.values().find(|d| d.user_id == user_id)
    }

    fn user_name(&self, user_id: Uuid) -> String {
        self.users
            .get(&user_id)
            .map(|u| u.full_name.clone())
            .unwrap_or_default()
    }

    fn specialization_name(&self, id: Uuid) -> String {
        self.specializations
            .get(&id)
            .map(|s| s.name.clone())
            .unwrap_or_default()
    }

    fn admin_listing(&self, doctor: &DoctorDetail) -> Option<AdminDoctorListing> {
        let user = self.users.get(&doctor.user_id)?;
        Some(AdminDoctorListing {
            id: doctor.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            phone: user.phone.clone(),
            specialization_id: doctor.specialization_id,
            specialization: self.specialization_name(doctor.specialization_id),
            bio: doctor.bio.clone(),
            cabinet_number: doctor.cabinet_number.clone(),
        })
    }

    fn admin_listings(&self) -> Vec<AdminDoctorListing> {
        let mut rows: Vec<_> = self
            .doctors
            .values()
            .filter_map(|d| self.admin_listing(d))
            .collect();
        rows.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        rows
    }

    fn profile(&self, user_id: Uuid) -> Option<Profile> {
        let user = self.users.get(&user_id)?;
        let patient = self.patient_by_user(user_id);
        let doctor = self.doctor_by_user(user_id);

        Some(Profile {
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            phone: user.phone.clone(),
            role: user.role,
            date_of_birth: patient.and_then(|p| p.date_of_birth),
            address: patient.and_then(|p| p.address.clone()),
            gender: patient.and_then(|p| p.gender.clone()),
            specialization: doctor.map(|d| self.specialization_name(d.specialization_id)),
            bio: doctor.and_then(|d| d.bio.clone()),
            cabinet_number: doctor.and_then(|d| d.cabinet_number.clone()),
        })
    }

    fn slot_taken(&self, doctor_id: Uuid, at: NaiveDateTime) -> bool {
        self.appointments.values().any(|a| {
            a.doctor_id == doctor_id && a.appointment_date == at && a.status.occupies_slot()
        })
    }
}

#[derive(Debug, Default)]
struct FailPoints {
    armed: HashSet<FailPoint>,
}

impl FailPoints {
    fn trip(&mut self, point: FailPoint) -> StoreResult<()> {
        if self.armed.remove(&point) {
            warn!("Injected storage failure at {:?}", point);
            return Err(StoreError::Backend(format!("injected failure at {:?}", point)));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Inner {
    tables: Tables,
    fail_points: FailPoints,
}

/// In-process [`ClinicStore`].
///
/// All access is serialised behind one lock. Writes run against a copy of the
/// tables that replaces the live copy only when the whole unit succeeds, so a
/// failure at any step leaves nothing behind.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a one-shot failure at `point`. The next write reaching it aborts.
    pub async fn fail_at(&self, point: FailPoint) {
        self.inner.lock().await.fail_points.armed.insert(point);
    }

    async fn read<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&Tables) -> T + Send,
        T: Send,
    {
        let inner = self.inner.lock().await;
        f(&inner.tables)
    }

    async fn write<T, F>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Tables, &mut FailPoints) -> StoreResult<T> + Send,
        T: Send,
    {
        let mut inner = self.inner.lock().await;
        let Inner { tables, fail_points } = &mut *inner;

        let mut working = tables.clone();
        let outcome = f(&mut working, fail_points)?;
        *tables = working;

        Ok(outcome)
    }
}

#[async_trait]
impl ClinicStore for MemoryStore {
    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        Ok(self
            .read(|t| t.users.values().find(|u| u.email == email).cloned())
            .await)
    }

    async fn create_account(&self, account: NewAccount) -> StoreResult<Account> {
        self.write(move |t, fail| {
            if t.users.values().any(|u| u.email == account.email) {
                return Err(StoreError::Conflict("Email already registered".to_string()));
            }
            if let NewRoleDetail::Doctor { specialization_id, .. } = &account.details {
                if !t.specializations.contains_key(specialization_id) {
                    return Err(StoreError::NotFound("Specialization not found".to_string()));
                }
            }

            let created = Account {
                id: Uuid::new_v4(),
                email: account.email,
                password_hash: account.password_hash,
                full_name: account.full_name,
                phone: account.phone,
                role: account.details.role(),
            };
            t.users.insert(created.id, created.clone());

            fail.trip(FailPoint::AfterAccountInsert)?;

            match account.details {
                NewRoleDetail::Patient { date_of_birth, address, gender } => {
                    let detail = PatientDetail {
                        id: Uuid::new_v4(),
                        user_id: created.id,
                        date_of_birth,
                        address,
                        gender,
                    };
                    t.patients.insert(detail.id, detail);
                }
                NewRoleDetail::Doctor { specialization_id, bio, cabinet_number } => {
                    let detail = DoctorDetail {
                        id: Uuid::new_v4(),
                        user_id: created.id,
                        specialization_id,
                        bio,
                        cabinet_number,
                    };
                    t.doctors.insert(detail.id, detail);
                }
                NewRoleDetail::Admin => {}
            }

            debug!("Account {} stored", created.id);
            Ok(created)
        })
        .await
    }

    async fn patient_by_account(&self, account_id: Uuid) -> StoreResult<Option<PatientDetail>> {
        Ok(self.read(|t| t.patient_by_user(account_id).cloned()).await)
    }

    async fn doctor_by_account(&self, account_id: Uuid) -> StoreResult<Option<DoctorDetail>> {
        Ok(self.read(|t| t.doctor_by_user(account_id).cloned()).await)
    }

    async fn patient(&self, patient_id: Uuid) -> StoreResult<Option<PatientDetail>> {
        Ok(self.read(|t| t.patients.get(&patient_id).cloned()).await)
    }

    async fn doctor(&self, doctor_id: Uuid) -> StoreResult<Option<DoctorDetail>> {
        Ok(self.read(|t| t.doctors.get(&doctor_id).cloned()).await)
    }

    async fn profile(&self, account_id: Uuid) -> StoreResult<Option<Profile>> {
        Ok(self.read(|t| t.profile(account_id)).await)
    }

    async fn update_profile(&self, account_id: Uuid, update: ProfileUpdate) -> StoreResult<Profile> {
        self.write(move |t, fail| {
            let user = t
                .users
                .get_mut(&account_id)
                .ok_or_else(|| StoreError::NotFound("Account not found".to_string()))?;
            user.full_name = update.full_name;
            user.phone = update.phone;

            fail.trip(FailPoint::AfterAccountUpdate)?;

            if let Some(address) = update.address {
                let patient = t
                    .patients
                    .values_mut()
                    .find(|p| p.user_id == account_id)
                    .ok_or_else(|| StoreError::Invalid("Only patients have an address".to_string()))?;
                patient.address = Some(address);
            }

            t.profile(account_id)
                .ok_or_else(|| StoreError::NotFound("Account not found".to_string()))
        })
        .await
    }

    async fn specializations(&self) -> StoreResult<Vec<Specialization>> {
        Ok(self
            .read(|t| {
                let mut rows: Vec<_> = t.specializations.values().cloned().collect();
                rows.sort_by(|a, b| a.name.cmp(&b.name));
                rows
            })
            .await)
    }

    async fn create_specialization(&self, name: &str) -> StoreResult<Specialization> {
        let name = name.to_string();
        self.write(move |t, _| {
            if t.specializations.values().any(|s| s.name == name) {
                return Err(StoreError::Conflict("Specialization already exists".to_string()));
            }
            let created = Specialization { id: Uuid::new_v4(), name };
            t.specializations.insert(created.id, created.clone());
            Ok(created)
        })
        .await
    }

    async fn delete_specialization(&self, id: Uuid) -> StoreResult<()> {
        self.write(move |t, _| {
            if !t.specializations.contains_key(&id) {
                return Err(StoreError::NotFound("Specialization not found".to_string()));
            }
            if t.doctors.values().any(|d| d.specialization_id == id) {
                return Err(StoreError::Conflict("Specialization is assigned to doctors".to_string()));
            }
            t.specializations.remove(&id);
            Ok(())
        })
        .await
    }

    async fn doctor_listings(&self) -> StoreResult<Vec<DoctorListing>> {
        Ok(self
            .read(|t| t.admin_listings().into_iter().map(DoctorListing::from).collect())
            .await)
    }

    async fn admin_doctor_listings(&self) -> StoreResult<Vec<AdminDoctorListing>> {
        Ok(self.read(|t| t.admin_listings()).await)
    }

    async fn admin_doctor_listing(&self, doctor_id: Uuid) -> StoreResult<Option<AdminDoctorListing>> {
        Ok(self
            .read(|t| t.doctors.get(&doctor_id).and_then(|d| t.admin_listing(d)))
            .await)
    }

    async fn update_doctor(&self, doctor_id: Uuid, update: DoctorUpdate) -> StoreResult<AdminDoctorListing> {
        self.write(move |t, fail| {
            let owner = t
                .doctors
                .get(&doctor_id)
                .map(|d| d.user_id)
                .ok_or_else(|| StoreError::NotFound("Doctor not found".to_string()))?;
            if !t.specializations.contains_key(&update.specialization_id) {
                return Err(StoreError::NotFound("Specialization not found".to_string()));
            }

            if let Some(user) = t.users.get_mut(&owner) {
                user.full_name = update.full_name;
                user.phone = update.phone;
            }

            fail.trip(FailPoint::AfterAccountUpdate)?;

            let doctor = t
                .doctors
                .get_mut(&doctor_id)
                .ok_or_else(|| StoreError::NotFound("Doctor not found".to_string()))?;
            doctor.specialization_id = update.specialization_id;
            doctor.bio = update.bio;
            doctor.cabinet_number = update.cabinet_number;

            let doctor = doctor.clone();
            t.admin_listing(&doctor)
                .ok_or_else(|| StoreError::NotFound("Doctor not found".to_string()))
        })
        .await
    }

    async fn delete_doctor(&self, doctor_id: Uuid) -> StoreResult<()> {
        self.write(move |t, _| {
            let owner = t
                .doctors
                .get(&doctor_id)
                .map(|d| d.user_id)
                .ok_or_else(|| StoreError::NotFound("Doctor not found".to_string()))?;
            if t.appointments.values().any(|a| a.doctor_id == doctor_id) {
                return Err(StoreError::Conflict(
                    "Doctor has appointments and cannot be removed".to_string(),
                ));
            }

            // Account removal cascades to the detail row.
            t.users.remove(&owner);
            t.doctors.remove(&doctor_id);
            Ok(())
        })
        .await
    }

    async fn book_slot(&self, appointment: NewAppointment) -> StoreResult<Appointment> {
        self.write(move |t, _| {
            if !t.doctors.contains_key(&appointment.doctor_id) {
                return Err(StoreError::NotFound("Doctor not found".to_string()));
            }
            if !t.patients.contains_key(&appointment.patient_id) {
                return Err(StoreError::NotFound("Patient not found".to_string()));
            }
            if t.slot_taken(appointment.doctor_id, appointment.appointment_date) {
                return Err(StoreError::Conflict("This time slot is already taken".to_string()));
            }

            let booked = Appointment {
                id: Uuid::new_v4(),
                doctor_id: appointment.doctor_id,
                patient_id: appointment.patient_id,
                appointment_date: appointment.appointment_date,
                status: AppointmentStatus::Scheduled,
            };
            t.appointments.insert(booked.id, booked.clone());
            Ok(booked)
        })
        .await
    }

    async fn appointment(&self, id: Uuid) -> StoreResult<Option<Appointment>> {
        Ok(self.read(|t| t.appointments.get(&id).cloned()).await)
    }

    async fn cancel_appointment(&self, id: Uuid, patient_id: Uuid) -> StoreResult<Appointment> {
        self.write(move |t, _| {
            let appointment = t
                .appointments
                .get_mut(&id)
                .filter(|a| a.patient_id == patient_id)
                .ok_or_else(|| StoreError::NotFound("Appointment not found".to_string()))?;
            if appointment.status != AppointmentStatus::Scheduled {
                return Err(StoreError::Conflict(
                    "Only scheduled appointments can be cancelled".to_string(),
                ));
            }
            appointment.status = AppointmentStatus::Cancelled;
            Ok(appointment.clone())
        })
        .await
    }

    async fn booked_slots(&self, doctor_id: Uuid, date: NaiveDate) -> StoreResult<Vec<NaiveDateTime>> {
        Ok(self
            .read(|t| {
                let mut slots: Vec<_> = t
                    .appointments
                    .values()
                    .filter(|a| {
                        a.doctor_id == doctor_id
                            && a.appointment_date.date() == date
                            && a.status.occupies_slot()
                    })
                    .map(|a| a.appointment_date)
                    .collect();
                slots.sort();
                slots
            })
            .await)
    }

    async fn patient_appointments(&self, patient_id: Uuid) -> StoreResult<Vec<PatientAppointment>> {
        Ok(self
            .read(|t| {
                let mut rows: Vec<_> = t
                    .appointments
                    .values()
                    .filter(|a| a.patient_id == patient_id)
                    .filter_map(|a| {
                        let doctor = t.doctors.get(&a.doctor_id)?;
                        Some(PatientAppointment {
                            id: a.id,
                            appointment_date: a.appointment_date,
                            status: a.status,
                            doctor_name: t.user_name(doctor.user_id),
                            specialization: t.specialization_name(doctor.specialization_id),
                        })
                    })
                    .collect();
                rows.sort_by(|a, b| b.appointment_date.cmp(&a.appointment_date));
                rows
            })
            .await)
    }

    async fn doctor_schedule(&self, doctor_id: Uuid, from: NaiveDate) -> StoreResult<Vec<ScheduledVisit>> {
        Ok(self
            .read(|t| {
                let mut rows: Vec<_> = t
                    .appointments
                    .values()
                    .filter(|a| {
                        a.doctor_id == doctor_id
                            && a.status == AppointmentStatus::Scheduled
                            && a.appointment_date.date() >= from
                    })
                    .filter_map(|a| {
                        let patient = t.patients.get(&a.patient_id)?;
                        Some(ScheduledVisit {
                            id: a.id,
                            appointment_date: a.appointment_date,
                            status: a.status,
                            patient_name: t.user_name(patient.user_id),
                            patient_id: patient.id,
                            date_of_birth: patient.date_of_birth,
                            gender: patient.gender.clone(),
                        })
                    })
                    .collect();
                rows.sort_by(|a, b| a.appointment_date.cmp(&b.appointment_date));
                rows
            })
            .await)
    }

    async fn complete_visit(&self, visit: VisitCompletion) -> StoreResult<MedicalRecord> {
        self.write(move |t, fail| {
            if !t.appointments.contains_key(&visit.appointment_id) {
                return Err(StoreError::NotFound("Appointment not found".to_string()));
            }
            if t.records.values().any(|r| r.appointment_id == visit.appointment_id) {
                return Err(StoreError::Conflict("Visit already recorded".to_string()));
            }

            let record = MedicalRecord {
                id: Uuid::new_v4(),
                patient_id: visit.patient_id,
                doctor_id: visit.doctor_id,
                appointment_id: visit.appointment_id,
                visit_date: visit.visit_date,
                diagnosis_code: visit.diagnosis_code,
                clinical_data: visit.clinical_data,
            };
            t.records.insert(record.id, record.clone());

            fail.trip(FailPoint::AfterRecordInsert)?;

            let appointment = t
                .appointments
                .get_mut(&visit.appointment_id)
                .filter(|a| a.doctor_id == visit.doctor_id && a.status == AppointmentStatus::Scheduled)
                .ok_or_else(|| StoreError::Conflict("Appointment is no longer scheduled".to_string()))?;
            appointment.status = AppointmentStatus::Completed;

            Ok(record)
        })
        .await
    }

    async fn medical_history(&self, patient_id: Uuid) -> StoreResult<Vec<HistoryEntry>> {
        Ok(self
            .read(|t| {
                let mut rows: Vec<_> = t
                    .records
                    .values()
                    .filter(|r| r.patient_id == patient_id)
                    .map(|r| {
                        let doctor = t.doctors.get(&r.doctor_id);
                        let booked_for = t.appointments.get(&r.appointment_id).map(|a| a.appointment_date);
                        let entry = HistoryEntry {
                            id: r.id,
                            visit_date: r.visit_date,
                            diagnosis_code: r.diagnosis_code.clone(),
                            clinical_data: r.clinical_data.clone(),
                            doctor_name: doctor.map(|d| t.user_name(d.user_id)).unwrap_or_default(),
                            specialization: doctor
                                .map(|d| t.specialization_name(d.specialization_id))
                                .unwrap_or_default(),
                        };
                        (booked_for, entry)
                    })
                    .collect();
                // Newest visit first; same-day visits by appointment time.
                rows.sort_by(|(a_at, a), (b_at, b)| {
                    (b.visit_date, b_at, b.id).cmp(&(a.visit_date, a_at, a.id))
                });
                rows.into_iter().map(|(_, entry)| entry).collect()
            })
            .await)
    }
}
