//! Persistence for every entity the service stores.
//!
//! The medical-record workflow only sees two narrow seams, [`MotherDirectory`] and
//! [`RecordStore`], so it can be exercised without touching disk. Everything else talks to the
//! concrete file-backed repositories directly.

mod medical_records;
mod profiles;
mod users;

pub use medical_records::MedicalRecordRepository;
pub use profiles::{ClinicRepository, DoctorRepository, MotherRepository};
pub use users::UserRepository;

use crate::config::CoreConfig;
use crate::models::{MedicalRecord, MedicalRecordPatch, Mother, NewMedicalRecord};
use crate::{CoreResult, ShardableUuid};
use std::sync::Arc;

/// Read-only lookup of mothers.
///
/// "Not found" is `Ok(None)`, never an error.
pub trait MotherDirectory: Send + Sync {
    fn find_by_id(&self, id: &ShardableUuid) -> CoreResult<Option<Mother>>;

    /// Look a mother up by national identity number. Matching ignores surrounding whitespace
    /// and letter case; a malformed number simply matches nobody.
    fn find_by_nic(&self, nic: &str) -> CoreResult<Option<Mother>>;
}

/// Storage of medical records.
pub trait RecordStore: Send + Sync {
    fn create(&self, mother_id: &ShardableUuid, record: NewMedicalRecord)
        -> CoreResult<MedicalRecord>;

    /// Records for one mother, newest first. Empty when there are none.
    fn list_by_mother(&self, mother_id: &ShardableUuid) -> CoreResult<Vec<MedicalRecord>>;

    /// Every record, newest first.
    fn list_all(&self) -> CoreResult<Vec<MedicalRecord>>;

    /// Apply a partial update. Fails with `RecordNotFound` when `id` is unknown.
    fn update(&self, id: &ShardableUuid, patch: MedicalRecordPatch) -> CoreResult<MedicalRecord>;

    /// Fails with `RecordNotFound` when `id` is unknown.
    fn delete(&self, id: &ShardableUuid) -> CoreResult<()>;
}

/// The file-backed repositories, opened once at startup and shared between services.
#[derive(Clone, Debug)]
pub struct FileStores {
    pub users: Arc<UserRepository>,
    pub mothers: Arc<MotherRepository>,
    pub doctors: Arc<DoctorRepository>,
    pub clinics: Arc<ClinicRepository>,
    pub medical_records: Arc<MedicalRecordRepository>,
}

impl FileStores {
    pub fn open(cfg: &CoreConfig) -> Self {
        Self {
            users: Arc::new(UserRepository::new(cfg)),
            mothers: Arc::new(MotherRepository::new(cfg)),
            doctors: Arc::new(DoctorRepository::new(cfg)),
            clinics: Arc::new(ClinicRepository::new(cfg)),
            medical_records: Arc::new(MedicalRecordRepository::new(cfg)),
        }
    }
}
